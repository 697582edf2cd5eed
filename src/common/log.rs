// src/common/log.rs

use crate::common::env;
use chrono::Local;
use lazy_static::lazy_static;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const FLUSH_BATCH: usize = 10;
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

lazy_static! {
    static ref LAST_LOG_TIME: Mutex<Option<Instant>> = Mutex::new(None);
    static ref FILE_SINK: Mutex<Option<mpsc::Sender<String>>> = Mutex::new(None);
    static ref THRESHOLD: LogLevel = LogLevel::parse(&env::CONFIG.log_level);
    static ref LOG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" | "trace" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn colors(self) -> (Color, Color) {
        match self {
            LogLevel::Debug => (Color::Magenta, Color::Blue),
            LogLevel::Info => (Color::White, Color::Yellow),
            LogLevel::Warn => (Color::Yellow, Color::Yellow),
            LogLevel::Error => (Color::Red, Color::Yellow),
        }
    }
}

// Starts the file writer. Console logging works without it.
pub fn init() {
    if let Ok(mut last) = LAST_LOG_TIME.lock() {
        *last = Some(Instant::now());
    }
    let dir = match env::CONFIG.log_dir.clone().or_else(default_log_dir) {
        Some(dir) => dir,
        None => return,
    };
    match create_log_file(&dir) {
        Ok(path) => {
            if let Ok(mut slot) = LOG_PATH.lock() {
                *slot = Some(path.clone());
            }
            start_file_writer(path);
        }
        Err(e) => {
            log(LogLevel::Warn, &format!("➜ File logging disabled ({}): {}", dir.display(), e));
        }
    }
}

pub fn get_log_path() -> Option<PathBuf> {
    LOG_PATH.lock().ok().and_then(|p| p.clone())
}

pub fn debug(content: &str) {
    log(LogLevel::Debug, content);
}

pub fn info(content: &str) {
    log(LogLevel::Info, content);
}

pub fn warn(content: &str) {
    log(LogLevel::Warn, content);
}

pub fn error(content: &str) {
    log(LogLevel::Error, content);
}

// Writes one colored console line and queues a plain copy for the file.
pub fn log(level: LogLevel, content: &str) {
    if level < *THRESHOLD {
        return;
    }

    let elapsed = since_last_line();
    let time_str = Local::now().format("%H:%M:%S").to_string();
    let (time_color, diff_color) = level.colors();

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(time_color)));
    let _ = write!(&mut stdout, "{} ", time_str);
    let _ = stdout.reset();
    let _ = write!(&mut stdout, "{} ", content);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(diff_color)));
    let _ = writeln!(&mut stdout, "+{}", elapsed);
    let _ = stdout.reset();

    if let Ok(sink) = FILE_SINK.lock() {
        if let Some(tx) = sink.as_ref() {
            let _ = tx.send(format!("{} [{:?}] {} +{}", time_str, level, content, elapsed));
        }
    }
}

fn since_last_line() -> String {
    let now = Instant::now();
    match LAST_LOG_TIME.lock() {
        Ok(mut last) => {
            let diff = last.map(|prev| now.duration_since(prev)).unwrap_or_default();
            *last = Some(now);
            format_duration(diff)
        }
        Err(_) => "0us".to_string(),
    }
}

fn start_file_writer(path: PathBuf) {
    let (tx, rx) = mpsc::channel::<String>();
    if let Ok(mut sink) = FILE_SINK.lock() {
        *sink = Some(tx);
    }

    thread::spawn(move || {
        let mut buffer: Vec<String> = Vec::with_capacity(FLUSH_BATCH);
        loop {
            match rx.recv_timeout(FLUSH_INTERVAL) {
                Ok(line) => {
                    buffer.push(line);
                    if buffer.len() >= FLUSH_BATCH {
                        flush(&path, &mut buffer);
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => flush(&path, &mut buffer),
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    flush(&path, &mut buffer);
                    break;
                }
            }
        }
    });
}

fn flush(path: &Path, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(buffer.join("\n").as_bytes());
        let _ = file.write_all(b"\n");
    }
    buffer.clear();
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sheetguard/logs"))
}

// One file per run: <dir>/<date>/<time>.log
fn create_log_file(dir: &Path) -> io::Result<PathBuf> {
    let now = Local::now();
    let day_dir = dir.join(now.format("%Y-%m-%d").to_string());
    fs::create_dir_all(&day_dir)?;
    Ok(day_dir.join(now.format("%H-%M-%S.log").to_string()))
}

pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{}us", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1_000)
    } else if micros < 60_000_000 {
        format!("{}s", micros / 1_000_000)
    } else if micros < 3_600_000_000 {
        format!("{:.2}m", micros as f64 / 60_000_000.0)
    } else {
        format!("{:.2}h", micros as f64 / 3_600_000_000.0)
    }
}
