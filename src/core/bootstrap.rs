// src/core/bootstrap.rs

use crate::common::env::{Config, StoreBackend};
use crate::common::log;
use crate::modules::app::root::SERVICE_NAME;
use chrono::Local;

pub fn init(cfg: &Config) {
    let cargo_version = env!("CARGO_PKG_VERSION");
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    let backend = match cfg.store_backend {
        StoreBackend::Sheets => format!(
            "Google Sheets {} ({})",
            cfg.spreadsheet_id.as_deref().unwrap_or("<unset>"),
            cfg.sheet_range()
        ),
        StoreBackend::Memory => "in-memory".to_string(),
    };

    println!();
    const MAGENTA: &str = "\x1b[35m";
    const RESET: &str = "\x1b[0m";

    println!("  {}▲ {} {}{}", MAGENTA, SERVICE_NAME, cargo_version, RESET);
    println!("  - Timestamp: {}", timestamp);
    println!("  - Environment:");
    println!("    ✓ stage {}", cfg.stage);
    println!("    ✓ store {}", backend);
    println!("    ✓ check log {} (cap {})", cfg.check_log_path.display(), cfg.check_log_cap);
    if let Some(path) = log::get_log_path() {
        println!("    ✓ log file {}", path.display());
    }
    println!();

    log::info("✓ Starting...");
}
