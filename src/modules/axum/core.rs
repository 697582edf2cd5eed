// src/modules/axum/core.rs

use crate::common::env::{Config, StoreBackend};
use crate::common::log;
use crate::modules::audit::check_log::CheckLog;
use crate::modules::router::entrance::app_router;
use crate::modules::sheets::auth::{Credentials, TokenSource};
use crate::modules::sheets::client::SheetsStore;
use crate::modules::whitelist::service::WhitelistService;
use crate::modules::whitelist::store::{MemoryStore, TableStore};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

// Picks the table backend named by STORE_BACKEND.
pub fn build_store(cfg: &Config) -> Result<Arc<dyn TableStore>, String> {
    cfg.validate()?;
    match cfg.store_backend {
        StoreBackend::Memory => {
            log::warn("➜ Using in-memory whitelist, changes are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sheets => {
            let http = reqwest::Client::builder()
                .timeout(cfg.request_timeout)
                .user_agent(concat!("sheetguard/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| format!("failed to build HTTP client: {}", e))?;

            let credentials = match (&cfg.access_token, &cfg.service_account_email, &cfg.private_key) {
                (Some(token), _, _) => Credentials::AccessToken(token.clone()),
                (None, Some(email), Some(key)) => Credentials::ServiceAccount {
                    email: email.clone(),
                    private_key: key.clone(),
                },
                _ => return Err("Sheets credentials missing".to_string()),
            };
            let spreadsheet_id = cfg
                .spreadsheet_id
                .clone()
                .ok_or_else(|| "SPREADSHEET_ID is required".to_string())?;

            let tokens = TokenSource::new(http.clone(), credentials).with_token_uri(cfg.token_uri.clone());
            Ok(Arc::new(SheetsStore::new(
                http,
                tokens,
                cfg.sheets_api_base.clone(),
                spreadsheet_id,
                cfg.sheet_range(),
            )))
        }
    }
}

// Starts the Axum web server and serves until Ctrl-C or SIGTERM.
pub async fn start(cfg: &Config) -> Result<(), String> {
    let store = build_store(cfg)?;
    let check_log = Arc::new(CheckLog::new(cfg.check_log_path.clone(), cfg.check_log_cap));
    let service = Arc::new(WhitelistService::new(store, check_log));
    log::info(&format!("✓ Whitelist store: {}", service.store().describe()));
    let app = app_router(service, cfg.cors_origins.clone());

    let addr = format!("{}:{}", cfg.bind, cfg.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to bind to address {}: {}", addr, e))?;

    log_listen_addresses(cfg.port);
    log::info("✓ Ready to handle requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("axum server error: {}", e))?;

    log::info("✓ Shut down cleanly");
    Ok(())
}

fn log_listen_addresses(port: u16) {
    log::info(&format!("✓ Listening on http://localhost:{}", port));

    let mut ips: Vec<IpAddr> = get_if_addrs::get_if_addrs()
        .map(|interfaces| {
            interfaces
                .into_iter()
                .map(|iface| iface.addr.ip())
                .filter(|ip| !ip.is_loopback())
                .collect()
        })
        .unwrap_or_default();
    // IPv4 before IPv6, then lexical.
    ips.sort_by_key(|ip| (ip.is_ipv6(), ip.to_string()));

    for ip in ips {
        let url = match ip {
            IpAddr::V4(v4) => format!("http://{}:{}", v4, port),
            IpAddr::V6(v6) => format!("http://[{}]:{}", v6, port),
        };
        log::debug(&format!("➜ Listening on {}", url));
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error(&format!("✗ Ctrl-C handler failed: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info("➜ Shutdown signal received");
}
