// src/modules/whitelist/service.rs

use crate::common::log;
use crate::core::error::{AppError, AppResult};
use crate::core::response::now_iso;
use crate::modules::audit::check_log::{CheckLog, CheckLogEntry, ACTION_CHECK};
use crate::modules::whitelist::record::Record;
use crate::modules::whitelist::store::TableStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub whitelisted: bool,
    pub server: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Record),
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Record),
    NotFound,
}

/// Check, list, add and remove on top of a whole-table store.
///
/// Each call reads the full table. Mutations then write the full table back.
/// `mutations` serializes read-modify-write cycles inside this process only;
/// another writer on the same sheet can still overwrite a concurrent change.
pub struct WhitelistService {
    store: Arc<dyn TableStore>,
    check_log: Arc<CheckLog>,
    mutations: Mutex<()>,
}

// Treats absent and blank values alike; keeps the trimmed text.
fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            missing.push(name);
            String::new()
        }
    }
}

impl WhitelistService {
    pub fn new(store: Arc<dyn TableStore>, check_log: Arc<CheckLog>) -> Self {
        Self {
            store,
            check_log,
            mutations: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    pub async fn check(&self, address: &str) -> AppResult<CheckResult> {
        let table = self.store.read_table().await?;
        let server = table
            .into_iter()
            .find(|r| r.address == address && r.is_active());
        let whitelisted = server.is_some();

        let entry = CheckLogEntry {
            address: address.to_string(),
            action: ACTION_CHECK.to_string(),
            result: whitelisted,
            timestamp: now_iso(),
        };
        if let Err(e) = self.check_log.append(entry).await {
            log::warn(&format!(
                "➜ Could not record check in {}: {}",
                self.check_log.path().display(),
                e
            ));
        }

        log::debug(&format!("▪ check {} ➜ {}", address, whitelisted));
        Ok(CheckResult { whitelisted, server })
    }

    pub async fn list(&self) -> AppResult<Vec<Record>> {
        let table = self.store.read_table().await?;
        Ok(table.into_iter().filter(Record::is_active).collect())
    }

    pub async fn add(
        &self,
        address: Option<String>,
        owner: Option<String>,
        added_by: Option<String>,
    ) -> AppResult<AddOutcome> {
        let mut missing = Vec::new();
        let address = required(address, "address", &mut missing);
        let owner = required(owner, "owner", &mut missing);
        let added_by = required(added_by, "addedBy", &mut missing);
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let _guard = self.mutations.lock().await;
        let mut table = self.store.read_table().await?;
        // Inactive rows still reserve their address.
        if table.iter().any(|r| r.address == address) {
            log::info(&format!("▪ add {} skipped, already listed", address));
            return Ok(AddOutcome::AlreadyExists);
        }

        let record = Record::new_active(address, owner, added_by);
        table.push(record.clone());
        self.store.write_table(&table).await.map_err(AppError::SaveFailed)?;

        log::info(&format!("✓ {} added by {}", record.address, record.added_by));
        Ok(AddOutcome::Added(record))
    }

    pub async fn remove(&self, address: Option<String>) -> AppResult<RemoveOutcome> {
        let mut missing = Vec::new();
        let address = required(address, "address", &mut missing);
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let _guard = self.mutations.lock().await;
        let mut table = self.store.read_table().await?;
        let Some(index) = table.iter().position(|r| r.address == address) else {
            log::info(&format!("▪ remove {} skipped, not listed", address));
            return Ok(RemoveOutcome::NotFound);
        };

        let removed = table.remove(index);
        self.store.write_table(&table).await.map_err(AppError::SaveFailed)?;

        log::info(&format!("✓ {} removed", removed.address));
        Ok(RemoveOutcome::Removed(removed))
    }
}
