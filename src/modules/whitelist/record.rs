// src/modules/whitelist/record.rs

use crate::core::response::now_iso;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";

// One whitelist entry. Serialized with the camelCase names clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub address: String,
    pub owner: String,
    pub added_by: String,
    pub added_at: String,
    pub status: String,
}

impl Record {
    pub fn new_active(address: String, owner: String, added_by: String) -> Self {
        Record {
            address,
            owner,
            added_by,
            added_at: now_iso(),
            status: STATUS_ACTIVE.to_string(),
        }
    }

    // Anything other than exactly "active" counts as inactive.
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// Maps a positional sheet row `[address, owner, addedBy, addedAt, status]`.
    /// Missing or empty cells fall back to "" for text, the current time for
    /// `addedAt` and "active" for `status`.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).filter(|c| !c.is_empty()).cloned();
        Record {
            address: cell(0).unwrap_or_default(),
            owner: cell(1).unwrap_or_default(),
            added_by: cell(2).unwrap_or_default(),
            added_at: cell(3).unwrap_or_else(now_iso),
            status: cell(4).unwrap_or_else(|| STATUS_ACTIVE.to_string()),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.owner.clone(),
            self.added_by.clone(),
            self.added_at.clone(),
            self.status.clone(),
        ]
    }
}
