// src/modules/sheets/client.rs

use crate::common::log;
use crate::modules::sheets::auth::TokenSource;
use crate::modules::whitelist::record::Record;
use crate::modules::whitelist::store::{StoreError, TableStore};
use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

// Google Sheets v4 values API over a fixed A1 range.
pub struct SheetsStore {
    http: reqwest::Client,
    tokens: TokenSource,
    api_base: String,
    spreadsheet_id: String,
    range: String,
}

impl SheetsStore {
    pub fn new(
        http: reqwest::Client,
        tokens: TokenSource,
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            http,
            tokens,
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    // {base}/spreadsheets/{id}/values/{range}{suffix}, each segment escaped.
    fn values_url(&self, suffix: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| StoreError::Decode(format!("bad api base {}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Decode(format!("api base cannot hold a path: {}", self.api_base)))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", self.range, suffix));
        Ok(url)
    }

    async fn clear(&self, token: &str) -> Result<(), StoreError> {
        let url = self.values_url(":clear")?;
        let resp = self.http.post(url).bearer_auth(token).json(&json!({})).send().await?;
        ensure_success(resp).await.map(|_| ())
    }

    async fn update(&self, token: &str, records: &[Record]) -> Result<(), StoreError> {
        let mut url = self.values_url("")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let rows: Vec<Vec<String>> = records.iter().map(Record::to_row).collect();
        let body = json!({
            "range": self.range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let resp = self.http.put(url).bearer_auth(token).json(&body).send().await?;
        ensure_success(resp).await.map(|_| ())
    }
}

async fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TableStore for SheetsStore {
    async fn read_table(&self) -> Result<Vec<Record>, StoreError> {
        let started = Instant::now();
        let token = self.tokens.bearer().await?;
        let resp = self.http.get(self.values_url("")?).bearer_auth(&token).send().await?;
        let range: ValueRange = ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let records: Vec<Record> = range
            .values
            .iter()
            .map(|row| Record::from_row(&row.iter().map(cell_text).collect::<Vec<_>>()))
            .collect();
        log::debug(&format!(
            "▪ Read {} rows from {} +{}",
            records.len(),
            self.range,
            log::format_duration(started.elapsed())
        ));
        Ok(records)
    }

    async fn write_table(&self, records: &[Record]) -> Result<(), StoreError> {
        let token = self.tokens.bearer().await?;
        // The range reads as empty between these two calls.
        self.clear(&token).await?;
        if !records.is_empty() {
            self.update(&token, records).await?;
        }
        log::debug(&format!("▪ Wrote {} rows to {}", records.len(), self.range));
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sheets:{}/{}", self.spreadsheet_id, self.range)
    }
}
