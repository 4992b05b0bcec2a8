//! Thin client for the back-office REST API.
//!
//! Only the two reads the report needs: a branch's transactions for a date
//! range and its opening balance on a given day. Retries and timeouts are the
//! caller's business (configure them on the `reqwest::Client`).

use anyhow::{Context, Result};
use branchbook_core::DateRange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::normalize::coerce_amount;
use crate::sources::json::records_from_value;
use crate::types::RawTransaction;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OpeningBalanceResponse {
    #[serde(default, alias = "openingBalance", alias = "balance")]
    opening_balance: Option<Value>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn transactions_url(&self, branch_id: &str, range: Option<&DateRange>) -> String {
        let mut url = format!("{}/branches/{}/transactions", self.base_url, branch_id);
        if let Some(r) = range {
            url.push_str(&format!("?from={}&to={}", r.from, r.to));
        }
        url
    }

    pub fn opening_balance_url(&self, branch_id: &str, date: NaiveDate) -> String {
        format!("{}/branches/{}/opening-balance?date={}", self.base_url, branch_id, date)
    }

    pub async fn fetch_transactions(
        &self,
        branch_id: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<RawTransaction>> {
        let url = self.transactions_url(branch_id, range);
        tracing::info!(%url, "fetching branch transactions");
        let body: Value = self.get_json(&url).await?;
        records_from_value(body).with_context(|| format!("decoding {url}"))
    }

    /// `Ok(None)` when the API has no balance for that day yet
    pub async fn fetch_opening_balance(
        &self,
        branch_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Decimal>> {
        let url = self.opening_balance_url(branch_id, date);
        let body: OpeningBalanceResponse = serde_json::from_value(self.get_json(&url).await?)
            .with_context(|| format!("decoding {url}"))?;
        Ok(opening_from_response(body))
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        resp.json::<Value>().await.with_context(|| format!("reading {url}"))
    }
}

fn opening_from_response(body: OpeningBalanceResponse) -> Option<Decimal> {
    match body.opening_balance {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_amount(Some(&v))),
    }
}
