//! HTTP client for the hosted `user_stats` table
//!
//! Speaks the PostgREST dialect served by Supabase: filters in the query
//! string, upserts via `Prefer: resolution=merge-duplicates`, and stored
//! procedures under `/rest/v1/rpc/`.

use crate::error::{Result, SyncError};
use crate::row::UserStatsRow;
use crate::table::RemoteTable;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

const TABLE: &str = "user_stats";

#[derive(Debug, Clone)]
pub struct RestTable {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl RestTable {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        log::info!("📡 Remote table client initialized: {}", endpoint);
        Ok(Self {
            endpoint,
            api_key: api_key.to_string(),
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.endpoint, TABLE)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        log::error!("❌ {} failed: {} {}", what, status, body);
        Err(SyncError::Status { status, body })
    }
}

#[async_trait::async_trait]
impl RemoteTable for RestTable {
    async fn upsert(&self, row: &UserStatsRow) -> Result<()> {
        let url = self.table_url();
        log::debug!("→ POST {} (user {})", url, row.user_id);

        let response = self
            .request(Method::POST, &url)
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        Self::check(response, "Upsert").await?;
        Ok(())
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<UserStatsRow>> {
        let url = self.table_url();
        log::debug!("→ GET {} (user {})", url, user_id);

        let filter = format!("eq.{}", user_id);
        let response = self
            .request(Method::GET, &url)
            .query(&[("user_id", filter.as_str()), ("select", "*"), ("limit", "1")])
            .send()
            .await?;

        let rows: Vec<UserStatsRow> = Self::check(response, "Fetch").await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn list_by_coins(&self, limit: Option<usize>) -> Result<Vec<UserStatsRow>> {
        let url = self.table_url();
        log::debug!("→ GET {} (order coins desc, limit {:?})", url, limit);

        let mut request = self
            .request(Method::GET, &url)
            .query(&[("select", "*"), ("order", "coins.desc")]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }

        let response = Self::check(request.send().await?, "List").await?;
        let rows: Vec<UserStatsRow> = response.json().await?;
        log::debug!("✅ Retrieved {} rows", rows.len());
        Ok(rows)
    }

    async fn increment_coins(&self, user_id: &str, amount: u64) -> Result<()> {
        let url = format!("{}/rest/v1/rpc/increment_coins", self.endpoint);
        log::debug!("→ POST {}", url);

        let body = serde_json::json!({ "user_id_input": user_id, "amount": amount });
        let response = self.request(Method::POST, &url).json(&body).send().await?;

        Self::check(response, "increment_coins").await?;
        log::info!("✅ Credited {} coins to {}", amount, user_id);
        Ok(())
    }
}
