///! Generic JSON award feed engine
///!
///! Talks to an HTTP endpoint that serves award inventory as JSON. This is
///! the reference engine implementation: no browser, no per-site selectors,
///! just one GET per query and the shared asset-saving service.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use award_common::{AwardCandidate, Query};

use super::{assets, Engine, EngineCapabilities, InitOptions, SearchResults};

const REQUEST_TIMEOUT_SECONDS: u64 = 60;
const USER_AGENT: &str = "Mozilla/5.0 award-search/0.1";

/// Wire format of the feed endpoint.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    error: Option<String>,
    #[serde(default)]
    blocked: bool,
    awards: Option<Vec<AwardCandidate>>,
}

pub struct FeedEngine {
    capabilities: EngineCapabilities,
    base_url: String,
    client: reqwest::Client,
    parse: bool,
    initialized: bool,
}

impl FeedEngine {
    pub fn new(capabilities: EngineCapabilities, base_url: String) -> Self {
        Self {
            capabilities,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
            parse: true,
            initialized: false,
        }
    }

    fn search_params(query: &Query) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from", query.from_city.clone()),
            ("to", query.to_city.clone()),
            ("depart", query.depart_date.to_string()),
            ("cabin", query.cabin.to_string()),
            ("quantity", query.quantity.to_string()),
            ("partners", query.partners.to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("return", return_date.to_string()));
        }
        params
    }
}

#[async_trait]
impl Engine for FeedEngine {
    fn capabilities(&self) -> &EngineCapabilities {
        &self.capabilities
    }

    async fn initialize(&mut self, options: InitOptions) -> Result<()> {
        self.parse = options.parse;

        if self.capabilities.login_required {
            let credentials = options
                .credentials
                .ok_or_else(|| anyhow!("Missing login credentials"))?;
            let url = format!("{}/session", self.base_url);
            let response = self
                .client
                .post(&url)
                .json(&credentials)
                .send()
                .await
                .context(format!("Login request failed for {}", self.capabilities.id))?;
            if !response.status().is_success() {
                bail!(
                    "Login rejected by {} ({}): HTTP {}",
                    self.capabilities.name,
                    self.capabilities.id,
                    response.status()
                );
            }
            tracing::info!("Logged in to {}", self.capabilities.name);
        }

        self.initialized = true;
        Ok(())
    }

    async fn search(&mut self, query: &Query) -> Result<SearchResults> {
        if !self.initialized {
            bail!("Engine used before initialization: {}", self.capabilities.id);
        }

        let url = format!("{}/awards", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&Self::search_params(query))
            .send()
            .await
            .context(format!("Search request failed for {}", self.capabilities.id))?;

        let mut results = SearchResults::new(query.clone());

        if response.status().as_u16() == 429 {
            results.blocked = true;
            return Ok(results);
        }
        if !response.status().is_success() {
            results.error = Some(format!("HTTP {}", response.status()));
            return Ok(results);
        }

        let body = response
            .text()
            .await
            .context("Failed to read feed response body")?;
        assets::save_json_asset(&query.assets.json, &body).await?;

        let feed: FeedResponse =
            serde_json::from_str(&body).context("Failed to decode feed response")?;

        results.error = feed.error;
        results.blocked = feed.blocked;
        if results.error.is_none() && self.parse {
            results.awards = Some(feed.awards.unwrap_or_default());
        }
        Ok(results)
    }

    async fn close(&mut self) -> Result<()> {
        self.initialized = false;
        Ok(())
    }
}
