use action_center::{ActionCatalog, CatalogError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{AiInsights, CalculationId, CalculationResult},
    error::{LOAD_FAILED, RESULTS_NOT_FOUND},
    protocol::{ActionsResponse, AiInsightsResponse, CalculationList},
};
use thiserror::Error;
use tracing::info;
use url::Url;

pub mod page;
pub mod render;

pub use page::{load_insights, load_results, ActionsPage, PageState, ResultsView};

/// Base URL of the calculation service when nothing else is configured.
pub const DEFAULT_CALCULATION_SERVICE_URL: &str = "http://localhost:8001";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid service url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Message shown on a results page that failed to load. Any non-success
    /// status reads as "not found".
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status { .. } => RESULTS_NOT_FOUND.to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    LOAD_FAILED.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// Parses and normalises an http(s) service base URL.
pub fn parse_service_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http or https base url".to_string(),
        });
    }
    Ok(url)
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

async fn get_ok(http: &Client, url: Url) -> Result<reqwest::Response, FetchError> {
    let response = http.get(url.clone()).send().await?;
    ensure_success(url, response)
}

fn ensure_success(url: Url, response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status,
        })
    }
}

/// Read access to the external calculation service.
#[async_trait]
pub trait CalculationBackend: Send + Sync {
    async fn fetch_calculation(&self, id: &CalculationId) -> Result<CalculationResult, FetchError>;
    async fn generate_ai_insights(&self, id: &CalculationId) -> Result<AiInsights, FetchError>;
    async fn list_calculations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<CalculationList, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CalculationClient {
    http: Client,
    base_url: Url,
}

impl CalculationClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_service_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl CalculationBackend for CalculationClient {
    async fn fetch_calculation(&self, id: &CalculationId) -> Result<CalculationResult, FetchError> {
        let url = endpoint(&self.base_url, &["api", "v1", "calculation", id.as_str()]);
        let result: CalculationResult = get_ok(&self.http, url).await?.json().await?;
        info!(calculation_id = %id, total_co2e = result.total_co2e, "calculation loaded");
        Ok(result)
    }

    async fn generate_ai_insights(&self, id: &CalculationId) -> Result<AiInsights, FetchError> {
        let url = endpoint(&self.base_url, &["api", "v1", "ai-insights", id.as_str()]);
        let response = self.http.post(url.clone()).send().await?;
        let body: AiInsightsResponse = ensure_success(url, response)?.json().await?;
        info!(calculation_id = %id, "ai insights generated");
        Ok(body.ai_insights)
    }

    async fn list_calculations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<CalculationList, FetchError> {
        let mut url = endpoint(&self.base_url, &["api", "v1", "calculations"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(get_ok(&self.http, url).await?.json().await?)
    }
}

/// Client for the front server's own `/api/actions` route.
#[derive(Debug, Clone)]
pub struct ActionsClient {
    http: Client,
    app_url: Url,
}

impl ActionsClient {
    pub fn new(app_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http: Client::new(),
            app_url: parse_service_url(app_url)?,
        })
    }

    /// Fetches the catalog. A payload without an `actions` field yields the
    /// built-in fallback catalog.
    pub async fn fetch_actions(&self) -> Result<ActionCatalog, FetchError> {
        let url = endpoint(&self.app_url, &["api", "actions"]);
        let body: ActionsResponse = get_ok(&self.http, url).await?.json().await?;
        Ok(ActionCatalog::from_response(body)?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
