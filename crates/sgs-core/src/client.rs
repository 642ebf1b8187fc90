//! HTTP client with rate limiting for the SGS service
//!
//! This module provides a rate-limited HTTP client for the two SGS endpoints:
//! the JSON REST API for observations and the legacy series locator, which
//! needs a session cookie before it accepts a search form.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Result, SgsError};
use crate::types::Language;

/// Base URL of the REST API
const DEFAULT_API_BASE_URL: &str = "https://api.bcb.gov.br";

/// Base URL of the series locator
const DEFAULT_SEARCH_BASE_URL: &str = "https://www3.bcb.gov.br";

/// Locator form endpoint, relative to the search base URL
const SEARCH_FORM_PATH: &str = "/sgspub/localizarseries/localizarSeries.do";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use sgs_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Wait until the minimum interval since the previous request has passed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the SGS HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Total attempts per request, first try included (default: 5)
    pub max_attempts: u32,
    /// Delay unit for linear back-off: attempt `n` waits `n * retry_delay_ms`
    /// (default: 200)
    pub retry_delay_ms: u64,
    /// Base URL of the REST API
    pub api_base_url: String,
    /// Base URL of the series locator
    pub search_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_attempts: 5,
            retry_delay_ms: 200,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
        }
    }
}

/// Kind of series locator query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Exact series code
    Code,
    /// Free text over series names
    Text,
}

impl SearchKind {
    fn method(self) -> &'static str {
        match self {
            SearchKind::Code => "localizarSeriesPorCodigo",
            SearchKind::Text => "localizarSeriesPorTexto",
        }
    }

    fn query_field(self) -> &'static str {
        match self {
            SearchKind::Code => "codigo",
            SearchKind::Text => "texto",
        }
    }

    fn search_type(self) -> &'static str {
        match self {
            SearchKind::Code => "4",
            SearchKind::Text => "6",
        }
    }
}

/// HTTP client for the SGS service with rate limiting and retry logic
///
/// This client automatically:
/// - Limits request rate to avoid server overload
/// - Retries transport errors, 429 and 5xx with linear back-off
/// - Keeps cookies so locator searches share a session
pub struct SgsClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl SgsClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `SgsError::InvalidConfig` - `requests_per_second` is not a finite
    ///   positive number
    /// - `SgsError::HttpError` - the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let rps = config.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(SgsError::InvalidConfig(format!(
                "requests_per_second must be a finite positive number, got {}",
                rps
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the raw JSON observations of a series.
    ///
    /// # Arguments
    /// * `code` - Series code
    /// * `begin`, `end` - Range bounds in `dd/MM/yyyy`
    ///
    /// # Errors
    /// - `SgsError::HttpError` - Network or HTTP error after all retries
    /// - `SgsError::RateLimited` - Server returned 429 after all retries
    /// - `SgsError::NotFound` - Server returned 404
    pub async fn fetch_series_json(&self, code: u32, begin: &str, end: &str) -> Result<String> {
        let url = format!(
            "{}/dados/serie/bcdata.sgs.{}/dados?formato=json&dataInicial={}&dataFinal={}",
            self.config.api_base_url,
            code,
            urlencoding::encode(begin),
            urlencoding::encode(end),
        );

        let client = &self.client;
        let url = url.as_str();
        self.send_with_retry(url, move || async move {
            Ok::<_, SgsError>(client.get(url).send().await?)
        })
        .await
    }

    /// Run a series locator query and return the result page HTML.
    ///
    /// Every attempt requests the language landing page first, so the session
    /// cookie selects the page language, then posts the search form.
    pub async fn fetch_search_page(
        &self,
        language: Language,
        kind: SearchKind,
        query: &str,
    ) -> Result<String> {
        let landing_url = match language {
            Language::Pt => format!("{}/sgspub/index.jsp?idIdioma=P", self.config.search_base_url),
            Language::En => format!("{}/sgspub/", self.config.search_base_url),
        };
        let form_url = format!("{}{}", self.config.search_base_url, SEARCH_FORM_PATH);
        let form = search_form(kind, query);

        let client = &self.client;
        let landing_url = landing_url.as_str();
        let form_url = form_url.as_str();
        let form = &form;
        self.send_with_retry(form_url, move || async move {
            client.get(landing_url).send().await?.error_for_status()?;
            Ok::<_, SgsError>(client.post(form_url).form(form).send().await?)
        })
        .await
    }

    /// Send a request, retrying transient failures.
    ///
    /// `send` is called once per attempt. Transport errors, 429 and 5xx are
    /// retried until `max_attempts` is reached; 404 is never retried.
    async fn send_with_retry<F, Fut>(&self, url: &str, send: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            // Wait for rate limiter before making request
            self.rate_limiter.acquire().await;
            debug!(url, attempt, "sending request");

            let reason = match send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    // Handle 404 - Not Found (no retry)
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(SgsError::NotFound(url.to_string()));
                    }

                    let transient = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error();
                    if !transient || attempt >= max_attempts {
                        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                            return Err(SgsError::RateLimited);
                        }
                        return Err(match response.error_for_status() {
                            Err(e) => SgsError::HttpError(e),
                            Ok(response) => SgsError::UnexpectedStatus(response.status().as_u16()),
                        });
                    }
                    format!("status {}", status)
                }
                Err(SgsError::HttpError(e)) if attempt < max_attempts => e.to_string(),
                Err(e) => return Err(e),
            };

            let delay = self.calculate_backoff_delay(attempt);
            warn!(url, attempt, %reason, delay_ms = delay.as_millis() as u64, "retrying request");
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Linear back-off: `retry_delay_ms`, `2 * retry_delay_ms`, ...
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_delay_ms * u64::from(attempt))
    }
}

/// Form fields of a locator query.
fn search_form(kind: SearchKind, query: &str) -> Vec<(&'static str, String)> {
    vec![
        ("method", kind.method().to_string()),
        ("periodicidade", "0".to_string()),
        (kind.query_field(), query.to_string()),
        ("fonte", "341".to_string()),
        ("hdTipoPesquisa", kind.search_type().to_string()),
        ("hdTipoOrdenacao", "0".to_string()),
        ("hdPeriodicidade", "Todas".to_string()),
        (
            "linkRetorno",
            "/sgspub/consultarvalores/telaCvsSelecionarSeries.paint".to_string(),
        ),
        (
            "linkCriarFiltros",
            "/sgspub/manterfiltros/telaMfsCriarFiltro.paint".to_string(),
        ),
    ]
}
