use crate::config::BackendConfig;
use crate::domain::ports::PaymentRecordBackend;
use crate::domain::reconciliation::ManualUpdate;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

pub const MANUAL_UPDATE_PATH: &str = "/stripe/manual-update";

/// REST client for the institute's payment records.
#[derive(Clone)]
pub struct HttpPaymentBackend {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpPaymentBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone().filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl PaymentRecordBackend for HttpPaymentBackend {
    async fn manual_update(&self, update: &ManualUpdate) -> Result<()> {
        let url = format!("{}{MANUAL_UPDATE_PATH}", self.base_url);
        debug!(payment_id = %update.payment_id, %url, "Posting manual payment update");

        let mut request = self.http.post(&url).json(update);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CheckoutError::Backend(format!("{status}: {body}")))
        }
    }
}
