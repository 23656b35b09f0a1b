use std::{future::Future, time::Duration};

use crate::error::OptimizeError;
use crate::types::{OptimizationResult, OptimizeRequest};

/// Whatever answers `POST /optimize`. The controller only talks to this.
pub trait OptimizerBackend: Send + Sync + 'static {
    fn optimize(
        &self,
        request: OptimizeRequest,
    ) -> impl Future<Output = Result<OptimizationResult, OptimizeError>> + Send;
}

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// `timeout: None` waits for the optimizer indefinitely.
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, OptimizeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("pit_strategy_client/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| OptimizeError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/optimize", api_base.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OptimizerBackend for HttpBackend {
    async fn optimize(
        &self,
        request: OptimizeRequest,
    ) -> Result<OptimizationResult, OptimizeError> {
        tracing::debug!("POST {} payload={:?}", self.endpoint, request);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| OptimizeError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OptimizeError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| OptimizeError::Transport(e.to_string()))?;
        OptimizationResult::from_json(&body)
    }
}
