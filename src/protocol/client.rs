use crate::protocol::messages::{DeltaResponse, Light, StateDelta};
use async_trait::async_trait;
use derive_builder::Builder;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.lifx.com/v1";

#[derive(Error, Debug)]
pub enum LifxClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The two lighting-service operations this program consumes. The sequencer
/// is written against this trait so it can run against a fake in tests.
#[async_trait]
pub trait Lights {
    async fn list_lights(&self, selector: &str) -> Result<Vec<Light>, LifxClientError>;
    async fn state_delta(
        &self,
        selector: &str,
        delta: &StateDelta,
    ) -> Result<DeltaResponse, LifxClientError>;
}

#[derive(Builder)]
pub struct LifxOptions {
    pub api_key: String,
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    pub base_url: String,
}

impl LifxOptions {
    pub fn builder() -> LifxOptionsBuilder {
        LifxOptionsBuilder::default()
    }
}

pub struct LifxClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LifxClient {
    pub fn new(options: LifxOptions) -> Self {
        LifxClient {
            http: reqwest::Client::new(),
            api_key: options.api_key,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lights_url(&self, selector: &str) -> String {
        format!("{}/lights/{}", self.base_url, selector)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LifxClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(LifxClientError::Api { status, body })
        }
    }
}

#[async_trait]
impl Lights for LifxClient {
    async fn list_lights(&self, selector: &str) -> Result<Vec<Light>, LifxClientError> {
        let url = self.lights_url(selector);
        debug!("Listing lights: GET {url}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let lights: Vec<Light> = Self::check_status(response).await?.json().await?;
        info!("Lighting service reported {} light(s)", lights.len());
        Ok(lights)
    }

    async fn state_delta(
        &self,
        selector: &str,
        delta: &StateDelta,
    ) -> Result<DeltaResponse, LifxClientError> {
        let url = format!("{}/state/delta", self.lights_url(selector));
        debug!("Applying state delta: POST {url} {delta:?}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(delta)
            .send()
            .await?;
        Self::check_status(response).await?.json().await.map_err(Into::into)
    }
}
