use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{EnrichError, Result};
use crate::model::HfModel;
use crate::openrouter::{OrEndpoint, OrModel};

const HF_MODELS_API: &str = "https://router.huggingface.co/v1/models";
const OPENROUTER_MODELS_API: &str = "https://openrouter.ai/api/v1/models";

/// Pause between per-model endpoint detail calls, to stay friendly with
/// the upstream rate limit.
const DETAIL_PAUSE: Duration = Duration::from_millis(100);

#[derive(Deserialize)]
struct Listing<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct EndpointDetail {
    data: EndpointData,
}

#[derive(Deserialize)]
struct EndpointData {
    #[serde(default)]
    endpoints: Vec<OrEndpoint>,
}

pub struct RouterClient {
    http: Client,
    token: Option<String>,
}

impl RouterClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("failed to build HTTP client"),
            token,
        }
    }

    /// Try to find token from env or `~/.cache/huggingface/token`.
    pub fn with_auto_token() -> Self {
        let token = std::env::var("HF_TOKEN")
            .or_else(|_| std::env::var("HUGGING_FACE_HUB_TOKEN"))
            .ok()
            .or_else(|| {
                let path = dirs::home_dir()?.join(".cache/huggingface/token");
                std::fs::read_to_string(path)
                    .ok()
                    .map(|s| s.trim().to_string())
            });
        Self::new(token)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    async fn get_listing<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut req = self.http.get(url);
        if let Some(auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }
        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(EnrichError::Api { status, body });
        }
        let listing: Listing<T> = resp.json().await?;
        Ok(listing.data)
    }

    /// Fetch the hub router model listing. Failure is fatal.
    pub async fn hf_models(&self) -> Result<Vec<HfModel>> {
        self.get_listing(HF_MODELS_API).await
    }

    /// Fetch the OpenRouter model listing. Failure is fatal.
    pub async fn openrouter_models(&self) -> Result<Vec<OrModel>> {
        self.get_listing(OPENROUTER_MODELS_API).await
    }

    /// Fetch one model's endpoint detail. Any failure means "no detail
    /// available" and is logged, never propagated.
    pub async fn model_endpoints(&self, model_id: &str) -> Option<Vec<OrEndpoint>> {
        let url = format!("{OPENROUTER_MODELS_API}/{model_id}/endpoints");
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(model = %model_id, error = %e, "endpoint detail fetch failed");
                return None;
            }
        };
        if resp.status().as_u16() != 200 {
            tracing::warn!(model = %model_id, status = resp.status().as_u16(), "endpoint detail unavailable");
            return None;
        }
        match resp.json::<EndpointDetail>().await {
            Ok(detail) => Some(detail.data.endpoints),
            Err(e) => {
                tracing::warn!(model = %model_id, error = %e, "endpoint detail decode failed");
                None
            }
        }
    }

    /// Attach endpoint detail to every listed model, sequentially, with
    /// a short pause between calls. `progress` is invoked before each
    /// fetch so callers can render their own progress display.
    pub async fn attach_endpoints<F>(&self, models: &mut [OrModel], mut progress: F)
    where
        F: FnMut(usize, &str),
    {
        for (i, model) in models.iter_mut().enumerate() {
            if model.id.is_empty() {
                continue;
            }
            progress(i, &model.id);
            if let Some(endpoints) = self.model_endpoints(&model.id).await {
                model.endpoints = endpoints;
            }
            tokio::time::sleep(DETAIL_PAUSE).await;
        }
    }
}
