use serde::{Deserialize, Serialize};

/// A model from the OpenRouter listing. `endpoints` is empty until the
/// per-model detail fetch attaches it (or when that fetch came back
/// unavailable). These records are read-only sources of truth for the
/// enrichment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugging_face_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<OrEndpoint>,
}

/// One (model, provider) serving configuration with its own pricing,
/// uptime and supported request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrEndpoint {
    #[serde(default)]
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<OrPricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_last_30m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_parameters: Vec<String>,
}

/// Raw endpoint pricing: fractional USD per single token, as strings
/// ("0" when free).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrPricing {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub completion: String,
}

impl OrPricing {
    /// Parse a raw cost string; unparseable or empty means zero.
    pub fn cost(raw: &str) -> f64 {
        raw.trim().parse::<f64>().unwrap_or(0.0)
    }
}
