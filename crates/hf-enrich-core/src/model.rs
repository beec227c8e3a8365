use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A model record from the hub's router listing, with the providers
/// currently serving it. Records are annotated in place by the
/// enrichment and probing passes; entries are never added or removed
/// after the fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfModel {
    pub id: String,
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Live,
    Staging,
    Offline,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Staging => write!(f, "staging"),
            Self::Offline => write!(f, "offline"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Prices in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input: f64,
    pub output: f64,
}

/// One provider serving a model. Every field except `provider` is
/// optional and absent from serialized output when unset. Capability
/// flags (`supports_*`) live in the flattened map so the set can grow
/// with the parameter table without touching this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProviderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_30d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_tps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_tested_at: Option<String>,
    #[serde(flatten)]
    pub capabilities: BTreeMap<String, bool>,
}

impl ProviderEntry {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: None,
            pricing: None,
            uptime_30d: None,
            context_length: None,
            quantization: None,
            max_completion_tokens: None,
            latency_s: None,
            throughput_tps: None,
            performance_error: None,
            performance_tested_at: None,
            capabilities: BTreeMap::new(),
        }
    }

    /// Whether any enrichment field has landed on this entry.
    pub fn is_enriched(&self) -> bool {
        self.pricing.is_some()
            || self.uptime_30d.is_some()
            || self.quantization.is_some()
            || !self.capabilities.is_empty()
    }

    /// Whether a probe run measured this entry.
    pub fn has_performance(&self) -> bool {
        self.latency_s.is_some() && self.throughput_tps.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_maps_to_unknown() {
        let entry: ProviderEntry =
            serde_json::from_value(serde_json::json!({"provider": "x", "status": "error"}))
                .unwrap();
        assert_eq!(entry.status, Some(ProviderStatus::Unknown));
    }

    #[test]
    fn absent_fields_stay_absent_on_output() {
        let entry = ProviderEntry::new("novita");
        let value = serde_json::to_value(&entry).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1, "only `provider` should be present: {obj:?}");
    }

    #[test]
    fn capability_flags_flatten_to_top_level() {
        let mut entry = ProviderEntry::new("groq");
        entry.capabilities.insert("supports_tools".into(), true);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["supports_tools"], serde_json::json!(true));

        let back: ProviderEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back.capabilities.get("supports_tools"), Some(&true));
    }
}
