use std::collections::{BTreeMap, HashMap};

use crate::config::MappingConfig;
use crate::model::{HfModel, Pricing, ProviderEntry};
use crate::openrouter::{OrEndpoint, OrModel, OrPricing};
use crate::stats::EnrichStats;

/// Flags that the derived-flag rules also set; changes to them are not
/// counted as new capabilities so a parameter and its derived flag are
/// never tallied twice.
const DERIVED_FLAGS: [&str; 2] = ["supports_tools", "supports_structured_output"];

/// Per-provider enrichment derived from one model's endpoint list.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub pricing: Option<Pricing>,
    pub uptime_30d: Option<f64>,
    pub context_length: Option<u64>,
    pub quantization: Option<String>,
    pub capabilities: BTreeMap<String, bool>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a fractional per-token cost to USD per million tokens.
fn per_million(cost: f64) -> f64 {
    round2(cost * 1_000_000.0)
}

/// Index one model's endpoints by lowercased provider name. Pricing is
/// carried only when at least one of the two raw costs is non-zero.
pub fn build_enrichment_map(
    endpoints: &[OrEndpoint],
    config: &MappingConfig,
) -> HashMap<String, Enrichment> {
    let mut map = HashMap::new();

    for endpoint in endpoints {
        if endpoint.provider_name.is_empty() {
            continue;
        }

        let mut enrichment = Enrichment::default();

        if let Some(pricing) = &endpoint.pricing {
            let prompt = OrPricing::cost(&pricing.prompt);
            let completion = OrPricing::cost(&pricing.completion);
            if prompt != 0.0 || completion != 0.0 {
                enrichment.pricing = Some(Pricing {
                    input: per_million(prompt),
                    output: per_million(completion),
                });
            }
        }

        if let Some(uptime) = endpoint.uptime_last_30m {
            enrichment.uptime_30d = Some(round2(uptime));
        }
        if let Some(context) = endpoint.context_length {
            if context > 0 {
                enrichment.context_length = Some(context);
            }
        }
        if let Some(quant) = &endpoint.quantization {
            if !quant.is_empty() {
                enrichment.quantization = Some(quant.clone());
            }
        }
        if !endpoint.supported_parameters.is_empty() {
            enrichment.capabilities = config.capabilities(&endpoint.supported_parameters);
        }

        map.insert(endpoint.provider_name.to_lowercase(), enrichment);
    }

    map
}

/// Merge enrichment into a provider entry.
///
/// Fields are applied only when absent or different from the current
/// value. Pricing is the exception: it is applied only when the entry
/// has none, so a re-run never clobbers hand-verified or previously
/// recorded prices. Returns whether pricing was newly applied.
fn apply_enrichment(
    entry: &mut ProviderEntry,
    enrichment: &Enrichment,
    stats: &mut EnrichStats,
) -> bool {
    let had_pricing = entry.pricing.is_some();

    if !had_pricing {
        if let Some(pricing) = enrichment.pricing {
            entry.pricing = Some(pricing);
        }
    }
    if let Some(uptime) = enrichment.uptime_30d {
        if entry.uptime_30d != Some(uptime) {
            entry.uptime_30d = Some(uptime);
        }
    }
    if let Some(context) = enrichment.context_length {
        if entry.context_length != Some(context) {
            entry.context_length = Some(context);
        }
    }
    if let Some(quant) = &enrichment.quantization {
        if entry.quantization.as_deref() != Some(quant.as_str()) {
            entry.quantization = Some(quant.clone());
        }
    }
    for (flag, &value) in &enrichment.capabilities {
        if entry.capabilities.get(flag) != Some(&value) {
            entry.capabilities.insert(flag.clone(), value);
            if !DERIVED_FLAGS.contains(&flag.as_str()) {
                stats.new_capabilities_added += 1;
            }
        }
    }

    if !had_pricing && enrichment.pricing.is_some() {
        stats.providers_enriched += 1;
        return true;
    }
    false
}

/// Enrich every mapped hub model from its OpenRouter endpoint list.
/// Unmapped models and unmatched providers are skipped, never failed.
pub fn enrich_models(
    models: &mut [HfModel],
    id_map: &HashMap<String, String>,
    or_models: &[OrModel],
    config: &MappingConfig,
    stats: &mut EnrichStats,
) {
    let or_index: HashMap<&str, &OrModel> =
        or_models.iter().map(|m| (m.id.as_str(), m)).collect();

    for model in models.iter_mut() {
        let Some(or_id) = id_map.get(&model.id) else {
            tracing::debug!(model = %model.id, "no cross-catalog mapping, left unenriched");
            continue;
        };
        stats.models_with_mapping += 1;

        let Some(or_model) = or_index.get(or_id.as_str()) else {
            tracing::debug!(model = %model.id, target = %or_id, "mapped target missing from listing");
            continue;
        };
        if or_model.endpoints.is_empty() {
            tracing::debug!(model = %model.id, target = %or_id, "no endpoint detail available");
            continue;
        }

        let enrichment_map = build_enrichment_map(&or_model.endpoints, config);

        let mut model_enriched = false;
        for entry in &mut model.providers {
            let key = config.normalize_provider(&entry.provider);
            let Some(enrichment) = enrichment_map.get(&key) else {
                tracing::debug!(model = %model.id, provider = %entry.provider, "no endpoint for provider");
                continue;
            };
            if apply_enrichment(entry, enrichment, stats) {
                model_enriched = true;
            }
            if let Some(uptime) = enrichment.uptime_30d {
                stats.uptime.record(uptime);
            }
        }
        if model_enriched {
            stats.models_enriched += 1;
        }
    }
}
