use std::collections::{BTreeMap, HashMap};

use hf_enrich_core::config::{load_bundled_mapping, MappingConfig};
use hf_enrich_core::enrich::{build_enrichment_map, enrich_models};
use hf_enrich_core::stats::EnrichStats;
use hf_enrich_core::{HfModel, OrEndpoint, OrModel, OrPricing, Pricing, ProviderEntry};

fn endpoint(provider: &str, prompt: &str, completion: &str) -> OrEndpoint {
    OrEndpoint {
        provider_name: provider.to_string(),
        pricing: Some(OrPricing {
            prompt: prompt.to_string(),
            completion: completion.to_string(),
        }),
        uptime_last_30m: None,
        context_length: None,
        quantization: None,
        max_completion_tokens: None,
        supported_parameters: Vec::new(),
    }
}

fn test_config() -> MappingConfig {
    MappingConfig {
        provider_aliases: BTreeMap::from([("foo-ai".to_string(), "foo".to_string())]),
        parameter_capabilities: BTreeMap::from([
            ("tools".to_string(), "supports_tools".to_string()),
            ("temperature".to_string(), "supports_temperature".to_string()),
        ]),
    }
}

#[test]
fn per_token_costs_convert_to_per_million() {
    let config = test_config();
    let map = build_enrichment_map(&[endpoint("foo", "0.000001", "0")], &config);
    let pricing = map["foo"].pricing.expect("pricing should be present");
    assert_eq!(pricing.input, 1.00);
    assert_eq!(pricing.output, 0.0);
}

#[test]
fn all_zero_pricing_is_omitted() {
    let config = test_config();
    let map = build_enrichment_map(&[endpoint("foo", "0", "0")], &config);
    assert!(map["foo"].pricing.is_none());
}

#[test]
fn enrichment_keyed_by_lowercase_provider() {
    let config = test_config();
    let map = build_enrichment_map(&[endpoint("DeepInfra", "0.000001", "0.000002")], &config);
    assert!(map.contains_key("deepinfra"));
}

#[test]
fn endpoints_without_provider_name_skipped() {
    let config = test_config();
    let map = build_enrichment_map(&[endpoint("", "0.000001", "0.000002")], &config);
    assert!(map.is_empty());
}

#[test]
fn existing_pricing_never_overwritten() {
    let config = test_config();
    let mut entry = ProviderEntry::new("foo-ai");
    entry.pricing = Some(Pricing {
        input: 1.0,
        output: 2.0,
    });
    let mut models = vec![HfModel {
        id: "X".to_string(),
        providers: vec![entry],
    }];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![endpoint("foo", "0.000005", "0.000006")],
    }];
    let mut stats = EnrichStats::new(1);

    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    let pricing = models[0].providers[0].pricing.unwrap();
    assert_eq!(pricing.input, 1.0);
    assert_eq!(pricing.output, 2.0);
    assert_eq!(stats.providers_enriched, 0);
    assert_eq!(stats.models_enriched, 0);
    // The model still counts as mapped.
    assert_eq!(stats.models_with_mapping, 1);
}

#[test]
fn normalized_provider_receives_pricing() {
    // Model "X" is served by "foo-ai" on the hub; OpenRouter spells
    // the same backend "foo".
    let config = test_config();
    let mut models = vec![HfModel {
        id: "X".to_string(),
        providers: vec![ProviderEntry::new("foo-ai")],
    }];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![endpoint("foo", "0.000002", "0.000004")],
    }];
    let mut stats = EnrichStats::new(1);

    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    let pricing = models[0].providers[0].pricing.expect("pricing applied");
    assert_eq!(pricing.input, 2.0);
    assert_eq!(pricing.output, 4.0);
    assert_eq!(stats.models_with_mapping, 1);
    assert_eq!(stats.models_enriched, 1);
    assert_eq!(stats.providers_enriched, 1);
}

#[test]
fn unmapped_models_and_unmatched_providers_untouched() {
    let config = test_config();
    let mut models = vec![
        HfModel {
            id: "unmapped".to_string(),
            providers: vec![ProviderEntry::new("foo-ai")],
        },
        HfModel {
            id: "X".to_string(),
            providers: vec![ProviderEntry::new("unrelated-backend")],
        },
    ];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![endpoint("foo", "0.000002", "0.000004")],
    }];
    let mut stats = EnrichStats::new(2);

    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    assert!(models[0].providers[0].pricing.is_none());
    assert!(models[1].providers[0].pricing.is_none());
    assert_eq!(stats.models_with_mapping, 1);
    assert_eq!(stats.providers_enriched, 0);
}

#[test]
fn uptime_context_and_quantization_merge() {
    let config = test_config();
    let mut ep = endpoint("foo", "0", "0");
    ep.uptime_last_30m = Some(99.987);
    ep.context_length = Some(131072);
    ep.quantization = Some("fp8".to_string());

    let mut entry = ProviderEntry::new("foo-ai");
    entry.uptime_30d = Some(42.0); // stale value, differs -> updated
    let mut models = vec![HfModel {
        id: "X".to_string(),
        providers: vec![entry],
    }];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![ep],
    }];
    let mut stats = EnrichStats::new(1);

    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    let entry = &models[0].providers[0];
    assert_eq!(entry.uptime_30d, Some(99.99));
    assert_eq!(entry.context_length, Some(131072));
    assert_eq!(entry.quantization.as_deref(), Some("fp8"));
    assert_eq!(stats.uptime.count, 1);
    assert_eq!(stats.uptime.min, 99.99);
}

#[test]
fn capability_count_excludes_derived_flags() {
    let config = load_bundled_mapping().unwrap();
    let mut ep = endpoint("foo", "0", "0");
    ep.supported_parameters = vec!["tools".to_string()];

    let mut models = vec![HfModel {
        id: "X".to_string(),
        providers: vec![ProviderEntry::new("foo")],
    }];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![ep],
    }];
    let mut stats = EnrichStats::new(1);

    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    let entry = &models[0].providers[0];
    // The full flag set lands on the entry (18 distinct flags)...
    assert_eq!(entry.capabilities.len(), 18);
    assert_eq!(entry.capabilities.get("supports_tools"), Some(&true));
    assert_eq!(entry.capabilities.get("supports_function_calling"), Some(&true));
    // ...but supports_tools and supports_structured_output are not
    // tallied, so 16 count as new.
    assert_eq!(stats.new_capabilities_added, 16);
}

#[test]
fn reapplying_enrichment_changes_nothing() {
    let config = test_config();
    let mut ep = endpoint("foo", "0.000002", "0.000004");
    ep.uptime_last_30m = Some(99.5);
    ep.supported_parameters = vec!["tools".to_string(), "temperature".to_string()];

    let mut models = vec![HfModel {
        id: "X".to_string(),
        providers: vec![ProviderEntry::new("foo-ai")],
    }];
    let id_map = HashMap::from([("X".to_string(), "X-ext".to_string())]);
    let or_models = vec![OrModel {
        id: "X-ext".to_string(),
        hugging_face_id: Some("X".to_string()),
        endpoints: vec![ep],
    }];

    let mut stats = EnrichStats::new(1);
    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);
    let first = serde_json::to_value(&models).unwrap();
    let first_caps = stats.new_capabilities_added;

    let mut stats = EnrichStats::new(1);
    enrich_models(&mut models, &id_map, &or_models, &config, &mut stats);

    assert_eq!(serde_json::to_value(&models).unwrap(), first);
    assert!(first_caps > 0);
    // Second pass: every field already matches, nothing is new.
    assert_eq!(stats.new_capabilities_added, 0);
    assert_eq!(stats.providers_enriched, 0);
}
