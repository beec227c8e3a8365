use hf_enrich_core::mapping::build_id_map;
use hf_enrich_core::OrModel;

fn or_model(id: &str, hf_id: Option<&str>) -> OrModel {
    OrModel {
        id: id.to_string(),
        hugging_face_id: hf_id.map(String::from),
        endpoints: Vec::new(),
    }
}

#[test]
fn cross_reference_builds_mapping() {
    let models = vec![or_model("deepseek/deepseek-r1", Some("deepseek-ai/DeepSeek-R1"))];
    let map = build_id_map(&models);
    assert_eq!(
        map.get("deepseek-ai/DeepSeek-R1").map(String::as_str),
        Some("deepseek/deepseek-r1")
    );
}

#[test]
fn free_variants_excluded() {
    let models = vec![
        or_model("qwen/qwen3-8b:free", Some("Qwen/Qwen3-8B")),
        or_model("qwen/qwen3-8b", Some("Qwen/Qwen3-8B")),
    ];
    let map = build_id_map(&models);
    assert_eq!(map.get("Qwen/Qwen3-8B").map(String::as_str), Some("qwen/qwen3-8b"));
    assert!(
        map.values().all(|id| !id.ends_with(":free")),
        "no mapped target may be a :free variant"
    );
}

#[test]
fn only_free_variant_yields_no_mapping() {
    let models = vec![or_model("qwen/qwen3-8b:free", Some("Qwen/Qwen3-8B"))];
    let map = build_id_map(&models);
    assert!(map.is_empty());
}

#[test]
fn missing_or_empty_cross_reference_skipped() {
    let models = vec![
        or_model("openai/gpt-4o", None),
        or_model("some/model", Some("")),
    ];
    assert!(build_id_map(&models).is_empty());
}

#[test]
fn first_match_wins_in_listing_order() {
    let models = vec![
        or_model("mistralai/mistral-7b-instruct", Some("mistralai/Mistral-7B-Instruct-v0.3")),
        or_model("mistralai/mistral-7b-instruct-v0.3", Some("mistralai/Mistral-7B-Instruct-v0.3")),
    ];
    let map = build_id_map(&models);
    assert_eq!(
        map.get("mistralai/Mistral-7B-Instruct-v0.3").map(String::as_str),
        Some("mistralai/mistral-7b-instruct")
    );
}

#[test]
fn meta_llama_alias_registered() {
    let models = vec![or_model(
        "meta-llama/llama-3.1-8b-instruct",
        Some("meta-llama/Meta-Llama-3.1-8B-Instruct"),
    )];
    let map = build_id_map(&models);
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.get("meta-llama/Llama-3.1-8B-Instruct"),
        map.get("meta-llama/Meta-Llama-3.1-8B-Instruct")
    );
}

#[test]
fn alias_never_overwrites_existing_mapping() {
    let models = vec![
        or_model("alias-target/own", Some("meta-llama/Llama-3-8B")),
        or_model("canonical/other", Some("meta-llama/Meta-Llama-3-8B")),
    ];
    let map = build_id_map(&models);
    // The short spelling was already mapped by its own record; the
    // canonical record's alias must not replace it.
    assert_eq!(
        map.get("meta-llama/Llama-3-8B").map(String::as_str),
        Some("alias-target/own")
    );
    assert_eq!(
        map.get("meta-llama/Meta-Llama-3-8B").map(String::as_str),
        Some("canonical/other")
    );
}

#[test]
fn rebuilding_yields_identical_map() {
    let models = vec![
        or_model(
            "meta-llama/llama-3.3-70b-instruct",
            Some("meta-llama/Meta-Llama-3.3-70B-Instruct"),
        ),
        or_model("qwen/qwen3-8b", Some("Qwen/Qwen3-8B")),
        or_model("qwen/qwen3-8b:free", Some("Qwen/Qwen3-8B")),
    ];
    assert_eq!(build_id_map(&models), build_id_map(&models));
}
