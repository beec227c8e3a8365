use std::collections::HashMap;

use crate::openrouter::OrModel;

const FREE_SUFFIX: &str = ":free";
const CANONICAL_LLAMA_PREFIX: &str = "meta-llama/Meta-Llama-";
const SHORT_LLAMA_PREFIX: &str = "meta-llama/Llama-";

/// Build the hub-id -> OpenRouter-id map from the OpenRouter listing.
///
/// A record contributes a mapping when it carries a non-empty
/// `hugging_face_id` and its own id is not a `:free` variant. The first
/// record wins for a given hub id (listing order); mappings are never
/// overwritten. Llama models listed under the canonical `Meta-Llama-`
/// spelling also register their short `Llama-` alias.
pub fn build_id_map(models: &[OrModel]) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for model in models {
        let hf_id = match model.hugging_face_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        if model.id.ends_with(FREE_SUFFIX) {
            continue;
        }
        if map.contains_key(hf_id) {
            continue;
        }
        map.insert(hf_id.to_string(), model.id.clone());

        if let Some(rest) = hf_id.strip_prefix(CANONICAL_LLAMA_PREFIX) {
            let alias = format!("{SHORT_LLAMA_PREFIX}{rest}");
            map.entry(alias).or_insert_with(|| model.id.clone());
        }
    }

    map
}
