use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EnrichError, Result};

/// The two lookup tables driving reconciliation, from mapping.toml.
/// Passed explicitly into the components that consult them so tests
/// can substitute their own tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Hub provider spelling -> OpenRouter provider spelling.
    pub provider_aliases: BTreeMap<String, String>,
    /// Supported-parameter name -> supports_* capability flag.
    pub parameter_capabilities: BTreeMap<String, String>,
}

impl MappingConfig {
    /// Normalize a hub provider name to the OpenRouter spelling.
    /// Total: unknown names fall back to their own lowercase.
    pub fn normalize_provider(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        self.provider_aliases.get(&lower).cloned().unwrap_or(lower)
    }

    /// Convert a supported-parameter list into capability flags. Every
    /// flag in the table starts false; each recognized parameter sets
    /// its flag; unrecognized parameters are ignored.
    ///
    /// `tools` or `tool_choice` imply both `supports_tools` and
    /// `supports_function_calling`; `structured_outputs` or
    /// `response_format` imply `supports_structured_output`.
    pub fn capabilities(&self, params: &[String]) -> BTreeMap<String, bool> {
        let mut flags: BTreeMap<String, bool> = self
            .parameter_capabilities
            .values()
            .map(|flag| (flag.clone(), false))
            .collect();

        for param in params {
            if let Some(flag) = self.parameter_capabilities.get(param) {
                flags.insert(flag.clone(), true);
            }
        }

        let has = |name: &str| params.iter().any(|p| p == name);
        if has("tools") || has("tool_choice") {
            flags.insert("supports_tools".to_string(), true);
            flags.insert("supports_function_calling".to_string(), true);
        }
        if has("structured_outputs") || has("response_format") {
            flags.insert("supports_structured_output".to_string(), true);
        }

        flags
    }
}

/// Parse a mapping.toml string.
pub fn parse_mapping(toml_str: &str) -> Result<MappingConfig> {
    let config: MappingConfig =
        toml::from_str(toml_str).map_err(|e| EnrichError::Io(format!("bad mapping.toml: {e}")))?;
    for flag in config.parameter_capabilities.values() {
        if !flag.starts_with("supports_") {
            return Err(EnrichError::Other(format!(
                "capability flag must start with supports_: {flag}"
            )));
        }
    }
    Ok(config)
}

/// Load the bundled mapping.toml from the data/ directory.
pub fn load_bundled_mapping() -> Result<MappingConfig> {
    let toml_str = include_str!("../../../data/mapping.toml");
    parse_mapping(toml_str)
}

/// Return the path to a cached data file, if the cache directory is
/// available. Creates the directory on first use.
#[cfg(feature = "network")]
pub fn cache_path(filename: &str) -> Option<std::path::PathBuf> {
    let dir = dirs::cache_dir()?.join("hf-enrich");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir.join(filename))
}

/// Load mapping tables: cached file if present and valid, otherwise
/// bundled.
#[cfg(feature = "network")]
pub fn load_mapping_cached() -> Result<MappingConfig> {
    if let Some(path) = cache_path("mapping.toml") {
        if let Ok(content) = std::fs::read_to_string(&path) {
            if let Ok(parsed) = parse_mapping(&content) {
                return Ok(parsed);
            }
        }
    }
    load_bundled_mapping()
}
