use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EnrichError, Result};
use crate::model::HfModel;
use crate::stats::EnrichStats;

/// The persisted output of one run: the enriched records plus when and
/// how they were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub data: Vec<HfModel>,
    pub generated_at: String,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub total_models: usize,
    pub models_with_mapping: usize,
    pub models_enriched: usize,
    pub performance_tested: bool,
}

impl Snapshot {
    pub fn new(data: Vec<HfModel>, stats: &EnrichStats, performance_tested: bool) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            metadata: SnapshotMetadata {
                total_models: data.len(),
                models_with_mapping: stats.models_with_mapping,
                models_enriched: stats.models_enriched,
                performance_tested,
            },
            data,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| EnrichError::Io(format!("failed to write {}: {e}", path.display())))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EnrichError::Io(format!("failed to read {}: {e}", path.display())))?;
        Ok(serde_json::from_str(&content)?)
    }
}
