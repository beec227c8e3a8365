use serde::Serialize;

/// Counters accumulated during the enrichment pass. Read-only once the
/// run completes.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichStats {
    pub total_models: usize,
    pub models_with_mapping: usize,
    pub models_enriched: usize,
    pub providers_enriched: usize,
    pub new_capabilities_added: usize,
    pub uptime: UptimeStats,
}

impl EnrichStats {
    pub fn new(total_models: usize) -> Self {
        Self {
            total_models,
            models_with_mapping: 0,
            models_enriched: 0,
            providers_enriched: 0,
            new_capabilities_added: 0,
            uptime: UptimeStats::default(),
        }
    }
}

/// Running min/max/sum/count of observed 30-day uptime percentages.
#[derive(Debug, Clone, Serialize)]
pub struct UptimeStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl Default for UptimeStats {
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 0.0,
            sum: 0.0,
            count: 0,
        }
    }
}

impl UptimeStats {
    pub fn record(&mut self, uptime: f64) {
        self.min = self.min.min(uptime);
        self.max = self.max.max(uptime);
        self.sum += uptime;
        self.count += 1;
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Tally of one probe run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeSummary {
    pub total_tested: usize,
    pub successful: usize,
    pub errors: usize,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub live: usize,
    pub offline: usize,
    pub not_tested: usize,
}
