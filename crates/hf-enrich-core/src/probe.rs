use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::model::{HfModel, ProviderEntry, ProviderStatus};
use crate::stats::ProbeSummary;

pub const ROUTER_CHAT_API: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_BATCH_SIZE: usize = 20;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const BATCH_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Probe only the first N models.
    pub limit: Option<usize>,
    /// Probe only these providers (hub spelling, exact match).
    pub providers: Option<Vec<String>>,
    /// Concurrent probes per batch; batches run strictly one after
    /// another with a fixed pause in between.
    pub batch_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            limit: None,
            providers: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// One (model, provider) pair to probe, with the indices of the entry
/// it reports back to. Each entry is addressed by exactly one target,
/// so applying outcomes never contends.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub model_idx: usize,
    pub provider_idx: usize,
    pub model_id: String,
    pub provider: String,
}

/// What a single probe observed.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: ProviderStatus,
    pub latency_s: Option<f64>,
    pub throughput_tps: Option<f64>,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn live(latency_s: f64, throughput_tps: f64) -> Self {
        Self {
            status: ProviderStatus::Live,
            latency_s: Some(latency_s),
            throughput_tps: Some(throughput_tps),
            error: None,
        }
    }

    pub fn offline(error: impl Into<String>) -> Self {
        Self {
            status: ProviderStatus::Offline,
            latency_s: None,
            throughput_tps: None,
            error: Some(error.into()),
        }
    }
}

/// Flatten the (model, provider) pairs to probe, in catalog order,
/// honoring the model cap and provider allow-list.
pub fn collect_targets(models: &[HfModel], config: &ProbeConfig) -> Vec<ProbeTarget> {
    let scope = match config.limit {
        Some(n) => &models[..n.min(models.len())],
        None => models,
    };

    let mut targets = Vec::new();
    for (model_idx, model) in scope.iter().enumerate() {
        if model.id.is_empty() {
            continue;
        }
        for (provider_idx, entry) in model.providers.iter().enumerate() {
            if entry.provider.is_empty() {
                continue;
            }
            if let Some(allow) = &config.providers {
                if !allow.iter().any(|p| p == &entry.provider) {
                    continue;
                }
            }
            targets.push(ProbeTarget {
                model_idx,
                provider_idx,
                model_id: model.id.clone(),
                provider: entry.provider.clone(),
            });
        }
    }
    targets
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Send one nonce-salted chat completion through the router, addressed
/// to a specific provider, and classify the pair live/offline.
pub async fn probe_one(
    client: &reqwest::Client,
    token: &str,
    model_id: &str,
    provider: &str,
) -> ProbeOutcome {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let prompt = format!(
        "What is the capital of France?\n<!-- nonce:{} -->",
        &nonce[..8]
    );
    let payload = json!({
        "model": format!("{model_id}:{provider}"),
        "messages": [{"role": "user", "content": prompt}],
        "stream": false,
        "temperature": 0.7,
    });

    let start = Instant::now();
    let request = client
        .post(ROUTER_CHAT_API)
        .bearer_auth(token)
        .json(&payload)
        .send();

    let response = match tokio::time::timeout(PROBE_TIMEOUT, request).await {
        Err(_) => return ProbeOutcome::offline("Request timeout"),
        Ok(Err(e)) => return ProbeOutcome::offline(e.to_string()),
        Ok(Ok(resp)) => resp,
    };

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    if status == 200 {
        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => return ProbeOutcome::offline(e.to_string()),
        };
        let usage = body.get("usage");
        let read = |key: &str| {
            usage
                .and_then(|u| u.get(key))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        let total_tokens = match read("total_tokens") {
            0 => read("prompt_tokens") + read("completion_tokens"),
            t => t,
        };
        let tps = if total_tokens > 0 {
            total_tokens as f64 / latency
        } else {
            0.0
        };
        ProbeOutcome::live(round2(latency), round2(tps))
    } else {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("error")?
                    .get("message")?
                    .as_str()
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));
        ProbeOutcome::offline(message)
    }
}

/// Run one batch: every target probed concurrently, outcomes returned
/// in target order. A probe that fails (or whose task dies) resolves
/// to an offline outcome; siblings are unaffected.
pub async fn run_batch<F, Fut>(batch: Vec<ProbeTarget>, probe: F) -> Vec<(ProbeTarget, ProbeOutcome)>
where
    F: Fn(ProbeTarget) -> Fut,
    Fut: Future<Output = ProbeOutcome> + Send + 'static,
{
    let mut handles = Vec::with_capacity(batch.len());
    for target in batch {
        let task = tokio::spawn(probe(target.clone()));
        handles.push((target, task));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (target, task) in handles {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => ProbeOutcome::offline(e.to_string()),
        };
        outcomes.push((target, outcome));
    }
    outcomes
}

/// Record a probe outcome on its provider entry. Performance fields are
/// always overwritten by a new run, unlike pricing; the completion
/// timestamp is stamped regardless of outcome.
pub fn apply_outcome(entry: &mut ProviderEntry, outcome: &ProbeOutcome, tested_at: &str) {
    entry.status = Some(outcome.status.clone());
    entry.latency_s = outcome.latency_s;
    entry.throughput_tps = outcome.throughput_tps;
    entry.performance_error = outcome.error.clone();
    entry.performance_tested_at = Some(tested_at.to_string());
}

/// Probe every selected (model, provider) pair in rate-limited
/// concurrent batches and record the results on the entries.
pub async fn probe_all(
    models: &mut [HfModel],
    token: &str,
    config: &ProbeConfig,
) -> ProbeSummary {
    let targets = collect_targets(models, config);
    let batch_size = config.batch_size.max(1);
    let total_batches = targets.len().div_ceil(batch_size);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .expect("failed to build HTTP client");

    let mut summary = ProbeSummary::default();

    for (batch_idx, batch) in targets.chunks(batch_size).enumerate() {
        tracing::info!(
            batch = batch_idx + 1,
            total = total_batches,
            size = batch.len(),
            "probing batch"
        );

        let outcomes = run_batch(batch.to_vec(), {
            let client = client.clone();
            let token = token.to_string();
            move |target: ProbeTarget| {
                let client = client.clone();
                let token = token.clone();
                async move {
                    probe_one(&client, &token, &target.model_id, &target.provider).await
                }
            }
        })
        .await;

        for (target, outcome) in outcomes {
            let entry = &mut models[target.model_idx].providers[target.provider_idx];
            let tested_at = chrono::Utc::now().to_rfc3339();
            apply_outcome(entry, &outcome, &tested_at);

            summary.total_tested += 1;
            if outcome.error.is_some() {
                summary.errors += 1;
            }
            match outcome.status {
                ProviderStatus::Live => summary.status_counts.live += 1,
                ProviderStatus::Offline => summary.status_counts.offline += 1,
                _ => summary.status_counts.not_tested += 1,
            }
        }

        if (batch_idx + 1) * batch_size < targets.len() {
            tokio::time::sleep(BATCH_PAUSE).await;
        }
    }

    summary.successful = summary.total_tested - summary.errors;
    summary
}
