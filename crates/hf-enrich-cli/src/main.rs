use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use hf_enrich_core::{
    api::RouterClient,
    config::{load_mapping_cached, MappingConfig},
    enrich::enrich_models,
    mapping::build_id_map,
    model::HfModel,
    probe::{probe_all, ProbeConfig, DEFAULT_BATCH_SIZE},
    snapshot::Snapshot,
    stats::{EnrichStats, ProbeSummary},
};

mod html;

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_ok() -> Style     { Style::new().color256(114) }         // green
fn s_warn() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_bold() -> Style   { Style::new().bold() }
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "hf-enrich",
    about = "Reconcile the HF router model catalog with OpenRouter pricing, capabilities and live probes",
    version,
    after_help = "examples:\n  \
        hf-enrich                                  (enrich and write enriched_models.json)\n  \
        hf-enrich --probe                          (also probe every model-provider pair)\n  \
        hf-enrich --probe --limit 5                (probe the first 5 models only)\n  \
        hf-enrich --probe --providers cerebras groq\n  \
        hf-enrich table enriched_models.json       (render a snapshot as index.html)\n  \
        hf-enrich mapping                          (show the catalog cross-reference map)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Probe every (model, provider) pair through the router
    #[arg(long)]
    probe: bool,

    /// Probe only the first N models
    #[arg(long)]
    limit: Option<usize>,

    /// Probe only these providers (catalog spelling)
    #[arg(long, num_args = 1..)]
    providers: Option<Vec<String>>,

    /// Concurrent probes per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Where to write the enriched snapshot
    #[arg(long, short, default_value = "enriched_models.json")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a snapshot as a self-contained HTML table.
    Table {
        /// Snapshot JSON produced by a pipeline run
        #[arg(default_value = "enriched_models.json")]
        input: PathBuf,
        #[arg(long, short, default_value = "index.html")]
        output: PathBuf,
    },
    /// Show the catalog cross-reference mapping.
    Mapping {
        /// How many sample pairs to print
        #[arg(long, default_value_t = 20)]
        sample: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Table { input, output }) => cmd_table(input, output),
        Some(Commands::Mapping { sample }) => cmd_mapping(*sample).await,
        None => cmd_run(&cli).await,
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────

async fn cmd_run(cli: &Cli) -> anyhow::Result<()> {
    let client = RouterClient::with_auto_token();
    let term = Term::stderr();

    term.write_line(&format!("{}", s_dim().apply_to("fetching hub models...")))?;
    let mut hf_models = client.hf_models().await?;
    term.clear_last_lines(1)?;
    println!(
        "{} {}",
        s_ok().apply_to(hf_models.len()),
        s_dim().apply_to("hub models")
    );

    term.write_line(&format!("{}", s_dim().apply_to("fetching openrouter models...")))?;
    let mut or_models = client.openrouter_models().await?;
    term.clear_last_lines(1)?;
    println!(
        "{} {}",
        s_ok().apply_to(or_models.len()),
        s_dim().apply_to("openrouter models")
    );

    let total = or_models.len();
    let mut shown = false;
    client
        .attach_endpoints(&mut or_models, |i, id| {
            if shown {
                let _ = term.clear_last_lines(1);
            }
            let _ = term.write_line(&format!(
                "{}",
                s_dim().apply_to(format!("endpoints {}/{total}: {id}", i + 1))
            ));
            shown = true;
        })
        .await;
    if shown {
        term.clear_last_lines(1)?;
    }
    let with_detail = or_models.iter().filter(|m| !m.endpoints.is_empty()).count();
    println!(
        "{} {}",
        s_ok().apply_to(with_detail),
        s_dim().apply_to("models with endpoint detail")
    );

    let id_map = build_id_map(&or_models);
    println!(
        "{} {}",
        s_ok().apply_to(id_map.len()),
        s_dim().apply_to("cross-catalog mappings")
    );

    let config = load_mapping_cached()?;
    let mut stats = EnrichStats::new(hf_models.len());
    enrich_models(&mut hf_models, &id_map, &or_models, &config, &mut stats);

    let mut probed = false;
    if cli.probe {
        match client.token() {
            Some(token) => {
                let probe_config = ProbeConfig {
                    limit: cli.limit,
                    providers: cli.providers.clone(),
                    batch_size: cli.batch_size,
                };
                let summary = run_probes(&mut hf_models, token, &probe_config).await;
                probed = true;
                print_probe_summary(&summary);
            }
            None => {
                eprintln!(
                    "{}",
                    s_warn().apply_to(
                        "warning: no HF token found — set $HF_TOKEN to probe; skipping"
                    )
                );
            }
        }
    }

    let snapshot = Snapshot::new(hf_models, &stats, probed);
    snapshot.write(&cli.output)?;
    println!();
    println!(
        "{} {}",
        s_dim().apply_to("snapshot written to"),
        s_bold().apply_to(cli.output.display())
    );

    print_stats(&stats);
    print_examples(&snapshot.data, &config);

    Ok(())
}

async fn run_probes(
    models: &mut [HfModel],
    token: &str,
    config: &ProbeConfig,
) -> ProbeSummary {
    let pairs: usize = models
        .iter()
        .take(config.limit.unwrap_or(models.len()))
        .map(|m| m.providers.len())
        .sum();
    println!();
    println!("{}", s_header().apply_to("probing providers"));
    println!("{}", sep(64));
    println!(
        "  {}",
        s_dim().apply_to(format!(
            "up to {pairs} pairs, {} per batch",
            config.batch_size
        ))
    );
    probe_all(models, token, config).await
}

// ── Reports ──────────────────────────────────────────────────────────

fn print_stats(stats: &EnrichStats) {
    println!();
    println!("{}", s_header().apply_to("enrichment statistics"));
    println!("{}", sep(64));

    let row = |label: &str, value: String| {
        println!("  {:<28} {}", s_label().apply_to(label), s_bold().apply_to(value));
    };
    row("total models", stats.total_models.to_string());
    row("with mapping", stats.models_with_mapping.to_string());
    row("models enriched", stats.models_enriched.to_string());
    row("provider entries enriched", stats.providers_enriched.to_string());
    row("new capability flags", stats.new_capabilities_added.to_string());

    if let Some(avg) = stats.uptime.average() {
        println!(
            "  {:<28} {}",
            s_label().apply_to("uptime (30d)"),
            s_dim().apply_to(format!(
                "min {:.2}%  max {:.2}%  avg {avg:.2}%",
                stats.uptime.min, stats.uptime.max
            ))
        );
    }
    println!("{}", sep(64));
}

fn print_probe_summary(summary: &ProbeSummary) {
    println!();
    println!("{}", s_header().apply_to("probe results"));
    println!("{}", sep(64));
    println!(
        "  {:<12} {}   {:<12} {}   {:<8} {}",
        s_label().apply_to("tested"),
        s_bold().apply_to(summary.total_tested),
        s_label().apply_to("successful"),
        s_ok().apply_to(summary.successful),
        s_label().apply_to("errors"),
        if summary.errors > 0 {
            s_err().apply_to(summary.errors)
        } else {
            s_dim().apply_to(summary.errors)
        }
    );
    println!(
        "  {:<12} {}   {:<12} {}   {:<8} {}",
        s_label().apply_to("live"),
        s_ok().apply_to(summary.status_counts.live),
        s_label().apply_to("offline"),
        s_err().apply_to(summary.status_counts.offline),
        s_label().apply_to("untested"),
        s_dim().apply_to(summary.status_counts.not_tested)
    );
    println!("{}", sep(64));
}

/// A few enriched entries, as a spot check of what landed.
fn print_examples(models: &[HfModel], config: &MappingConfig) {
    const MAX_EXAMPLES: usize = 8;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["  Model", "Provider", "Status", "Uptime", "$/M in", "$/M out", "Ctx", "Quant"]
            .map(|h| Cell::new(h).fg(Color::AnsiValue(243))),
    );

    let dash = "\u{2500}".to_string();
    let mut rows = 0;
    'outer: for model in models {
        for entry in &model.providers {
            if !entry.is_enriched() {
                continue;
            }
            let status = entry
                .status
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| dash.clone());
            table.add_row(vec![
                Cell::new(format!("  {}", model.id)),
                Cell::new(config.normalize_provider(&entry.provider)),
                Cell::new(status),
                Cell::new(
                    entry
                        .uptime_30d
                        .map(|u| format!("{u:.2}%"))
                        .unwrap_or_else(|| dash.clone()),
                ),
                Cell::new(
                    entry
                        .pricing
                        .map(|p| format!("{:.2}", p.input))
                        .unwrap_or_else(|| dash.clone()),
                )
                .fg(Color::AnsiValue(109)),
                Cell::new(
                    entry
                        .pricing
                        .map(|p| format!("{:.2}", p.output))
                        .unwrap_or_else(|| dash.clone()),
                )
                .fg(Color::AnsiValue(109)),
                Cell::new(
                    entry
                        .context_length
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| dash.clone()),
                ),
                Cell::new(entry.quantization.clone().unwrap_or_else(|| dash.clone())),
            ]);
            rows += 1;
            if rows >= MAX_EXAMPLES {
                break 'outer;
            }
            break; // one example per model
        }
    }

    if rows > 0 {
        println!();
        println!("{}", s_header().apply_to("example enriched entries"));
        println!("{table}");
        println!(
            "{}",
            s_hint().apply_to("  hf-enrich table for the full picture")
        );
    }
}

// ── Table ────────────────────────────────────────────────────────────

fn cmd_table(input: &Path, output: &Path) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(input)?;
    let page = html::render(&snapshot)?;
    std::fs::write(output, page)?;

    let entries: usize = snapshot.data.iter().map(|m| m.providers.len()).sum();
    println!(
        "{} {} {}",
        s_dim().apply_to("wrote"),
        s_bold().apply_to(output.display()),
        s_dim().apply_to(format!(
            "({} models, {entries} provider rows)",
            snapshot.data.len()
        ))
    );
    Ok(())
}

// ── Mapping ──────────────────────────────────────────────────────────

async fn cmd_mapping(sample: usize) -> anyhow::Result<()> {
    let client = RouterClient::with_auto_token();
    let term = Term::stderr();

    term.write_line(&format!("{}", s_dim().apply_to("fetching openrouter models...")))?;
    let or_models = client.openrouter_models().await?;
    term.clear_last_lines(1)?;

    let id_map = build_id_map(&or_models);

    println!();
    println!("{}", s_header().apply_to("catalog cross-reference mapping"));
    println!("{}", sep(64));

    let mut pairs: Vec<(&String, &String)> = id_map.iter().collect();
    pairs.sort();
    for (hf_id, or_id) in pairs.iter().take(sample) {
        println!(
            "  {:<45} {} {}",
            s_bold().apply_to(hf_id),
            s_tree().apply_to("\u{2192}"),
            s_dim().apply_to(or_id)
        );
    }

    println!("{}", sep(64));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} mappings from {} listed models",
            id_map.len(),
            or_models.len()
        ))
    );
    println!();
    Ok(())
}
