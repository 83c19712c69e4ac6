use anyhow::Result;
use fueltables::{config::AppConfig, fetch, output, process};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ───────────────────────────────────────────
    let cfg = AppConfig::load()?;
    info!(source = %cfg.fetch.source_url, output = %cfg.output_path.display(), "config loaded");

    // ─── 3) fetch & walk the document ────────────────────────────────
    let start = Instant::now();
    let client = fetch::build_client(&cfg.fetch)?;
    let document = fetch::fetch_tables(&client, &cfg.fetch.source_url, &cfg.fetch).await?;
    info!(
        tables = document.tables.len(),
        elapsed = ?start.elapsed(),
        "document fetched"
    );

    // ─── 4) run the pipeline ─────────────────────────────────────────
    let tables = process::run(document, &cfg.pipeline)?;
    if tables.is_empty() {
        warn!("nothing to show: no table matched the domain prefix");
    }
    for (i, t) in tables.iter().enumerate() {
        let s = process::summarize(t, &cfg.pipeline);
        info!(
            index = i,
            title = %s.title,
            rows = s.rows,
            derived = s.derived_values,
            chronology = ?s.chronology,
            derived_range = ?s.derived_range,
            "table"
        );
    }

    // ─── 5) hand off to the presentation layer ──────────────────────
    output::write_tables(&cfg.output_path, &tables)?;

    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
