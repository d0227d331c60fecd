use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use verdict_adapter::{extract, is_product_page, resolve_site_for_url, HtmlDocument};
use verdict_analysis::{AnalysisOrchestrator, VerdictClient};
use verdict_core::ProductRecord;

/// Timeout for fetching the product page itself (not the analysis service).
const PAGE_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Parser)]
#[command(name = "verdict-cli")]
#[command(about = "Worth-to-buy verdict engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect whether a URL is a supported product page and extract its record.
    Detect {
        /// Product page address.
        url: String,
        /// Read page HTML from a file instead of fetching the address.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Produce a worth-to-buy verdict: remote service first, local fallback.
    Analyze {
        /// Product page address.
        url: String,
        /// Read page HTML from a file instead of fetching the address.
        #[arg(long)]
        html: Option<PathBuf>,
        /// Skip the remote service entirely and score locally.
        #[arg(long)]
        offline: bool,
    },
    /// Print the full-report hand-off URL for a product page.
    ReportUrl {
        /// Product page address.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = verdict_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect { url, html } => {
            let record = extract_record(&config, &url, html.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Analyze { url, html, offline } => {
            let record = extract_record(&config, &url, html.as_deref()).await?;
            let result = if offline {
                verdict_scorer::score_product(&record)
            } else {
                let client = VerdictClient::new(&config)?;
                let mut orchestrator = AnalysisOrchestrator::new(
                    client,
                    Duration::from_secs(config.cache_ttl_secs),
                );
                orchestrator.analyze(&record).await
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::ReportUrl { url } => {
            let client = VerdictClient::new(&config)?;
            println!("{}", client.full_report_url(&url));
        }
    }

    Ok(())
}

/// Resolves the site, verifies the address is a product page, and extracts
/// the record from fetched or file-provided HTML.
async fn extract_record(
    config: &verdict_core::AppConfig,
    url: &str,
    html_path: Option<&std::path::Path>,
) -> anyhow::Result<ProductRecord> {
    let Some(profile) = resolve_site_for_url(url) else {
        bail!("site not supported: {url}");
    };
    if !is_product_page(profile, url) {
        bail!("not a product page on {}: {url}", profile.site_id);
    }

    let html = match html_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading HTML from {}", path.display()))?,
        None => fetch_page(config, url).await?,
    };

    let doc = HtmlDocument::parse(&html);
    let record = extract(profile, &doc, url);
    if !record.is_complete() {
        tracing::warn!(url, "extraction incomplete: no title found");
    }
    Ok(record)
}

async fn fetch_page(config: &verdict_core::AppConfig, url: &str) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(PAGE_FETCH_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()
        .context("building HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    let status = response.status();
    if !status.is_success() {
        bail!("fetching {url} returned HTTP {status}");
    }
    response.text().await.context("reading page body")
}
