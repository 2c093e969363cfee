//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `listing_harvest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Writing export files
//!
//! All extraction functionality is implemented in the library crate.

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde_json::json;

use listing_harvest::app::{
    log_batch_progress, print_error_statistics, print_summary, read_url_list, stop_on_ctrl_c,
    validate_and_normalize_url,
};
use listing_harvest::config::{Command, Opt};
use listing_harvest::export::{
    batch_file_name, links_file_name, links_payload, list_file_name, list_payload,
    product_checks, product_file_name, product_payload, write_export, write_json_export,
};
use listing_harvest::initialization::init_logger_with;
use listing_harvest::{BatchControl, Harvester, ProgressCallback};

fn normalized_target(url: &str) -> Result<String> {
    match validate_and_normalize_url(url) {
        Some(url) => Ok(url),
        None => bail!("Invalid target URL: {}", url),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

async fn run_product(harvester: &Harvester, url: &str, output_dir: &Path) -> Result<()> {
    let start = Instant::now();
    let url = normalized_target(url)?;
    let record = harvester
        .extract_product(&url)
        .await
        .with_context(|| format!("Failed to extract {}", url))?;

    let settings = &harvester.config().settings;
    let checks = product_checks(&record, settings);
    if checks.is_recommended() {
        info!("{} passes all product checks", record.asin);
    } else {
        info!(
            "{} product checks: earnings {} (${:.2}), reviews {}, rating {}",
            record.asin,
            if checks.earnings_ok { "ok" } else { "low" },
            checks.earnings,
            if checks.reviews_ok { "ok" } else { "missing" },
            if checks.rating_ok { "ok" } else { "low" },
        );
    }

    let payload = product_payload(&record, settings).context("Failed to build product export")?;
    let path = write_json_export(output_dir, &product_file_name(&record, today()), &payload).await?;
    println!("Saved {}", path.display());
    print_summary("Product", 1, 0, start.elapsed().as_secs_f64());
    Ok(())
}

async fn run_list(harvester: &Harvester, url: &str, links: bool, output_dir: &Path) -> Result<()> {
    let start = Instant::now();
    let url = normalized_target(url)?;
    let list = harvester
        .extract_list(&url)
        .await
        .with_context(|| format!("Failed to extract listing {}", url))?;
    if list.stopped_early {
        warn!("Crawl stopped early after {} page(s); exporting what was collected", list.pages_crawled);
    }

    let tag = harvester.config().settings.affiliate_tag.as_deref();
    let rows = list_payload(&list.products, tag);
    if rows.is_empty() {
        warn!("No products with an identifier passed the filters; nothing exported");
    } else {
        let name = list_file_name(&list.filters.brand_filter, today());
        let path = write_json_export(output_dir, &name, &rows).await?;
        println!("Saved {} products to {}", rows.len(), path.display());
    }
    if links {
        let path = write_export(
            output_dir,
            &links_file_name(today()),
            &links_payload(&list.products, tag),
        )
        .await?;
        println!("Saved links to {}", path.display());
    }

    print_summary(
        "List",
        list.total_filtered,
        list.total_found - list.total_filtered,
        start.elapsed().as_secs_f64(),
    );
    Ok(())
}

async fn run_batch(harvester: &Harvester, file: &Path, output_dir: &Path) -> Result<()> {
    let start = Instant::now();
    let urls = read_url_list(file).await?;
    if urls.is_empty() {
        bail!("No URLs found in {}", file.display());
    }

    let control = BatchControl::new();
    let interrupt = stop_on_ctrl_c(control.clone());
    let progress: ProgressCallback = Arc::new(log_batch_progress);
    let job = harvester.run_batch(urls, control, Some(progress)).await;
    interrupt.abort();

    for failed in &job.failed {
        warn!("Failed after {} attempt(s): {} ({})", failed.attempts, failed.url, failed.error);
    }

    let settings = &harvester.config().settings;
    let products = job
        .records()
        .iter()
        .map(|record| product_payload(record, settings))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to build batch export")?;
    let payload = json!({
        "state": job.state,
        "total": job.urls.len(),
        "products": products,
        "failed": job.failed,
    });
    let path = write_json_export(output_dir, &batch_file_name(today()), &payload).await?;
    println!("Saved {} products to {}", job.collected.len(), path.display());

    print_summary(
        "Batch",
        job.collected.len(),
        job.failed.len(),
        start.elapsed().as_secs_f64(),
    );
    Ok(())
}

async fn run(opt: &Opt, harvester: &Harvester) -> Result<()> {
    match &opt.command {
        Command::Product { url } => run_product(harvester, url, &opt.output_dir).await,
        Command::List { url, links, .. } => run_list(harvester, url, *links, &opt.output_dir).await,
        Command::Batch { file, .. } => run_batch(harvester, file, &opt.output_dir).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), falling back
    // to a .env next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = opt.to_config().context("Invalid configuration")?;
    let harvester = Harvester::new(config).context("Failed to initialize")?;

    let result = run(&opt, &harvester).await;
    print_error_statistics(&harvester.stats());

    if let Err(e) = result {
        eprintln!("listing_harvest error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
