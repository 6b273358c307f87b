use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use starpaths::data::export::{default_export_name, write_catalog_json};
use starpaths::data::hyg;
use starpaths::data::write_catalog_to_file;
use starpaths::{CatalogConfig, CatalogIndex};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct DatasetMetadata {
    source: String,
    jump_range_pc: f64,
    catalog_cutoff_pc: f64,
    reference_name: String,
    stars: usize,
    directed_links: usize,
    generated_at_epoch: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(source) = args.next() else {
        bail!("usage: build_dataset <catalog.csv | https://...> [config.json]");
    };

    let config = match args.next() {
        Some(path) => CatalogConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => CatalogConfig::default(),
    };
    let config = config
        .apply_env()
        .context("invalid STARPATHS_* override")?;

    let stars = if source.starts_with("http://") || source.starts_with("https://") {
        let client = Client::builder()
            .user_agent("starpaths-dataset-builder/0.1")
            .build()?;
        info!("Downloading catalog from {}", source);
        let temp_file = download_catalog(&client, &source)?;
        hyg::read_stars_within(temp_file.reopen()?, config.catalog_cutoff_pc)
    } else {
        let file = fs::File::open(&source).with_context(|| format!("failed to open {source}"))?;
        hyg::read_stars_within(file, config.catalog_cutoff_pc)
    }
    .with_context(|| format!("failed to read star catalog from {source}"))?;

    let index = CatalogIndex::build(stars, config);
    if let Err(err) = index.reference() {
        warn!("{err}; path enumeration will be unavailable");
    }

    let output_dir = PathBuf::from("data");
    fs::create_dir_all(&output_dir).context("failed to create data output directory")?;

    let dataset_path = output_dir.join("starpaths.bin");
    write_catalog_to_file(&index, &dataset_path)
        .with_context(|| format!("failed to write dataset to {}", dataset_path.display()))?;

    let export_path = output_dir.join(default_export_name(index.config().catalog_cutoff_pc));
    write_catalog_json(&index, &export_path)
        .with_context(|| format!("failed to write export to {}", export_path.display()))?;

    let metadata = DatasetMetadata {
        source: source.clone(),
        jump_range_pc: index.config().jump_range_pc,
        catalog_cutoff_pc: index.config().catalog_cutoff_pc,
        reference_name: index.config().reference_name.clone(),
        stars: index.len(),
        directed_links: (0..index.len()).map(|i| index.neighbours(i).len()).sum(),
        generated_at_epoch: current_epoch_seconds(),
    };

    let metadata_path = output_dir.join("starpaths.meta.json");
    let metadata_json = serde_json::to_vec_pretty(&metadata)?;
    fs::write(&metadata_path, metadata_json)
        .with_context(|| format!("failed to write metadata to {}", metadata_path.display()))?;

    info!(
        "Wrote catalog snapshot to {} ({} stars, {} links)",
        dataset_path.display(),
        metadata.stars,
        metadata.directed_links
    );

    Ok(())
}

fn download_catalog(client: &Client, url: &str) -> Result<NamedTempFile> {
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to download {url}"))?
        .error_for_status()
        .context("catalog download returned an error status")?;
    let mut file = NamedTempFile::new()?;
    response.copy_to(&mut file)?;
    Ok(file)
}

fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
