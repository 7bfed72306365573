use std::path::Path;

use crate::config::Config;
use crate::domain::Supplier;
use crate::services::{DefaultImportService, ImportError, ImportReport, ImportService};

async fn import_service(config: &Config) -> anyhow::Result<DefaultImportService> {
    Ok(DefaultImportService::new(super::open_store(config).await?))
}

fn print_report(report: &ImportReport, noun: &str) {
    println!("✓ Imported {} {noun} (replaced {})", report.imported, report.replaced);

    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.filename, failure.error);
    }

    if let Some(warning) = &report.warning {
        println!("  ⚠ {warning}");
    }
}

fn print_error(err: &ImportError) {
    println!("✗ {err}");
    if let ImportError::Parse {
        sample: Some(sample),
        ..
    } = err
    {
        println!("First lines of the file:");
        print!("{sample}");
    }
}

pub async fn cmd_import_images(config: &Config, supplier: Supplier) -> anyhow::Result<()> {
    let folder = &config.suppliers.get(supplier).images_path;
    println!("Importing images for {supplier} from {folder}...");

    match import_service(config)
        .await?
        .import_images(Path::new(folder))
        .await
    {
        Ok(report) => {
            print_report(&report, "images");
            Ok(())
        }
        Err(e) => {
            print_error(&e);
            Err(e.into())
        }
    }
}

pub async fn cmd_import_csv(config: &Config, supplier: Supplier) -> anyhow::Result<()> {
    let file = &config.suppliers.get(supplier).csv_path;
    println!("Importing CSV for {supplier} from {file}...");

    match import_service(config)
        .await?
        .import_csv(Path::new(file))
        .await
    {
        Ok(report) => {
            print_report(&report, "records");
            Ok(())
        }
        Err(e) => {
            print_error(&e);
            Err(e.into())
        }
    }
}

pub async fn cmd_clear_images(config: &Config) -> anyhow::Result<()> {
    let deleted = import_service(config).await?.clear_images().await?;
    println!("✓ Deleted {deleted} images");
    Ok(())
}

pub async fn cmd_clear_csv(config: &Config) -> anyhow::Result<()> {
    let deleted = import_service(config).await?.clear_csv().await?;
    println!("✓ Deleted {deleted} CSV records");
    Ok(())
}
