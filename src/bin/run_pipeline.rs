// SFI pipeline entry point
//
// Scores a soil readings file and writes the scored table plus JSON and
// Markdown reports.
// Usage: cargo run --release --bin run_pipeline -- [input.csv|input.parquet]

use anyhow::Context;
use soil_fertility_scorer::{JsonFormatter, MarkdownFormatter, Pipeline, PipelineConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "soil_fertility_scorer=info,run_pipeline=info,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration from arguments and environment variables
    let input = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SFI_INPUT").ok())
        .unwrap_or_else(|| "data/Soil_readings.csv".to_string());
    let input = PathBuf::from(input);

    let output_dir = PathBuf::from(
        std::env::var("SFI_OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
    );

    let config = match std::env::var("SFI_CONFIG") {
        Ok(path) => PipelineConfig::load(&PathBuf::from(path))?,
        Err(_) => PipelineConfig::default(),
    };

    tracing::info!("Configuration:");
    tracing::info!("  INPUT: {:?}", input);
    tracing::info!("  OUTPUT_DIR: {:?}", output_dir);
    tracing::info!("  LONGITUDE_GRID: {:?}", config.geo.longitude_grid);

    let pipeline = Pipeline::new(config)?;
    let output = pipeline.run_from_path(&input)?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let scored_path = output_dir.join("soil_readings_scored.csv");
    output.dataset.write_csv(&scored_path)?;

    let report = output
        .report()
        .with_source(input.display().to_string());

    let json_path = output_dir.join("sfi_report.json");
    fs::write(&json_path, JsonFormatter::format(&report)?)
        .with_context(|| format!("Failed to write {:?}", json_path))?;

    let md_path = output_dir.join("sfi_report.md");
    fs::write(&md_path, MarkdownFormatter::format(&report))
        .with_context(|| format!("Failed to write {:?}", md_path))?;

    let sfi = &report.summary.sfi;
    tracing::info!(
        "SFI mean {:.2}, median {:.2}, std {:.2}, range {:.2}-{:.2}",
        sfi.mean,
        sfi.median,
        sfi.std_dev,
        sfi.min,
        sfi.max
    );
    if let Some(model) = &report.model {
        tracing::info!("Model R² (test) {:.4}, RMSE {:.4}", model.r2_test, model.rmse_test);
    }
    tracing::info!("Wrote {:?}, {:?} and {:?}", scored_path, json_path, md_path);

    Ok(())
}
