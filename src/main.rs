//! LtvForge: CAC & LTV analysis CLI for SaaS customer data
//!
//! This is the main entrypoint that orchestrates data loading, metric
//! derivation, cohort retention simulation, and chart rendering.

use anyhow::Result;
use clap::Parser;
use ltvforge::{cohort, data, metrics, report, Args};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("LtvForge - CAC & LTV Analysis");
        println!("=============================\n");
    }

    run_pipeline(&args)
}

/// Run the full analysis pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    println!("=== CAC & LTV Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load customer data
    if args.verbose {
        println!("Step 1: Loading customer data");
        println!("  Input file: {}", args.input);
    }

    let load_start = Instant::now();
    let records = data::load_customers(&args.input)?;
    let load_time = load_start.elapsed();

    println!("✓ Data loaded: {} customers", records.len());
    if args.verbose {
        println!("  Processing time: {:.2}s", load_time.as_secs_f64());
        report::print_dataset_summary(&records);
    }

    // Step 2: Channel and region metrics
    if args.verbose {
        println!("\nStep 2: Computing channel and region metrics");
    }

    let channel_metrics = metrics::channel_metrics(&records);
    let region_arpu = metrics::arpu_by_region(&records);
    let avg_ltv = metrics::average_ltv(&records);

    println!(
        "✓ Metrics computed: {} channels, {} regions",
        channel_metrics.len(),
        region_arpu.len()
    );
    report::print_channel_table(&channel_metrics, avg_ltv);

    // Step 3: Cohort retention simulation
    if args.verbose {
        println!("\nStep 3: Simulating cohort retention");
    }

    let groups = cohort::cohort_groups(&records);
    let retention = cohort::simulate_retention(&records);

    println!(
        "\n✓ Retention simulated: {} cohorts, {} curve points",
        groups.len(),
        retention.len()
    );
    report::print_cohort_sizes(&groups);

    // Step 4: Render charts
    if args.verbose {
        println!("\nStep 4: Rendering charts");
        println!("  Output directory: {}", args.output_dir);
    }

    let viz_start = Instant::now();
    println!();
    report::generate_report(&channel_metrics, &region_arpu, &retention, args.output_dir())?;
    let viz_time = viz_start.elapsed();

    if args.verbose {
        println!("  Rendering time: {:.2}s", viz_time.as_secs_f64());
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
