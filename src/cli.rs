//! Command-line interface definitions and argument parsing

use clap::Parser;
use std::path::Path;

/// SaaS unit-economics CLI: CAC, LTV, cohort retention, and ARPU analysis
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the customer CSV export
    #[arg(short, long, default_value = "cac_ltv_model.csv")]
    pub input: String,

    /// Directory where the chart images are written
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Output directory as a path
    pub fn output_dir(&self) -> &Path {
        Path::new(&self.output_dir)
    }
}
