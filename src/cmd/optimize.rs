use crate::reports;
use clap::Args;
use classforge::config::Config;
use classforge::error::CfResult;
use classforge::export::export_all;
use classforge::metrics;
use classforge::model::SwapRecord;
use classforge::optimizer::{OptimizationOptions, Optimizer, PhaseOutcome, ProgressCallback};
use classforge::roster::Roster;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Directory for the exported CSV and JSON files
    #[arg(short, long, default_value = "results")]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    pub no_export: bool,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_swap(&self, record: &SwapRecord, spread: usize) {
        debug!(
            "{} {} -> {} | spread {}",
            record.label(),
            record.swap.from_class,
            record.swap.to_class,
            spread
        );
    }

    fn on_phase_end(&self, outcome: &PhaseOutcome) {
        reports::print_phase_summary(outcome);
    }
}

// `config` is the merged view of file and flags; `args.config` only holds the flags.
pub fn run(args: OptimizeArgs, config: Config, mut roster: Roster) -> CfResult<()> {
    reports::print_distribution("Before", &metrics::stats_table(&roster));

    let optimizer = Optimizer::new(OptimizationOptions::from(&config));
    let report = optimizer.run(&mut roster, &CliLogger)?;

    reports::print_swap_log(&report.primary);
    reports::print_swap_log(&report.secondary);
    reports::print_distribution("After", &report.stats);

    info!("\n=== 🏁 FINAL RESULT ===");
    info!(
        "Swaps: primary {} | secondary {}",
        report.primary.swaps.len(),
        report.secondary.swaps.len()
    );
    info!(
        "Frozen: {} students | tier-5 cap {}",
        report.frozen_count, report.secondary_cap
    );

    if args.no_export {
        return Ok(());
    }
    export_all(&args.out_dir, &roster, &report)?;
    Ok(())
}
