use crate::config::{Config, PhaseSettings};
use crate::error::CfResult;
use crate::metrics::{stats_table, ClassCounts, StatsTable};
use crate::model::SwapRecord;
use crate::optimizer::candidates::PhaseRules;
use crate::optimizer::freeze::{dynamic_secondary_cap, freeze_tier_one, FrozenGuard};
use crate::optimizer::phase::{run_phase, PhaseOutcome};
use crate::roster::Roster;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationOptions {
    pub primary: PhaseSettings,
    pub secondary: PhaseSettings,
    pub dynamic_secondary_cap: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            primary: cfg.primary.settings(),
            secondary: cfg.secondary.settings(),
            dynamic_secondary_cap: cfg.secondary.dynamic_secondary_cap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationReport {
    pub primary: PhaseOutcome,
    pub secondary: PhaseOutcome,
    /// Cap actually used for tier 5, after the optional derivation.
    pub secondary_cap: usize,
    pub frozen_count: usize,
    pub tier_one_snapshot: ClassCounts,
    pub stats: StatsTable,
}

impl OptimizationReport {
    pub fn total_swaps(&self) -> usize {
        self.primary.swaps.len() + self.secondary.swaps.len()
    }
}

/// Receives updates while the optimizer runs. Observers cannot stop the run.
pub trait ProgressCallback {
    fn on_swap(&self, _record: &SwapRecord, _spread: usize) {}
    fn on_phase_end(&self, _outcome: &PhaseOutcome) {}
}

pub struct SilentProgress;
impl ProgressCallback for SilentProgress {}

pub struct Optimizer {
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(options: OptimizationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Balances tier 1, freezes it, then balances tier 5 without moving any tier-1 count.
    pub fn run<CB: ProgressCallback + ?Sized>(
        &self,
        roster: &mut Roster,
        callback: &CB,
    ) -> CfResult<OptimizationReport> {
        let opts = &self.options;
        roster.check_partition()?;

        let secondary_cap = if opts.dynamic_secondary_cap {
            let cap = dynamic_secondary_cap(roster);
            info!("Derived tier-5 cap from data: {}", cap);
            cap
        } else {
            opts.secondary.cap
        };

        let primary = run_phase(
            roster,
            &PhaseRules::primary(opts.primary.cap),
            &opts.primary,
            None,
            callback,
        )?;

        let guard = FrozenGuard::capture(roster);
        let frozen_count = freeze_tier_one(roster);

        let secondary_settings = PhaseSettings {
            cap: secondary_cap,
            ..opts.secondary
        };
        let secondary = run_phase(
            roster,
            &PhaseRules::secondary(secondary_cap),
            &secondary_settings,
            Some(&guard),
            callback,
        )?;

        guard.validate(roster)?;
        roster.check_partition()?;

        Ok(OptimizationReport {
            primary,
            secondary,
            secondary_cap,
            frozen_count,
            tier_one_snapshot: guard.snapshot().clone(),
            stats: stats_table(roster),
        })
    }
}
