pub mod candidates;
pub mod evaluator;
pub mod freeze;
pub mod phase;
pub mod runner;
pub mod selector;

pub use self::candidates::PhaseRules;
pub use self::evaluator::{Evaluation, TierTarget};
pub use self::freeze::{dynamic_secondary_cap, freeze_tier_one, FrozenGuard};
pub use self::phase::{run_phase, PhaseOutcome, Starvation, StopReason};
pub use self::runner::{
    OptimizationOptions, OptimizationReport, Optimizer, ProgressCallback, SilentProgress,
};
pub use self::selector::select_best;
