use crate::reports;
use clap::Args;
use classforge::config::Config;
use classforge::error::CfResult;
use classforge::metrics::{self, Attribute};
use classforge::roster::Roster;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(roster: &Roster, config: &Config) -> CfResult<()> {
    roster.check_partition()?;
    reports::print_distribution("Current distribution", &metrics::stats_table(roster));

    for (tier, cap) in [
        (1u8, config.primary.cap_primary),
        (5u8, config.secondary.cap_secondary),
    ] {
        let over = metrics::excess_count(roster, Attribute::Tier(tier), cap);
        let total = metrics::total_excess(roster, Attribute::Tier(tier), cap);
        info!(
            "Tier {}: {} classes over cap {} ({} students in excess)",
            tier, over, cap, total
        );
    }
    Ok(())
}
