// Tier scale: 1 = high performers, 5 = low performers.
pub const TIER_MIN: u8 = 1;
pub const TIER_MAX: u8 = 5;
pub const TIER_COUNT: usize = 5;

pub const PRIMARY_TIER: u8 = 1;
pub const SECONDARY_TIER: u8 = 5;

// Donor tiers leave the most-loaded class, acceptor tiers come back from the least-loaded one.
pub const PRIMARY_DONORS: &[u8] = &[1];
pub const PRIMARY_ACCEPTORS: &[u8] = &[2, 3, 4, 5];
pub const SECONDARY_DONORS: &[u8] = &[5];
// Tier 1 is never an acceptor in the secondary phase.
pub const SECONDARY_ACCEPTORS: &[u8] = &[2, 3, 4];

/// Upper bound on the language spread a relaxed solo swap may leave behind.
pub const RELAXED_LANGUAGE_SPREAD_CEILING: usize = 4;

/// Clamp for the data-derived secondary cap.
pub const DYNAMIC_CAP_CEILING: usize = 3;

/// Spread considered acceptable for gender and language in reports.
pub const ATTRIBUTE_SPREAD_TARGET: usize = 4;

pub const DEFAULT_CAP: usize = 2;
pub const DEFAULT_SPREAD_GOAL: usize = 1;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
