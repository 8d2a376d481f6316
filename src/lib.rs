pub mod config;
pub mod consts;
pub mod error;
pub mod export;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod roster;

pub use error::{CfResult, ClassForgeError};
