pub mod optimize;
pub mod stats;
