// Domain layer - Plain data types and pure transforms
pub mod chart;
pub mod dashboard;
pub mod frame;
pub mod stats;
