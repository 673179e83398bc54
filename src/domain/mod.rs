// Domain layer - Equipment datasets, statistics and chart shapes
pub mod chart;
pub mod distribution;
pub mod equipment;
pub mod error;
pub mod statistics;
