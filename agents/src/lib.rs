pub mod strategy;
pub mod mirror;
pub mod config;
pub mod fingerprint;
pub mod evaluator;
pub mod extractor;
pub mod snapshot;
pub mod simulation;
pub mod random;
pub mod connector;

#[cfg(test)]
mod fixtures;

pub use config::SearchConfig;
pub use connector::{ConnectorError, Debouncer, StrategyConnector};
pub use mirror::{GameState, MirrorError};
pub use random::RandomStrategy;
pub use simulation::SimulationStrategy;
pub use strategy::Strategy;
