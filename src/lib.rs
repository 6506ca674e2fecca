pub mod agent;
pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod statistics;
