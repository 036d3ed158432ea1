pub mod config;
pub mod constants;
pub mod driver_utils;
pub mod engine;
pub mod entity;
pub mod error;
pub mod grid;
pub mod pathfinder;
pub mod rng;
pub mod types;
pub mod world;
