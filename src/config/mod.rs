//! Configuration Module
//!
//! Provides simulation, generator and threshold settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `AQUAGUARD_CONFIG` environment variable (path to TOML file)
//! 2. `aquaguard.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`AquaConfig`] is passed explicitly to the engine and server;
//! there is no process-wide config instance.

mod aqua_config;
pub mod defaults;

pub use aqua_config::*;
