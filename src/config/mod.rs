// src/config/mod.rs

//! Configuration loading and validation for taskbind.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate references, ARNs and target fields (`validate.rs`).
//! - Build target props from a validated file (`targets.rs`).

pub mod loader;
pub mod model;
pub mod targets;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{ClusterConfig, ConfigFile, TargetConfig, TaskDefinitionConfig};
pub use targets::target_props;
pub use validate::validate_config;
