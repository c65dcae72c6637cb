//! Configuration module for csmetrics
//!
//! This module handles:
//! - The immutable engine configuration (tag sets, `k`, formula options)
//! - Project-level configuration files (csmetrics.toml, .csmetricsrc.json)
//! - Input layout and delimiter settings
//! - CLI defaults

mod engine;
mod project_config;

pub use engine::{EngineConfig, EngineConfigBuilder, SwitchEntropyForm};
pub use project_config::{
    load_config_file, load_project_config, parse_delimiter, CliDefaults, InputConfig,
    LanguageSection, Layout, ProjectConfig, JSON_CONFIG_NAME, TOML_CONFIG_NAME,
};
