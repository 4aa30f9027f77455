//! Summary tables for sector-coupled energy system model runs.
//!
//! Results exported from solved networks are aggregated into tables of curtailment, system costs,
//! installed capacities and transmission line congestion, comparing policy scenarios across
//! planning horizons.
#![warn(missing_docs)]
use anyhow::{Context, Result};
use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod id;
pub mod input;
pub mod labels;
pub mod log;
pub mod output;
pub mod results;
pub mod settings;
pub mod summary;
pub mod table;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder in which program configuration (e.g. the settings file) is stored
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config folder")?;

    Ok(config_dir.join("esm-summary"))
}
