//! Defines the `PlottingConfig` struct, which represents the contents of `plotting.toml`.
use crate::id::{ScenarioID, check_ids_unique};
use crate::input::{input_err_msg, is_sorted_and_unique, read_toml};
use crate::results::NetworkKey;
use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "plotting.toml";

/// The ID (and display name) of the business-as-usual scenario
pub const BAU_SCENARIO: &str = "BAU";

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Network naming parameters for one planning horizon
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct HorizonParameters {
    /// The planning year
    pub year: u32,
    /// Transmission expansion limit (e.g. "v1.15")
    pub line_limit: String,
    /// CO2 limit as a fraction of 1990 emissions (e.g. "0.45")
    pub co2_limit: String,
}

/// A scenario with its human-facing name
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScenarioDefinition {
    /// The scenario's ID, as used for result folder names
    pub id: ScenarioID,
    /// The name used in tables
    pub name: String,
}

/// Represents the contents of the entire project configuration file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct PlottingConfig {
    /// Number of clusters in the solved networks
    pub clusters: u32,
    /// Sector options shared by all networks (e.g. "T-H-B-I")
    pub sector_opts: String,
    /// Temporal resolution of the networks (e.g. "3H")
    pub time_resolution: String,
    /// Folder containing the exported network results.
    ///
    /// Relative paths are resolved against the project folder.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// The horizon for which the business-as-usual scenario was solved, if any
    #[serde(default)]
    pub bau_horizon: Option<u32>,
    /// Parameters for each planning horizon
    pub horizons: Vec<HorizonParameters>,
    /// The policy scenarios to compare
    pub scenarios: Vec<ScenarioDefinition>,
}

impl PlottingConfig {
    /// Read the configuration file from the specified project folder.
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Folder containing `plotting.toml`
    ///
    /// # Returns
    ///
    /// The validated configuration or an error if the file is missing or invalid
    pub fn from_path<P: AsRef<Path>>(project_dir: P) -> Result<PlottingConfig> {
        let project_dir = project_dir.as_ref();
        let file_path = project_dir.join(CONFIG_FILE_NAME);
        let mut config: PlottingConfig = read_toml(&file_path)?;
        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;
        config.results_dir = project_dir.join(&config.results_dir);

        Ok(config)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.horizons.is_empty(), "`horizons` is empty");
        ensure!(!self.scenarios.is_empty(), "`scenarios` is empty");

        let years = self.horizons.iter().map(|h| h.year).collect_vec();
        ensure!(
            is_sorted_and_unique(&years),
            "Horizon years must be composed of unique values in order"
        );

        check_ids_unique(self.scenarios.iter().map(|s| &s.id))?;
        if let Some(name) = self.scenarios.iter().map(|s| &s.name).duplicates().next() {
            bail!("Duplicate scenario name found: {name}");
        }
        ensure!(
            self.scenarios.iter().all(|s| &*s.id.0 != BAU_SCENARIO),
            "Scenario ID {BAU_SCENARIO} is reserved for the business-as-usual scenario"
        );

        if let Some(bau_horizon) = self.bau_horizon {
            ensure!(
                years.contains(&bau_horizon),
                "`bau_horizon` ({bau_horizon}) is not one of the horizons"
            );
        }

        Ok(())
    }

    /// The sector options string used in network names for the given horizon
    pub fn sector_opts_for(&self, horizon: &HorizonParameters) -> String {
        format!(
            "Co2L{}-{}-{}",
            horizon.co2_limit, self.time_resolution, self.sector_opts
        )
    }

    /// Iterate over the planning horizons for the policy scenarios (all but the BAU horizon)
    pub fn planning_horizons(&self) -> impl Iterator<Item = &HorizonParameters> {
        self.horizons
            .iter()
            .filter(move |h| Some(h.year) != self.bau_horizon)
    }

    /// The key identifying the network for a scenario and horizon
    pub fn network_key(&self, horizon: &HorizonParameters, scenario: &ScenarioID) -> NetworkKey {
        NetworkKey {
            line_limit: horizon.line_limit.clone(),
            clusters: self.clusters,
            sector_opts: self.sector_opts_for(horizon),
            horizon: horizon.year,
            scenario: scenario.clone(),
        }
    }

    /// The key identifying the business-as-usual network, if there is one
    pub fn bau_network_key(&self) -> Option<NetworkKey> {
        let year = self.bau_horizon?;
        let horizon = self.horizons.iter().find(|h| h.year == year)?;
        Some(self.network_key(horizon, &BAU_SCENARIO.into()))
    }
}
