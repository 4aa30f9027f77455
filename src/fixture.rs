//! Fixtures for tests
use crate::config::{HorizonParameters, PlottingConfig, ScenarioDefinition};
use crate::results::{Component, LineCongestion, NetworkKey, ResultsProvider, StatisticsRow};
use crate::units::{Capacity, Energy, Money};
use anyhow::Result;
use rstest::fixture;
use std::collections::HashMap;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A [`ResultsProvider`] holding results for a fixed set of (scenario, horizon) pairs
#[derive(Default)]
pub struct MockProvider {
    statistics: HashMap<(String, u32), Vec<StatisticsRow>>,
    congestion: HashMap<(String, u32), LineCongestion>,
}

impl MockProvider {
    /// Add statistics for a network
    pub fn add_statistics(&mut self, scenario: &str, horizon: u32, rows: Vec<StatisticsRow>) {
        self.statistics.insert((scenario.into(), horizon), rows);
    }

    /// Add line congestion data for a network
    pub fn add_congestion(&mut self, scenario: &str, horizon: u32, data: LineCongestion) {
        self.congestion.insert((scenario.into(), horizon), data);
    }
}

impl ResultsProvider for MockProvider {
    fn load_statistics(&self, key: &NetworkKey) -> Result<Option<Vec<StatisticsRow>>> {
        let id = (key.scenario.to_string(), key.horizon);
        Ok(self.statistics.get(&id).cloned())
    }

    fn load_line_congestion(&self, key: &NetworkKey) -> Result<Option<LineCongestion>> {
        let id = (key.scenario.to_string(), key.horizon);
        Ok(self.congestion.get(&id).cloned())
    }
}

/// Create a [`StatisticsRow`] with the given values
pub fn statistics_row(
    component: Component,
    carrier: &str,
    curtailment: f64,
    capital_expenditure: f64,
    operational_expenditure: f64,
    optimal_capacity: f64,
) -> StatisticsRow {
    StatisticsRow {
        component,
        carrier: carrier.into(),
        curtailment: Some(Energy(curtailment)),
        capital_expenditure: Some(Money(capital_expenditure)),
        operational_expenditure: Some(Money(operational_expenditure)),
        optimal_capacity: Some(Capacity(optimal_capacity)),
    }
}

#[fixture]
pub fn statistics() -> Vec<StatisticsRow> {
    vec![
        statistics_row(Component::Generator, "solar rooftop", 10.0, 2e9, 1e8, 30e3),
        statistics_row(Component::Generator, "Solar", 20.0, 3e9, 0.0, 40e3),
        statistics_row(Component::Generator, "Onshore Wind", 5.0, 4e9, 2e8, 50e3),
        statistics_row(Component::Generator, "Offshore Wind (AC)", 1.0, 1e9, 0.0, 8e3),
        statistics_row(Component::Generator, "Offshore Wind (DC)", 2.0, 1e9, 0.0, 7e3),
        statistics_row(Component::Link, "urban central gas CHP", 0.0, 2e8, 4e8, 20e3),
        statistics_row(Component::Link, "rural gas boiler", 0.0, 1e8, 1e8, 5e3),
        statistics_row(Component::Store, "gas", 0.0, 3e9, 0.0, 1e6),
        statistics_row(Component::Line, "AC", 0.0, 5e9, 0.0, 300e3),
        statistics_row(Component::Link, "solid biomass transport", 0.0, 1e9, 0.0, 50e3),
    ]
}

#[fixture]
pub fn config() -> PlottingConfig {
    PlottingConfig {
        clusters: 48,
        sector_opts: "T-H-B-I".into(),
        time_resolution: "3H".into(),
        results_dir: PathBuf::from("results"),
        bau_horizon: Some(2020),
        horizons: vec![
            HorizonParameters {
                year: 2020,
                line_limit: "v1.0".into(),
                co2_limit: "0.7".into(),
            },
            HorizonParameters {
                year: 2030,
                line_limit: "v1.15".into(),
                co2_limit: "0.45".into(),
            },
            HorizonParameters {
                year: 2040,
                line_limit: "v1.3".into(),
                co2_limit: "0.1".into(),
            },
        ],
        scenarios: vec![
            ScenarioDefinition {
                id: "flexible".into(),
                name: "Optimal Renovation and Heating".into(),
            },
            ScenarioDefinition {
                id: "rigid".into(),
                name: "No Renovation and Green Heating".into(),
            },
        ],
    }
}
