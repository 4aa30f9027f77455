//! Curtailment of variable renewable generation.
use super::warn_missing_network;
use crate::config::{BAU_SCENARIO, PlottingConfig};
use crate::output::write_table;
use crate::results::{NetworkKey, ResultsProvider, StatisticsRow};
use crate::table::{AggregationTable, Column};
use crate::units::{Energy, MWH_TO_TWH};
use anyhow::Result;
use log::info;
use std::path::Path;

/// The technology groups reported, with the carriers belonging to each
const TECHNOLOGY_GROUPS: [(&str, &[&str]); 4] = [
    ("Solar Rooftop PV", &["solar rooftop"]),
    ("Solar Utility PV", &["Solar"]),
    ("Onshore Wind", &["Onshore Wind"]),
    ("Offshore Wind", &["Offshore Wind (AC)", "Offshore Wind (DC)"]),
];

/// The label of the row containing the sum over all groups
pub const TOTAL: &str = "Total";

/// Curtailment of each technology group in a network, followed by the total
pub fn get_curtailment(statistics: &[StatisticsRow]) -> Vec<(&'static str, Energy)> {
    let mut curtailment: Vec<(&'static str, Energy)> = TECHNOLOGY_GROUPS
        .iter()
        .map(|(name, carriers)| {
            let total: Energy = statistics
                .iter()
                .filter(|row| carriers.contains(&row.carrier.as_str()))
                .filter_map(|row| row.curtailment)
                .sum();
            (*name, total)
        })
        .collect();

    let total: Energy = curtailment.iter().map(|(_, value)| *value).sum();
    curtailment.push((TOTAL, total));

    curtailment
}

/// Load the curtailment for one network as a single-column table
fn load_column(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    key: &NetworkKey,
    scenario_name: &str,
) -> Result<Option<AggregationTable>> {
    let Some(statistics) = provider.load_statistics(key)? else {
        warn_missing_network(key, config);
        return Ok(None);
    };

    let series = get_curtailment(&statistics)
        .into_iter()
        .map(|(name, value)| (name, value.value()));
    Ok(Some(AggregationTable::from_series(
        Column::new(key.horizon, scenario_name),
        series,
    )))
}

/// Build the curtailment table for all scenarios and planning horizons.
///
/// The business-as-usual network, if configured, is added as the last column.
pub fn curtailment_table(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
) -> Result<AggregationTable> {
    let mut table = AggregationTable::new();
    for horizon in config.planning_horizons() {
        for scenario in &config.scenarios {
            let key = config.network_key(horizon, &scenario.id);
            if let Some(column) = load_column(config, provider, &key, &scenario.name)? {
                table.join(&column)?;
            }
        }
    }

    if let Some(key) = config.bau_network_key()
        && let Some(column) = load_column(config, provider, &key, BAU_SCENARIO)?
    {
        table.join(&column)?;
    }

    Ok(table)
}

/// Generate the curtailment table and write it to `output_path`
pub fn run(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    output_path: &Path,
) -> Result<()> {
    let table = curtailment_table(config, provider)?;
    if table.is_empty() {
        info!("No curtailment data found. Skipping...");
        return Ok(());
    }

    let totals = table.clone().scale(MWH_TO_TWH);
    for column in totals.columns() {
        if let Some(total) = totals.get(TOTAL, column) {
            info!("Curtailment for {column}: {total:.2} TWh");
        }
    }

    let file_name = format!("curtailment_{}.csv", config.clusters);
    write_table(&output_path.join(file_name), &table)
}
