//! Total system costs and installed capacities, by technology.
use super::{StackedBars, StackedBarsOptions, prepare_stacked_bars, warn_missing_network};
use crate::config::{HorizonParameters, PlottingConfig};
use crate::labels::{DEFAULT_RULES, RuleSet};
use crate::output::write_table;
use crate::results::{Component, ResultsProvider, StatisticsRow};
use crate::table::{AggregationTable, Column};
use crate::units::{EUR_TO_BILLION_EUR, MW_TO_GW, Money};
use anyhow::Result;
use log::{debug, info};
use std::path::Path;

/// Components whose capacities are reported
const CAPACITY_COMPONENTS: [Component; 3] =
    [Component::Generator, Component::Link, Component::StorageUnit];

/// Carriers left out of the capacity chart before canonicalisation
const CAPACITY_EXCLUDED_CARRIERS: [&str; 1] = ["solid biomass transport"];

const COST_OPTIONS: StackedBarsOptions = StackedBarsOptions {
    quantity: "system cost",
    scale: EUR_TO_BILLION_EUR,
    unit: "EUR billion per year",
    threshold: 0.5,
    y_label: "System Cost [EUR billion per year]",
};

const CAPACITY_OPTIONS: StackedBarsOptions = StackedBarsOptions {
    quantity: "capacity",
    scale: MW_TO_GW,
    unit: "GW",
    threshold: 10.0,
    y_label: "Installed capacities [GW]",
};

/// A type of expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CostType {
    /// Annualised investment costs
    Capital,
    /// Operational costs
    Operational,
}

impl CostType {
    /// The expenditure of this type for a row of statistics
    fn expenditure(self, row: &StatisticsRow) -> Option<Money> {
        match self {
            Self::Capital => row.capital_expenditure,
            Self::Operational => row.operational_expenditure,
        }
    }
}

/// Costs of the given type for each carrier, summed over components
pub fn compute_costs(
    statistics: &[StatisticsRow],
    cost_type: CostType,
    column: Column,
) -> AggregationTable {
    let series = statistics.iter().map(|row| {
        let cost = cost_type.expenditure(row).unwrap_or_default();
        (row.carrier.as_str(), cost.value())
    });

    AggregationTable::from_series(column, series)
}

/// Optimal capacities of generators, links and storage units for each carrier
pub fn compute_capacities(statistics: &[StatisticsRow], column: Column) -> AggregationTable {
    let series = statistics
        .iter()
        .filter(|row| CAPACITY_COMPONENTS.contains(&row.component))
        .map(|row| {
            let capacity = row.optimal_capacity.unwrap_or_default();
            (row.carrier.as_str(), capacity.value())
        });

    AggregationTable::from_series(column, series)
}

/// Costs and capacities of all scenarios for one planning horizon
#[derive(Debug, Default)]
pub struct HorizonTables {
    /// Capital costs by carrier
    pub capital: AggregationTable,
    /// Operational costs by carrier
    pub operational: AggregationTable,
    /// Capacities by carrier
    pub capacities: AggregationTable,
}

impl HorizonTables {
    /// Total (capital plus operational) costs by carrier
    pub fn total_costs(&self) -> AggregationTable {
        self.capital.add(&self.operational)
    }
}

/// Collect cost and capacity tables for every scenario solved for `horizon`
pub fn horizon_tables(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    horizon: &HorizonParameters,
) -> Result<HorizonTables> {
    let mut tables = HorizonTables::default();
    for scenario in &config.scenarios {
        let key = config.network_key(horizon, &scenario.id);
        let Some(statistics) = provider.load_statistics(&key)? else {
            warn_missing_network(&key, config);
            continue;
        };

        let column = Column::new(horizon.year, &scenario.name);
        for (table, cost_type) in [
            (&mut tables.capital, CostType::Capital),
            (&mut tables.operational, CostType::Operational),
        ] {
            debug!("Calculating {cost_type} costs for {key}");
            table.join(&compute_costs(&statistics, cost_type, column.clone()))?;
        }
        tables
            .capacities
            .join(&compute_capacities(&statistics, column))?;
    }

    Ok(tables)
}

/// Prepare total costs by carrier for a stacked bar chart
pub fn prepare_costs(costs: AggregationTable, rules: &RuleSet) -> Result<StackedBars> {
    prepare_stacked_bars(costs, &COST_OPTIONS, rules)
}

/// Prepare capacities by carrier for a stacked bar chart
pub fn prepare_capacities(mut capacities: AggregationTable, rules: &RuleSet) -> Result<StackedBars> {
    for carrier in CAPACITY_EXCLUDED_CARRIERS {
        capacities.remove_row(carrier);
    }

    prepare_stacked_bars(capacities, &CAPACITY_OPTIONS, rules)
}

/// Generate cost and capacity tables for every planning horizon and write them to `output_path`
pub fn run(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    output_path: &Path,
) -> Result<()> {
    for horizon in config.planning_horizons() {
        let tables = horizon_tables(config, provider, horizon)?;

        let costs = tables.total_costs();
        if costs.is_empty() {
            info!("No cost data found for {}. Skipping...", horizon.year);
        } else {
            let bars = prepare_costs(costs, &DEFAULT_RULES)?;
            let file_name = format!("total_costs_{}_{}.csv", config.clusters, horizon.year);
            write_table(&output_path.join(file_name), &bars.table)?;
        }

        if tables.capacities.is_empty() {
            info!("No capacity data found for {}. Skipping...", horizon.year);
        } else {
            let bars = prepare_capacities(tables.capacities, &DEFAULT_RULES)?;
            let file_name = format!("total_capacities_{}_{}.csv", config.clusters, horizon.year);
            write_table(&output_path.join(file_name), &bars.table)?;
        }
    }

    Ok(())
}
