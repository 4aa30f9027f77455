//! Summary tables built from the results of solved networks.
use crate::config::PlottingConfig;
use crate::labels::{RuleSet, canonicalize, order_categories};
use crate::results::{NetworkKey, ResultsProvider};
use crate::table::AggregationTable;
use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use strum::IntoEnumIterator;

pub mod congestion;
pub mod costs;
pub mod curtailment;

/// The reports which can be generated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Report {
    /// Curtailment of variable renewables
    Curtailment,
    /// System costs and installed capacities
    Costs,
    /// Transmission line congestion
    Congestion,
}

impl Report {
    /// Generate the report and write its tables to `output_path`
    pub fn run(
        self,
        config: &PlottingConfig,
        provider: &impl ResultsProvider,
        output_path: &Path,
    ) -> Result<()> {
        info!("Generating {self} report");
        match self {
            Self::Curtailment => curtailment::run(config, provider, output_path),
            Self::Costs => costs::run(config, provider, output_path),
            Self::Congestion => congestion::run(config, provider, output_path),
        }
    }
}

/// Generate the given reports, or all of them if `reports` is empty
pub fn run_reports(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    output_path: &Path,
    reports: &[Report],
) -> Result<()> {
    if reports.is_empty() {
        for report in Report::iter() {
            report.run(config, provider, output_path)?;
        }
    } else {
        for report in reports {
            report.run(config, provider, output_path)?;
        }
    }

    Ok(())
}

/// Log that a network is missing and will be skipped
fn warn_missing_network(key: &NetworkKey, config: &PlottingConfig) {
    warn!(
        "Network is not found for scenario '{}', planning year '{}', and time resolution of \
        '{}'. Skipping...",
        key.scenario, key.horizon, config.time_resolution
    );
}

/// A table ready to be drawn as a stacked bar chart.
///
/// Rows are in stack order (bottom to top) and columns are the bars.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBars {
    /// The values to stack
    pub table: AggregationTable,
    /// The y-axis label
    pub y_label: &'static str,
}

impl StackedBars {
    /// The stacked categories, from bottom to top
    pub fn stack_order(&self) -> impl Iterator<Item = &str> {
        self.table.labels()
    }

    /// The order of entries in the legend (top of the stack first)
    pub fn legend_order(&self) -> Vec<&str> {
        let mut order: Vec<_> = self.stack_order().collect();
        order.reverse();
        order
    }
}

/// Parameters for turning a table of raw technology values into [`StackedBars`]
struct StackedBarsOptions {
    /// What the values represent, for log messages
    quantity: &'static str,
    /// Factor converting model units to presentation units
    scale: f64,
    /// The presentation unit
    unit: &'static str,
    /// Technologies whose largest value is below this are left out
    threshold: f64,
    /// The y-axis label
    y_label: &'static str,
}

/// Convert, canonicalise, filter and order a table of raw technology values
fn prepare_stacked_bars(
    table: AggregationTable,
    options: &StackedBarsOptions,
    rules: &RuleSet,
) -> Result<StackedBars> {
    let table = table
        .scale(options.scale)
        .group_by_label(|label| canonicalize(label, rules));

    info!(
        "Dropping technology with {} below {} {}",
        options.quantity, options.threshold, options.unit
    );
    let (table, dropped) = table.partition_by_threshold(options.threshold);
    for (label, values) in dropped.iter_rows() {
        debug!("Dropped {label}: {values:?}");
    }

    for (column, total) in table.column_totals() {
        info!(
            "Total {} for {column} is {} {}",
            options.quantity,
            total.round(),
            options.unit
        );
    }

    let order = order_categories(table.labels(), rules);
    Ok(StackedBars {
        table: table.select_rows(&order)?,
        y_label: options.y_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::DEFAULT_RULES;
    use crate::table::Column;
    use float_cmp::assert_approx_eq;

    fn options() -> StackedBarsOptions {
        StackedBarsOptions {
            quantity: "cost",
            scale: 1e-9,
            unit: "EUR billion per year",
            threshold: 0.5,
            y_label: "System Cost [EUR billion per year]",
        }
    }

    #[test]
    fn test_prepare_stacked_bars() {
        let column = Column::new(2030, "A");
        let table = AggregationTable::from_series(
            column.clone(),
            [
                ("Solar", 2e9),
                ("solar", 1e9),
                ("unknown", 1e9),
                ("urban central gas CHP", 3e9),
                ("gas", 5e9),
                ("AC", 0.1e9),
                ("Onshore Wind", 4e9),
            ],
        );

        let bars = prepare_stacked_bars(table, &options(), &DEFAULT_RULES).unwrap();
        assert_eq!(
            bars.stack_order().collect::<Vec<_>>(),
            ["onshore wind", "solar PV", "gas CHP", "unknown"]
        );
        assert_eq!(
            bars.legend_order(),
            ["unknown", "gas CHP", "solar PV", "onshore wind"]
        );
        assert_approx_eq!(f64, bars.table.get("solar PV", &column).unwrap(), 3.0);
        assert_eq!(bars.y_label, "System Cost [EUR billion per year]");
    }

    #[test]
    fn test_report_display() {
        assert_eq!(Report::Curtailment.to_string(), "curtailment");
        assert_eq!(Report::iter().count(), 3);
    }
}
