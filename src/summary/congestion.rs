//! Estimated congestion of the transmission grid.
//!
//! Congestion is estimated from the shadow prices of the lines' flow limits. For each line, the
//! weighted shadow price is averaged over snapshots and multiplied by the line's length; the
//! result is averaged over lines. This is done separately for the upper and lower limits and the
//! two estimates are averaged.
use super::warn_missing_network;
use crate::config::PlottingConfig;
use crate::output::write_congestion_table;
use crate::results::{LineCongestion, LineDualRow, ResultsProvider};
use crate::units::{EUR_TO_MILLION_EUR, Length, MoneyPerCapacity};
use anyhow::Result;
use indexmap::IndexMap;
use log::info;
use std::path::Path;

/// The header of the column containing scenario names
pub const INDEX_HEADER: &str = "Scenario [m. Eur/MW]";

/// Mean over lines of (mean weighted shadow price over snapshots) times line length.
///
/// Lines without a known length or without any shadow prices are left out.
fn mean_line_price<F>(data: &LineCongestion, price: F) -> Option<f64>
where
    F: Fn(&LineDualRow) -> MoneyPerCapacity,
{
    let lengths: IndexMap<&str, Length> = data
        .lines
        .iter()
        .map(|line| (line.line.as_str(), line.length))
        .collect();

    // Sum and number of snapshots for each line
    let mut totals: IndexMap<&str, (f64, f64)> = IndexMap::new();
    for dual in &data.duals {
        let weighted = price(dual) * dual.weight;
        let (sum, count) = totals.entry(dual.line.as_str()).or_default();
        *sum += weighted.value();
        *count += 1.0;
    }

    let (sum, count) = totals
        .into_iter()
        .filter_map(|(line, (sum, count))| {
            let length = lengths.get(line)?;
            let mean = MoneyPerCapacity(sum / count);
            Some((mean * *length).value())
        })
        .fold((0.0, 0.0), |(sum, count), value| (sum + value, count + 1.0));

    (count > 0.0).then(|| sum / count)
}

/// Round to two decimal places, with halves rounded away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate the congestion of a network's grid in million EUR/MW, rounded to two decimals.
///
/// Returns `None` if there are no lines with shadow prices.
pub fn estimate_congestion(data: &LineCongestion) -> Option<f64> {
    let upper = mean_line_price(data, |dual| dual.mu_upper)?;
    let lower = mean_line_price(data, |dual| dual.mu_lower)?;
    let congestion = (upper + lower) / 2.0;

    Some(round2(congestion * EUR_TO_MILLION_EUR))
}

/// Congestion estimates with scenarios as rows and planning horizons as columns.
///
/// Cells are empty for networks which were not found.
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionTable {
    horizons: Vec<u32>,
    rows: IndexMap<String, Vec<Option<f64>>>,
}

impl CongestionTable {
    /// Create a table with empty cells for every scenario and horizon
    pub fn new<'a, S>(scenarios: S, horizons: Vec<u32>) -> Self
    where
        S: IntoIterator<Item = &'a str>,
    {
        let rows = scenarios
            .into_iter()
            .map(|name| (name.to_string(), vec![None; horizons.len()]))
            .collect();

        Self { horizons, rows }
    }

    /// The planning horizons, in column order
    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    /// Iterate over rows as `(scenario name, values)`
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.rows
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Get the value of a cell
    pub fn get(&self, scenario: &str, horizon: u32) -> Option<f64> {
        let idx = self.horizons.iter().position(|h| *h == horizon)?;
        self.rows.get(scenario)?[idx]
    }

    /// Set the value of a cell. Unknown scenarios and horizons are ignored.
    fn set(&mut self, scenario: &str, horizon: u32, value: Option<f64>) {
        if let Some(idx) = self.horizons.iter().position(|h| *h == horizon)
            && let Some(values) = self.rows.get_mut(scenario)
        {
            values[idx] = value;
        }
    }

    /// Whether no cell has a value
    pub fn is_empty(&self) -> bool {
        self.rows.values().flatten().all(Option::is_none)
    }
}

/// Estimate congestion for every scenario and planning horizon
pub fn congestion_table(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
) -> Result<CongestionTable> {
    let horizons: Vec<_> = config.planning_horizons().collect();
    let mut table = CongestionTable::new(
        config.scenarios.iter().map(|scenario| scenario.name.as_str()),
        horizons.iter().map(|horizon| horizon.year).collect(),
    );

    for horizon in horizons {
        for scenario in &config.scenarios {
            let key = config.network_key(horizon, &scenario.id);
            let Some(data) = provider.load_line_congestion(&key)? else {
                warn_missing_network(&key, config);
                continue;
            };

            let congestion = estimate_congestion(&data);
            match congestion {
                Some(value) => info!("Line congestion for {key}: {value} m. EUR/MW"),
                None => info!("No line shadow prices found for {key}"),
            }
            table.set(&scenario.name, horizon.year, congestion);
        }
    }

    Ok(table)
}

/// Generate the congestion table and write it to `output_path`
pub fn run(
    config: &PlottingConfig,
    provider: &impl ResultsProvider,
    output_path: &Path,
) -> Result<()> {
    let table = congestion_table(config, provider)?;
    if table.is_empty() {
        info!("No line congestion data found. Skipping...");
        return Ok(());
    }

    let file_name = format!("line_congestion_{}.csv", config.clusters);
    write_congestion_table(&output_path.join(file_name), &table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{MockProvider, config};
    use crate::results::LineRow;
    use crate::units::Dimensionless;
    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::tempdir;

    fn dual(snapshot: &str, line: &str, mu_upper: f64, mu_lower: f64) -> LineDualRow {
        LineDualRow {
            snapshot: snapshot.into(),
            weight: Dimensionless(3.0),
            line: line.into(),
            mu_upper: MoneyPerCapacity(mu_upper),
            mu_lower: MoneyPerCapacity(mu_lower),
        }
    }

    #[fixture]
    fn line_congestion() -> LineCongestion {
        LineCongestion {
            lines: vec![
                LineRow {
                    line: "L1".into(),
                    length: Length(100.0),
                },
                LineRow {
                    line: "L2".into(),
                    length: Length(50.0),
                },
            ],
            duals: vec![
                dual("t1", "L1", 10000.0, -2000.0),
                dual("t1", "L2", 0.0, 0.0),
                dual("t2", "L1", 20000.0, 0.0),
                dual("t2", "L2", 0.0, 0.0),
            ],
        }
    }

    #[rstest]
    fn test_mean_line_price(line_congestion: LineCongestion) {
        // L1: mean(30000, 60000) * 100; L2: 0
        let upper = mean_line_price(&line_congestion, |dual| dual.mu_upper).unwrap();
        assert_approx_eq!(f64, upper, 2.25e6);
        let lower = mean_line_price(&line_congestion, |dual| dual.mu_lower).unwrap();
        assert_approx_eq!(f64, lower, -1.5e5);
    }

    #[rstest]
    fn test_estimate_congestion(line_congestion: LineCongestion) {
        assert_approx_eq!(f64, estimate_congestion(&line_congestion).unwrap(), 1.05);
    }

    #[rstest]
    fn test_estimate_congestion_unknown_line(mut line_congestion: LineCongestion) {
        // Lines without a length are left out
        line_congestion.lines.pop();
        assert_approx_eq!(f64, estimate_congestion(&line_congestion).unwrap(), 2.1);
    }

    #[test]
    fn test_estimate_congestion_no_duals() {
        assert_eq!(estimate_congestion(&LineCongestion::default()), None);
    }

    #[rstest]
    #[case(1.234, 1.23)]
    #[case(1.235_000_1, 1.24)]
    #[case(-0.005_000_1, -0.01)]
    #[case(2.0, 2.0)]
    fn test_round2(#[case] value: f64, #[case] expected: f64) {
        assert_approx_eq!(f64, round2(value), expected);
    }

    #[rstest]
    fn test_congestion_table(config: PlottingConfig, line_congestion: LineCongestion) {
        let mut provider = MockProvider::default();
        provider.add_congestion("flexible", 2030, line_congestion.clone());
        provider.add_congestion("rigid", 2040, line_congestion);

        // The BAU network is not part of this table
        provider.add_congestion("BAU", 2020, LineCongestion::default());

        let table = congestion_table(&config, &provider).unwrap();
        assert_eq!(table.horizons(), [2030, 2040]);
        assert_eq!(
            table.iter_rows().map(|(name, _)| name).collect::<Vec<_>>(),
            [
                "Optimal Renovation and Heating",
                "No Renovation and Green Heating"
            ]
        );
        assert_approx_eq!(
            f64,
            table.get("Optimal Renovation and Heating", 2030).unwrap(),
            1.05
        );
        assert_eq!(table.get("Optimal Renovation and Heating", 2040), None);
        assert!(table.get("No Renovation and Green Heating", 2040).is_some());
        assert!(!table.is_empty());
    }

    #[rstest]
    fn test_congestion_table_no_networks(config: PlottingConfig) {
        let table = congestion_table(&config, &MockProvider::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.iter_rows().count(), 2);
    }

    #[rstest]
    fn test_run_no_networks(config: PlottingConfig) {
        let dir = tempdir().unwrap();
        run(&config, &MockProvider::default(), dir.path()).unwrap();

        // Empty tables are not written
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
