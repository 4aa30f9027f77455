//! Tables of aggregated values, keyed by technology label and (horizon, scenario).
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// A column of an [`AggregationTable`]: one scenario solved for one planning horizon
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    /// The planning horizon (year)
    pub horizon: u32,
    /// The human-facing scenario name
    pub scenario: String,
}

impl Column {
    /// Create a new [`Column`]
    pub fn new(horizon: u32, scenario: &str) -> Self {
        Self {
            horizon,
            scenario: scenario.to_string(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.scenario, self.horizon)
    }
}

/// Numeric values with labelled rows and [`Column`]s.
///
/// Row labels are unique. Both rows and columns keep the order in which they were first added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationTable {
    columns: IndexSet<Column>,
    rows: IndexMap<String, Vec<f64>>,
}

impl AggregationTable {
    /// Create a new, empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with a single column from `(label, value)` pairs.
    ///
    /// Values with the same label are summed.
    pub fn from_series<I, S>(column: Column, series: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        table.columns.insert(column);
        for (label, value) in series {
            table.rows.entry(label.into()).or_insert_with(|| vec![0.0])[0] += value;
        }

        table
    }

    /// Whether the table has no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// The columns of the table, in order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// The row labels of the table, in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Iterate over rows as `(label, values)`, with values in column order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    /// Get the value of a single cell
    pub fn get(&self, label: &str, column: &Column) -> Option<f64> {
        let idx = self.columns.get_index_of(column)?;
        self.rows.get(label).map(|values| values[idx])
    }

    /// Set the value of a single cell, adding the row and/or column if needed.
    ///
    /// New cells are filled with zero.
    pub fn set(&mut self, label: &str, column: &Column, value: f64) {
        let (idx, added) = self.columns.insert_full(column.clone());
        if added {
            for values in self.rows.values_mut() {
                values.push(0.0);
            }
        }

        let n_columns = self.columns.len();
        self.rows
            .entry(label.to_string())
            .or_insert_with(|| vec![0.0; n_columns])[idx] = value;
    }

    /// Remove a row, returning its values if it was present
    pub fn remove_row(&mut self, label: &str) -> Option<Vec<f64>> {
        self.rows.shift_remove(label)
    }

    /// The largest value in the given row, or `None` if the row doesn't exist or has no values
    pub fn row_max(&self, label: &str) -> Option<f64> {
        self.rows.get(label).and_then(|values| max_value(values))
    }

    /// Sum of every column
    pub fn column_totals(&self) -> Vec<(&Column, f64)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let total = self.rows.values().map(|values| values[idx]).sum::<f64>();
                (column, total)
            })
            .collect()
    }

    /// Outer join with another table on row labels.
    ///
    /// The columns of `other` are appended; cells missing on either side are filled with zero.
    /// It is an error for both tables to share a column.
    pub fn join(&mut self, other: &AggregationTable) -> Result<()> {
        for column in &other.columns {
            ensure!(
                !self.columns.contains(column),
                "Column {column} is present in both tables"
            );
        }

        let n_existing = self.columns.len();
        let n_other = other.columns.len();
        self.columns.extend(other.columns.iter().cloned());
        for values in self.rows.values_mut() {
            values.resize(n_existing + n_other, 0.0);
        }

        for (label, other_values) in &other.rows {
            let values = self
                .rows
                .entry(label.clone())
                .or_insert_with(|| vec![0.0; n_existing + n_other]);
            values[n_existing..].copy_from_slice(other_values);
        }

        Ok(())
    }

    /// Element-wise sum, aligned on row labels and columns. Missing cells count as zero.
    pub fn add(&self, other: &AggregationTable) -> AggregationTable {
        let mut sum = self.clone();
        for (label, values) in &other.rows {
            for (column, value) in other.columns.iter().zip(values) {
                let current = sum.get(label, column).unwrap_or(0.0);
                sum.set(label, column, current + value);
            }
        }

        sum
    }

    /// Relabel every row with `f`, summing rows which end up with the same label
    pub fn group_by_label<F>(&self, f: F) -> AggregationTable
    where
        F: Fn(&str) -> String,
    {
        let mut rows: IndexMap<String, Vec<f64>> = IndexMap::new();
        for (label, values) in &self.rows {
            let grouped = rows
                .entry(f(label))
                .or_insert_with(|| vec![0.0; values.len()]);
            for (total, value) in grouped.iter_mut().zip(values) {
                *total += value;
            }
        }

        AggregationTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Multiply every value by `factor`
    pub fn scale(mut self, factor: f64) -> AggregationTable {
        for value in self.rows.values_mut().flatten() {
            *value *= factor;
        }

        self
    }

    /// Split the table into rows whose maximum is at least `threshold` and rows below it.
    ///
    /// Rows without any values have no maximum and are kept, as are rows whose maximum is NaN.
    pub fn partition_by_threshold(self, threshold: f64) -> (AggregationTable, AggregationTable) {
        let (kept, dropped): (IndexMap<_, _>, IndexMap<_, _>) = self
            .rows
            .into_iter()
            .partition(|(_, values)| {
                max_value(values).is_none_or(|max| max.is_nan() || max >= threshold)
            });

        (
            AggregationTable {
                columns: self.columns.clone(),
                rows: kept,
            },
            AggregationTable {
                columns: self.columns,
                rows: dropped,
            },
        )
    }

    /// Reindex the table to the given row labels, in the given order.
    ///
    /// Rows not listed are left out. Every listed label must be present.
    pub fn select_rows<S: AsRef<str>>(&self, labels: &[S]) -> Result<AggregationTable> {
        let rows = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                let values = self
                    .rows
                    .get(label)
                    .with_context(|| format!("Unknown row label: {label}"))?;
                Ok((label.to_string(), values.clone()))
            })
            .collect::<Result<_>>()?;

        Ok(AggregationTable {
            columns: self.columns.clone(),
            rows,
        })
    }
}

/// Drop every row of `table` whose maximum across all columns is strictly below `threshold`
pub fn filter_by_threshold(table: AggregationTable, threshold: f64) -> AggregationTable {
    table.partition_by_threshold(threshold).0
}

/// The largest of `values`, if any
fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
