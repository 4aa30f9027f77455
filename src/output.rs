//! The module responsible for writing output data to disk.
use crate::summary::congestion::{CongestionTable, INDEX_HEADER};
use crate::table::AggregationTable;
use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which project-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "esm_summary_results";

/// Get the default output folder for the project at `project_dir`
pub fn get_output_dir(project_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let project_dir = project_dir
        .canonicalize()
        .context("Could not resolve path to project")?;

    let project_name = project_dir
        .file_name()
        .context("Project cannot be in root folder")?
        .to_str()
        .context("Invalid chars in project dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, project_name].iter().collect())
}

/// Create a new output directory, with parents.
///
/// If the folder already exists and is not empty, it is an error unless `allow_overwrite` is
/// true. Returns whether existing output will be overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder {} already exists and is not empty. Use the --overwrite option to \
            overwrite it.",
            output_dir.display()
        );
        return Ok(true);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Could not create output folder {}", output_dir.display()))?;

    Ok(false)
}

/// Write an [`AggregationTable`] to a CSV file.
///
/// The first two rows hold the year and scenario of each column, followed by one row per label.
pub fn write_table(file_path: &Path, table: &AggregationTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;

    let years = table.columns().map(|column| column.horizon.to_string());
    writer.write_record(std::iter::once("Year".to_string()).chain(years))?;
    let scenarios = table.columns().map(|column| column.scenario.as_str());
    writer.write_record(std::iter::once("Scenario").chain(scenarios))?;

    for (label, values) in table.iter_rows() {
        let values = values.iter().map(ToString::to_string);
        writer.write_record(std::iter::once(label.to_string()).chain(values))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write a [`CongestionTable`] to a CSV file. Missing values are written as empty cells.
pub fn write_congestion_table(file_path: &Path, table: &CongestionTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;

    let horizons = table.horizons().iter().map(ToString::to_string);
    writer.write_record(std::iter::once(INDEX_HEADER.to_string()).chain(horizons))?;
    for (scenario, values) in table.iter_rows() {
        let values = values
            .iter()
            .map(|value| value.map_or_else(String::new, |v| v.to_string()));
        writer.write_record(std::iter::once(scenario.to_string()).chain(values))?;
    }
    writer.flush()?;

    Ok(())
}
