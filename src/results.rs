//! Access to the exported results of solved networks.
//!
//! Each solved network is identified by a [`NetworkKey`]. The summaries only ever need a handful
//! of pre-aggregated statistics from a network, which are read through a [`ResultsProvider`].
use crate::id::ScenarioID;
use crate::input::read_csv;
use crate::units::{Capacity, Dimensionless, Energy, Length, Money, MoneyPerCapacity};
use anyhow::Result;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;
use std::path::PathBuf;

/// The file name for network statistics
const STATISTICS_FILE_NAME: &str = "statistics.csv";

/// The file name for transmission line parameters
const LINES_FILE_NAME: &str = "lines.csv";

/// The file name for the shadow prices of transmission line limits
const LINE_DUALS_FILE_NAME: &str = "line_duals.csv";

/// Identifies a solved network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkKey {
    /// Transmission expansion limit (e.g. "v1.15")
    pub line_limit: String,
    /// Number of clusters
    pub clusters: u32,
    /// Sector options (e.g. "Co2L0.45-3H-T-H-B-I")
    pub sector_opts: String,
    /// The planning horizon
    pub horizon: u32,
    /// The scenario
    pub scenario: ScenarioID,
}

impl NetworkKey {
    /// The network's name, as used for the folder containing its results
    pub fn network_name(&self) -> String {
        format!(
            "elec_s_{}_l{}__{}_{}",
            self.clusters, self.line_limit, self.sector_opts, self.horizon
        )
    }
}

impl fmt::Display for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scenario, self.network_name())
    }
}

/// The type of network component a row of statistics refers to
#[derive(PartialEq, Eq, Debug, Clone, Copy, DeserializeLabeledStringEnum)]
pub enum Component {
    /// Generators (e.g. wind turbines, solar panels)
    #[string = "Generator"]
    Generator,
    /// Conversion technologies and DC links
    #[string = "Link"]
    Link,
    /// Storage with a fixed energy-to-power ratio
    #[string = "StorageUnit"]
    StorageUnit,
    /// Stores of energy
    #[string = "Store"]
    Store,
    /// AC transmission lines
    #[string = "Line"]
    Line,
    /// Transformers
    #[string = "Transformer"]
    Transformer,
    /// Loads
    #[string = "Load"]
    Load,
}

/// A row of a network's statistics, grouped by component and carrier.
///
/// Missing values are treated as zero when summed.
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct StatisticsRow {
    /// The component type
    pub component: Component,
    /// The carrier (raw technology label)
    pub carrier: String,
    /// Energy which could have been generated but was not used
    pub curtailment: Option<Energy>,
    /// Annualised investment costs
    pub capital_expenditure: Option<Money>,
    /// Operational costs
    pub operational_expenditure: Option<Money>,
    /// Optimised capacity
    pub optimal_capacity: Option<Capacity>,
}

/// Parameters of a transmission line
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct LineRow {
    /// The line's name
    pub line: String,
    /// The line's length
    pub length: Length,
}

/// Shadow prices of a line's flow limits for one snapshot
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct LineDualRow {
    /// The snapshot's timestamp
    pub snapshot: String,
    /// The snapshot's weighting
    pub weight: Dimensionless,
    /// The line's name
    pub line: String,
    /// Shadow price of the upper flow limit
    pub mu_upper: MoneyPerCapacity,
    /// Shadow price of the lower flow limit
    pub mu_lower: MoneyPerCapacity,
}

/// The data needed to estimate the congestion of a network's transmission lines
#[derive(PartialEq, Debug, Clone, Default)]
pub struct LineCongestion {
    /// Line parameters
    pub lines: Vec<LineRow>,
    /// Shadow prices for every line and snapshot
    pub duals: Vec<LineDualRow>,
}

/// Supplies the results of solved networks.
///
/// `Ok(None)` means that no network was solved for the given key, which callers should treat as
/// a reason to skip that key rather than as a failure.
pub trait ResultsProvider {
    /// Load the statistics of a network
    fn load_statistics(&self, key: &NetworkKey) -> Result<Option<Vec<StatisticsRow>>>;

    /// Load the data required to estimate line congestion in a network
    fn load_line_congestion(&self, key: &NetworkKey) -> Result<Option<LineCongestion>>;
}

/// Reads network results from CSV files exported into a folder per network.
///
/// The folder for a network is `<results_dir>/<scenario>/postnetworks/<network name>`.
pub struct CsvResultsProvider {
    results_dir: PathBuf,
}

impl CsvResultsProvider {
    /// Create a provider reading from `results_dir`
    pub fn new<P: Into<PathBuf>>(results_dir: P) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// The folder containing the results for a network
    pub fn network_dir(&self, key: &NetworkKey) -> PathBuf {
        self.results_dir
            .join(&*key.scenario.0)
            .join("postnetworks")
            .join(key.network_name())
    }

    /// The network folder, if the network exists
    fn existing_network_dir(&self, key: &NetworkKey) -> Option<PathBuf> {
        let dir = self.network_dir(key);
        dir.is_dir().then_some(dir)
    }
}

impl ResultsProvider for CsvResultsProvider {
    fn load_statistics(&self, key: &NetworkKey) -> Result<Option<Vec<StatisticsRow>>> {
        let Some(dir) = self.existing_network_dir(key) else {
            return Ok(None);
        };

        read_csv(&dir.join(STATISTICS_FILE_NAME)).map(Some)
    }

    fn load_line_congestion(&self, key: &NetworkKey) -> Result<Option<LineCongestion>> {
        let Some(dir) = self.existing_network_dir(key) else {
            return Ok(None);
        };

        Ok(Some(LineCongestion {
            lines: read_csv(&dir.join(LINES_FILE_NAME))?,
            duals: read_csv(&dir.join(LINE_DUALS_FILE_NAME))?,
        }))
    }
}
