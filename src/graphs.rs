//! The named graphs of the reports: which chart, from which part of which file.

use crate::{
    normalize::{flatten, flatten_all, NameRewrite},
    BenchTable, BenchmarkRow, ChartKind, RawBenchmarkDocument, ReportError,
};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Key path of the benchmark groups in a combined divan output file.
pub const TABLES_KEY_PATH: [&str; 2] = ["benchmarks", "tables"];

/// Report graph, selected by name on the command line or by the stem of a `.graph` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Graph {
    RandomInserts,
    RandomGetIds,
    Snapshot,
    GetTotalPremCredits,
    RewardPremiumUsers,
    RandomWorkloads,
    RandomInsertBoxplot,
    DataLogs,
    UserDetails,
    PullArena,
    StringCopy,
    SalesAnalytics,
}

/// Where a graph's rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    /// One benchmark of a combined output file, under [`TABLES_KEY_PATH`]; rows are that
    /// benchmark's variants and parameters.
    Tables { benchmark: &'static str },
    /// A per-benchmark file as written by `split`: every key is a query.
    Document,
}

/// How to draw a [`Graph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSpec {
    pub kind: ChartKind,
    pub source: GraphSource,
    /// Draw at most this many queries per chart, writing one file per chunk.
    pub queries_per_chunk: Option<usize>,
    /// Drop generic arguments from variant names (`Arena<u64>` becomes `Arena`).
    pub strip_generics: bool,
}

impl GraphSpec {
    fn new(kind: ChartKind, source: GraphSource) -> Self {
        Self {
            kind,
            source,
            queries_per_chunk: None,
            strip_generics: false,
        }
    }

    fn chunked(mut self, queries: usize) -> Self {
        self.queries_per_chunk = Some(queries);
        self
    }

    fn stripping_generics(mut self) -> Self {
        self.strip_generics = true;
        self
    }

    /// Reads the rows this graph draws from the file at `input`.
    pub fn load(&self, input: &Path) -> Result<BenchTable<BenchmarkRow>, ReportError> {
        log::trace!("entering `load`: {}", input.display());
        let rows = match &self.source {
            GraphSource::Tables { benchmark } => {
                let doc = self.prepare(RawBenchmarkDocument::from_file(input, &TABLES_KEY_PATH)?)?;
                flatten(&doc, benchmark)?
            }
            GraphSource::Document => {
                let doc = self.prepare(RawBenchmarkDocument::from_file(input, &[])?)?;
                flatten_all(&doc)?
            }
        };
        log::debug!("loaded {} rows from {}", rows.len(), input.display());
        Ok(rows.into())
    }

    fn prepare(&self, doc: RawBenchmarkDocument) -> Result<RawBenchmarkDocument, ReportError> {
        if self.strip_generics {
            Ok(NameRewrite::strip_generic_args()?.apply_to(&doc))
        } else {
            Ok(doc)
        }
    }

    /// The rows split into the tables drawn as separate charts.
    pub fn chunks(&self, table: &BenchTable<BenchmarkRow>) -> Vec<BenchTable<BenchmarkRow>> {
        match self.queries_per_chunk {
            Some(n) => table.split_by_queries(n),
            None => vec![table.clone()],
        }
    }
}

fn time_line(title: &str, param: &str) -> ChartKind {
    ChartKind::TimeLine {
        title: title.to_owned(),
        param: param.to_owned(),
    }
}

fn rate_line(title: &str, param: &str) -> ChartKind {
    ChartKind::RateLine {
        title: title.to_owned(),
        param: param.to_owned(),
    }
}

fn speedup(title: &str, param_value: u64) -> ChartKind {
    ChartKind::Speedup {
        title: title.to_owned(),
        param_value,
    }
}

impl Graph {
    /// Name used on the command line and as `.graph` file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Graph::RandomInserts => "random_inserts",
            Graph::RandomGetIds => "random_get_ids",
            Graph::Snapshot => "snapshot",
            Graph::GetTotalPremCredits => "get_total_prem_credits",
            Graph::RewardPremiumUsers => "reward_premium_users",
            Graph::RandomWorkloads => "random_workloads",
            Graph::RandomInsertBoxplot => "random_insert_boxplot",
            Graph::DataLogs => "data_logs",
            Graph::UserDetails => "user_details",
            Graph::PullArena => "pull_arena",
            Graph::StringCopy => "string_copy",
            Graph::SalesAnalytics => "sales_analytics",
        }
    }

    /// # Errors
    /// [`ReportError::UnknownGraph`] if no graph has this name.
    pub fn from_name(name: &str) -> Result<Self, ReportError> {
        Self::value_variants()
            .iter()
            .find(|g| g.name() == name)
            .copied()
            .ok_or_else(|| ReportError::UnknownGraph(name.to_owned()))
    }

    pub fn all() -> &'static [Graph] {
        Self::value_variants()
    }

    /// Graphs drawn from a per-benchmark file rather than from the combined output file.
    pub fn documents() -> impl Iterator<Item = Graph> {
        Self::all()
            .iter()
            .copied()
            .filter(|g| g.spec().source == GraphSource::Document)
    }

    /// The file this graph reads: `tables_file` for graphs over the combined output, and
    /// `<bench_dir>/<name>.json` (as written by `split`) for the others.
    pub fn input_path(&self, tables_file: &Path, bench_dir: &Path) -> PathBuf {
        match self.spec().source {
            GraphSource::Tables { .. } => tables_file.to_path_buf(),
            GraphSource::Document => bench_dir.join(format!("{}.json", self.name())),
        }
    }

    pub fn spec(&self) -> GraphSpec {
        use GraphSource::{Document, Tables};
        const ROWS: &str = "Number of rows";
        match self {
            Graph::RandomInserts => GraphSpec::new(
                time_line("Time taken to insert rows", ROWS),
                Tables { benchmark: "random_inserts" },
            ),
            Graph::RandomGetIds => GraphSpec::new(
                rate_line("Rows per second when all rows are fetched in random order", ROWS),
                Tables { benchmark: "random_get_ids" },
            ),
            Graph::Snapshot => GraphSpec::new(
                speedup("Comparative time to make a snapshot of 262144 rows", 262144),
                Tables { benchmark: "snapshot" },
            ),
            Graph::GetTotalPremCredits => GraphSpec::new(
                speedup(
                    "Comparative time to calculate the total premium credits for 262144 rows",
                    262144,
                ),
                Tables { benchmark: "get_total_prem_credits" },
            ),
            Graph::RewardPremiumUsers => GraphSpec::new(
                rate_line(
                    "Time taken to update all premium users credits, and return the change in credits",
                    ROWS,
                ),
                Tables { benchmark: "reward_premium_users" },
            ),
            Graph::RandomWorkloads => GraphSpec::new(
                time_line(
                    "Time taken to perform a number of random actions on the database",
                    "Number of actions",
                ),
                Tables { benchmark: "random_workloads" },
            ),
            Graph::RandomInsertBoxplot => GraphSpec::new(
                speedup("Comparative time for inserts of 262144 rows", 262144),
                Tables { benchmark: "random_inserts" },
            ),
            Graph::DataLogs => GraphSpec::new(ChartKind::GroupedBars, Document),
            Graph::UserDetails => GraphSpec::new(ChartKind::SeparateLines, Document).chunked(3),
            Graph::PullArena => {
                GraphSpec::new(ChartKind::SeparateLines, Document).stripping_generics()
            }
            Graph::StringCopy => GraphSpec::new(ChartKind::SeparateBars, Document),
            Graph::SalesAnalytics => GraphSpec::new(ChartKind::SeparateLines, Document),
        }
    }
}
