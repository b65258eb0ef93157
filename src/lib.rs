//! Turns divan benchmark output into charts for LaTeX reports.
//!
//! The core is a normalizer that flattens the nested divan document
//! (`benchmark -> variant -> scale factor -> timings`) into rows, converts timings to rates,
//! and picks readable units. Charts are drawn with plotters and written as TikZ, PDF, or shown
//! in a viewer. The [`artifacts`] and [`bench_runner`] modules regenerate a whole report.
//!
//! ```rust
//! use bench_report::{flatten, to_rates, RawBenchmarkDocument};
//!
//! let doc = RawBenchmarkDocument::from_json_str(
//!     r#"{"q1": {"v1": {"10": {"time": {"fastest": 1, "mean": 2, "median": 2, "slowest": 3}}}}}"#,
//! )?;
//! let rows = flatten(&doc, "q1")?;
//! let rates = to_rates(&rows)?;
//! assert_eq!(rates[0].rates.mean, 5.0);
//! # Ok::<(), bench_report::ReportError>(())
//! ```
#![deny(clippy::unwrap_used)]

mod error;
pub use error::*;

mod stats;
pub use stats::*;

pub mod document;
pub use document::RawBenchmarkDocument;

mod normalize;
pub use normalize::*;

mod table;
pub use table::*;

pub mod units;
pub use units::{choose_time_unit, choose_unit, UnitScale};

mod layout;
pub use layout::*;

mod palette;
pub use palette::*;

mod config;
pub use config::*;

mod chart;
pub use chart::*;

mod graphs;
pub use graphs::*;

pub mod tikz;
pub mod tools;

mod output;
pub use output::*;

pub mod pool;
pub mod artifacts;
pub mod bench_runner;
