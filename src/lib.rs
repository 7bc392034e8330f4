// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Plots benchmark results of several implementations of an algorithm
//! against a baseline implementation.
//!
//! Records are grouped by the implementation named in the benchmark name
//! (`<group>[_solution]/<input_size>`), every group is checked against the
//! baseline group for matching input sizes, and the remaining groups are
//! drawn as one line each.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

mod aggregate;
mod config;
mod error;
mod export;
mod logger;
mod plot;
mod record;
mod report;

pub use crate::aggregate::{compare, Aggregate, Series, SeriesCollection};
pub use crate::config::{Config, ConfigFile};
pub use crate::error::{Error, Result};
pub use crate::export::{ChartPayload, SeriesDescriptor};
pub use crate::logger::Logger;
pub use crate::plot::{ChartSink, PayloadWriter, Staged, SvgChart};
pub use crate::record::{BenchmarkFile, ChartTitle, ParsedSample, RawRecord, RecordParser};
pub use crate::report::BenchmarkReportBuilder;

use std::path::PathBuf;

/// Load the results named by `config`, render the chart and return its path.
/// Nothing is written unless the whole input is valid.
pub fn run(config: &Config) -> Result<PathBuf> {
    let mut builder = BenchmarkReportBuilder::new(config.baseline());
    builder.headline(config.headline());

    let payload = builder.build_from_path(config.input())?;
    info!(
        "plotting {} series: {}",
        payload.series.len(),
        payload
            .series
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // every artifact is rendered to a temporary file first and only moved
    // into place once all of them succeeded
    let output = Staged::new(config.output(&payload.parameters))?;
    let mut chart = SvgChart::new(output.path());
    chart.size(config.size());
    chart.render(&payload)?;

    let extra = match config.payload() {
        Some(path) => {
            let staged = Staged::new(path)?;
            PayloadWriter::new(staged.path()).render(&payload)?;
            Some(staged)
        }
        None => None,
    };

    let output = output.persist()?;
    if let Some(staged) = extra {
        staged.persist()?;
    }

    Ok(output)
}
