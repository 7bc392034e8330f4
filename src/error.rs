// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal. The first one encountered aborts the run and no
/// partial output is produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed benchmark name: {name:?} (expected <group>[_solution]/<input_size>)")]
    MalformedRecordName { name: String },

    #[error("invalid input size {segment:?} in benchmark name {name:?}: {source}")]
    InvalidInputSize {
        name: String,
        segment: String,
        source: ParseIntError,
    },

    #[error("no baseline benchmark found (looking for group {baseline:?})")]
    MissingBaseline { baseline: String },

    #[error(
        "input size mismatch for group {group:?} at position {position}: baseline has {}, group has {}",
        display_size(.expected),
        display_size(.found)
    )]
    InputSizeMismatch {
        group: String,
        position: usize,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("no benchmark carried extra_data, cannot build the chart title")]
    MissingChartTitle,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse benchmark results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to render chart: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_size(size: &Option<u64>) -> String {
    match size {
        Some(size) => size.to_string(),
        None => "no sample".to_owned(),
    }
}
