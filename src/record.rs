// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};

use regex::Regex;
use serde_derive::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// `<group>[_solution]/<input_size>`, split at the first slash.
const NAME_PATTERN: &str = r"^(.*?)(_solution)?/(.*)$";

/// The raw group token which is highlighted in the chart.
pub const PRIMARY_GROUP: &str = "proposed";

/// A benchmark results document, as written by the benchmark harness with
/// `--benchmark_format=json`. Everything besides `benchmarks` is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct BenchmarkFile {
    benchmarks: Vec<RawRecord>,
}

impl BenchmarkFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let file: BenchmarkFile = serde_json::from_reader(BufReader::new(file))?;
        debug!(
            "loaded {} benchmarks from {}",
            file.benchmarks.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn benchmarks(&self) -> &[RawRecord] {
        &self.benchmarks
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub real_time: f64,
    #[serde(default)]
    pub extra_data: Option<ChartTitle>,
}

/// Benchmark parameters shared by the whole run, reported through the
/// `extra_data` block of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChartTitle {
    pub set_size: u64,
    pub distribution_size: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedSample {
    pub group: String,
    pub input_size: u64,
    pub time: f64,
}

impl ParsedSample {
    pub fn label(&self) -> String {
        display_label(&self.group)
    }

    pub fn is_primary(&self) -> bool {
        is_primary(&self.group)
    }
}

pub fn is_primary(group: &str) -> bool {
    group == PRIMARY_GROUP
}

/// Human readable series name for a raw group token.
pub fn display_label(group: &str) -> String {
    if is_primary(group) {
        format!("{} solution", group)
    } else {
        group.replace('_', " ")
    }
}

/// Splits benchmark names into group and input size.
pub struct RecordParser {
    pattern: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(NAME_PATTERN).expect("benchmark name pattern is a valid regex"),
        }
    }

    pub fn parse(&self, record: &RawRecord) -> Result<ParsedSample> {
        let captures =
            self.pattern
                .captures(&record.name)
                .ok_or_else(|| Error::MalformedRecordName {
                    name: record.name.clone(),
                })?;

        // both groups always participate when the pattern matches
        let group = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let segment = captures.get(3).map(|m| m.as_str()).unwrap_or_default();

        let input_size = segment
            .parse::<u64>()
            .map_err(|source| Error::InvalidInputSize {
                name: record.name.clone(),
                segment: segment.to_owned(),
                source,
            })?;

        Ok(ParsedSample {
            group: group.to_owned(),
            input_size,
            time: record.real_time,
        })
    }
}
