// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::aggregate::{self, Aggregate};
use crate::config::DEFAULT_BASELINE;
use crate::error::Result;
use crate::export::{self, ChartPayload, DEFAULT_HEADLINE};
use crate::record::*;

use std::path::Path;

/// Carries everything one run needs from the raw records to the chart
/// payload. Build a new one per input document; nothing is retained between
/// runs.
pub struct BenchmarkReportBuilder {
    parser: RecordParser,
    baseline: String,
    headline: String,
}

impl Default for BenchmarkReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE)
    }
}

impl BenchmarkReportBuilder {
    pub fn new(baseline: impl AsRef<str>) -> Self {
        Self {
            parser: RecordParser::new(),
            baseline: baseline.as_ref().to_owned(),
            headline: DEFAULT_HEADLINE.to_owned(),
        }
    }

    pub fn headline(&mut self, headline: impl AsRef<str>) -> &mut Self {
        self.headline = headline.as_ref().to_owned();
        self
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn parse_record(&self, record: &RawRecord) -> Result<ParsedSample> {
        self.parser.parse(record)
    }

    pub fn aggregate(&self, records: &[RawRecord]) -> Result<Aggregate> {
        aggregate::aggregate(&self.parser, &self.baseline, records)
    }

    pub fn export(&self, aggregate: &Aggregate) -> ChartPayload {
        export::export(aggregate, &self.headline)
    }

    pub fn build(&self, file: &BenchmarkFile) -> Result<ChartPayload> {
        let aggregate = self.aggregate(file.benchmarks())?;
        Ok(self.export(&aggregate))
    }

    pub fn build_from_path(&self, path: impl AsRef<Path>) -> Result<ChartPayload> {
        let file = BenchmarkFile::load(path)?;
        self.build(&file)
    }
}
