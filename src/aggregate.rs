// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};
use crate::record::*;

/// All samples recorded for one group, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    group: String,
    samples: Vec<ParsedSample>,
}

impl Series {
    fn new(group: String) -> Self {
        Self {
            group,
            samples: Vec::new(),
        }
    }

    /// The raw group token, as it appears in the benchmark names
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn label(&self) -> String {
        display_label(&self.group)
    }

    pub fn is_primary(&self) -> bool {
        is_primary(&self.group)
    }

    pub fn samples(&self) -> &[ParsedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Groups keyed by name. Iteration follows the order in which each group was
/// first seen, so charts and tests are deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesCollection {
    series: Vec<Series>,
}

impl SeriesCollection {
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a sample to its group, creating the group at the end if it is
    /// new.
    pub fn push(&mut self, sample: ParsedSample) {
        let index = match self.position(&sample.group) {
            Some(index) => index,
            None => {
                self.series.push(Series::new(sample.group.clone()));
                self.series.len() - 1
            }
        };
        self.series[index].samples.push(sample);
    }

    pub fn get(&self, group: &str) -> Option<&Series> {
        self.position(group).map(|index| &self.series[index])
    }

    pub fn contains(&self, group: &str) -> bool {
        self.position(group).is_some()
    }

    /// Remove a group, keeping the relative order of the others.
    pub fn remove(&mut self, group: &str) -> Option<Series> {
        self.position(group).map(|index| self.series.remove(index))
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.group())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn position(&self, group: &str) -> Option<usize> {
        self.series.iter().position(|s| s.group == group)
    }
}

impl<'a> IntoIterator for &'a SeriesCollection {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The validated result of one input document. The baseline group has
/// already been removed from `series`.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    pub title: ChartTitle,
    pub series: SeriesCollection,
}

/// Walk `series` in lockstep with `baseline`, returning the per-sample time
/// delta against the baseline. Both must cover the same input sizes in the
/// same order.
pub fn compare(baseline: &Series, series: &Series) -> Result<Vec<f64>> {
    let mut deltas = Vec::with_capacity(series.len());
    let len = baseline.len().max(series.len());
    for position in 0..len {
        let expected = baseline.samples.get(position);
        let found = series.samples.get(position);
        match (expected, found) {
            (Some(expected), Some(found)) if expected.input_size == found.input_size => {
                deltas.push(found.time - expected.time);
            }
            _ => {
                return Err(Error::InputSizeMismatch {
                    group: series.group.clone(),
                    position,
                    expected: expected.map(|s| s.input_size),
                    found: found.map(|s| s.input_size),
                });
            }
        }
    }
    Ok(deltas)
}

/// Group the records, capture the chart title, check every group against the
/// baseline and drop the baseline from the result.
pub fn aggregate(parser: &RecordParser, baseline: &str, records: &[RawRecord]) -> Result<Aggregate> {
    let mut title = None;
    let mut series = SeriesCollection::new();

    for record in records {
        let sample = parser.parse(record)?;
        if title.is_none() {
            title = record.extra_data;
        }
        series.push(sample);
    }

    debug!(
        "grouped {} records into {} groups: {}",
        records.len(),
        series.len(),
        series.groups().collect::<Vec<_>>().join(", ")
    );

    let reference = series.remove(baseline).ok_or_else(|| Error::MissingBaseline {
        baseline: baseline.to_owned(),
    })?;

    for s in &series {
        let deltas = compare(&reference, s)?;
        trace!("{} delta against {}: {:?}", s.group(), baseline, deltas);
    }

    let title = title.ok_or(Error::MissingChartTitle)?;

    Ok(Aggregate { title, series })
}
