// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::aggregate::*;
use crate::record::ChartTitle;

use serde_derive::*;

pub const DEFAULT_HEADLINE: &str = "Benchmarking flat_set<int>::insert(first, last)";
pub const X_DESC: &str = "distance between range endpoints";
pub const Y_DESC: &str = "time, nanoseconds";

/// One line of the chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub label: String,
    pub x: Vec<u64>,
    pub y: Vec<f64>,
    pub emphasis: bool,
}

/// Everything a chart sink needs to draw the comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPayload {
    pub headline: String,
    pub subtitle: String,
    pub x_desc: String,
    pub y_desc: String,
    pub parameters: ChartTitle,
    pub series: Vec<SeriesDescriptor>,
}

impl ChartPayload {
    /// Full two line title, headline first.
    pub fn title(&self) -> String {
        if self.headline.is_empty() {
            self.subtitle.clone()
        } else {
            format!("{}\n{}", self.headline, self.subtitle)
        }
    }

    /// Range covered by the input sizes of all series.
    pub fn x_range(&self) -> Option<(u64, u64)> {
        let mut values = self.series.iter().flat_map(|s| s.x.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(min, max), x| (min.min(x), max.max(x))))
    }

    /// Largest time of all series.
    pub fn y_max(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.y.iter().copied())
            .fold(None, |max: Option<f64>, y| Some(max.map_or(y, |m| m.max(y))))
    }
}

pub fn subtitle(title: &ChartTitle) -> String {
    format!(
        "set size : {} value distribution(1..{})",
        title.set_size, title.distribution_size
    )
}

/// Shape the aggregated groups into plottable series.
pub fn export(aggregate: &Aggregate, headline: &str) -> ChartPayload {
    let series = aggregate
        .series
        .iter()
        .map(|s| SeriesDescriptor {
            label: s.label(),
            x: s.samples().iter().map(|sample| sample.input_size).collect(),
            y: s.samples().iter().map(|sample| sample.time).collect(),
            emphasis: s.is_primary(),
        })
        .collect();

    ChartPayload {
        headline: headline.to_owned(),
        subtitle: subtitle(&aggregate.title),
        x_desc: X_DESC.to_owned(),
        y_desc: Y_DESC.to_owned(),
        parameters: aggregate.title,
        series,
    }
}
