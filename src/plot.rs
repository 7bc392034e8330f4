// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};
use crate::export::ChartPayload;
use crate::record::ChartTitle;

use plotters::prelude::*;
use tempfile::NamedTempFile;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "flat_set_insert";
pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0xAA0000),
    hexcolour!(0x0000FF),
    hexcolour!(0x888888),
    hexcolour!(0xDDCC77),
    hexcolour!(0x999933),
    hexcolour!(0x332288),
    hexcolour!(0x117733),
    hexcolour!(0x88CCEE),
    hexcolour!(0x882255),
    hexcolour!(0x44AA99),
    hexcolour!(0xAA4499),
    hexcolour!(0xCC6677),
];

/// Receives the finished chart payload. This is the only place where output
/// is produced.
pub trait ChartSink {
    fn render(&mut self, payload: &ChartPayload) -> Result<()>;
}

/// `<prefix>_<set_size>_<distribution_size>.svg`
pub fn default_output(prefix: &str, title: &ChartTitle) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}_{}.svg",
        prefix, title.set_size, title.distribution_size
    ))
}

fn render_error<E: Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

// A single distinct x value still needs a non-empty axis.
fn x_axis(range: Option<(u64, u64)>) -> (u64, u64) {
    match range {
        Some((min, max)) if min < max => (min, max),
        Some((min, _)) => match min.checked_add(1) {
            Some(next) => (min, next),
            None => (min - 1, min),
        },
        None => (0, 1),
    }
}

/// A temporary file next to its final destination. Sinks render into
/// `path()`, and nothing appears at the destination until `persist`.
pub struct Staged {
    file: NamedTempFile,
    target: PathBuf,
}

impl Staged {
    pub fn new(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_owned();
        let dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir).map_err(|e| Error::io(&target, e))?;
        Ok(Self { file, target })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn persist(self) -> Result<PathBuf> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| Error::io(&target, e.error))?;
        debug!("persisted {}", target.display());
        Ok(target)
    }
}

/// Line chart rendered to an SVG file.
pub struct SvgChart {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgChart {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for SvgChart {
    fn render(&mut self, payload: &ChartPayload) -> Result<()> {
        let (x_min, x_max) = x_axis(payload.x_range());
        let y_max = match payload.y_max() {
            Some(max) if max > 0.0 => max * 1.1,
            _ => 1.0,
        };

        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let area = if payload.headline.is_empty() {
            root.clone()
        } else {
            root.titled(&payload.headline, ("sans-serif", 28).into_font())
                .map_err(render_error)?
        };

        let mut chart = ChartBuilder::on(&area)
            .caption(&payload.subtitle, ("sans-serif", 20).into_font())
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 100)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(&payload.x_desc)
            .y_desc(&payload.y_desc)
            .draw()
            .map_err(render_error)?;

        for (i, series) in payload.series.iter().enumerate() {
            let width = if series.emphasis { 2 } else { 1 };
            let colour = COLOURS[i % COLOURS.len()];
            let points = series.x.iter().copied().zip(series.y.iter().copied());

            chart
                .draw_series(LineSeries::new(points, colour.stroke_width(width)))
                .map_err(render_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(width))
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;

        info!(
            "rendered {} series to {}",
            payload.series.len(),
            self.path.display()
        );

        Ok(())
    }
}

/// Writes the payload as JSON, for renderers outside of this tool.
pub struct PayloadWriter {
    path: PathBuf,
}

impl PayloadWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl ChartSink for PayloadWriter {
    fn render(&mut self, payload: &ChartPayload) -> Result<()> {
        let file = File::create(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, payload)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(&self.path, e))?;

        info!("wrote chart payload to {}", self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{SeriesDescriptor, DEFAULT_HEADLINE, X_DESC, Y_DESC};

    fn payload(series: Vec<SeriesDescriptor>) -> ChartPayload {
        let parameters = ChartTitle {
            set_size: 100,
            distribution_size: 50,
        };
        ChartPayload {
            headline: DEFAULT_HEADLINE.to_owned(),
            subtitle: crate::export::subtitle(&parameters),
            x_desc: X_DESC.to_owned(),
            y_desc: Y_DESC.to_owned(),
            parameters,
            series,
        }
    }

    fn descriptor(label: &str, emphasis: bool) -> SeriesDescriptor {
        SeriesDescriptor {
            label: label.to_owned(),
            x: vec![10, 20, 40],
            y: vec![3.0, 5.0, 11.0],
            emphasis,
        }
    }

    #[test]
    fn default_output_name() {
        let title = ChartTitle {
            set_size: 1000,
            distribution_size: 64,
        };
        assert_eq!(
            default_output(DEFAULT_PREFIX, &title),
            PathBuf::from("flat_set_insert_1000_64.svg")
        );
    }

    #[test]
    fn svg_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        let mut chart = SvgChart::new(&path);
        chart.size((640, 480));
        chart
            .render(&payload(vec![
                descriptor("proposed solution", true),
                descriptor("std lower bound", false),
            ]))
            .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("proposed solution"));
        assert!(svg.contains("std lower bound"));
    }

    #[test]
    fn svg_chart_without_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");

        SvgChart::new(&path).render(&payload(Vec::new())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn svg_chart_single_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.svg");

        let series = SeriesDescriptor {
            label: "proposed solution".to_owned(),
            x: vec![10],
            y: vec![3.0],
            emphasis: true,
        };
        SvgChart::new(&path).render(&payload(vec![series])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn x_axis_bounds() {
        assert_eq!(x_axis(None), (0, 1));
        assert_eq!(x_axis(Some((8, 40))), (8, 40));
        assert_eq!(x_axis(Some((10, 10))), (10, 11));
        assert_eq!(x_axis(Some((u64::MAX, u64::MAX))), (u64::MAX - 1, u64::MAX));
    }

    #[test]
    fn staged_until_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("chart.svg");

        let staged = Staged::new(&target).unwrap();
        assert_eq!(staged.target(), target.as_path());
        SvgChart::new(staged.path())
            .render(&payload(vec![descriptor("proposed solution", true)]))
            .unwrap();
        assert!(!target.exists());

        assert_eq!(staged.persist().unwrap(), target);
        let svg = std::fs::read_to_string(&target).unwrap();
        assert!(svg.contains("proposed solution"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn staged_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("payload.json");

        let staged = Staged::new(&target).unwrap();
        PayloadWriter::new(staged.path())
            .render(&payload(Vec::new()))
            .unwrap();
        drop(staged);

        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn staged_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("chart.svg");
        assert!(matches!(Staged::new(&target), Err(Error::Io { .. })));
    }

    #[test]
    fn payload_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");

        PayloadWriter::new(&path)
            .render(&payload(vec![descriptor("proposed solution", true)]))
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["series"][0]["x"], serde_json::json!([10, 20, 40]));
        assert_eq!(json["series"][0]["emphasis"], true);
        assert_eq!(json["x_desc"], X_DESC);
    }

    #[test]
    fn payload_writer_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("payload.json");

        let result = PayloadWriter::new(&path).render(&payload(Vec::new()));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
