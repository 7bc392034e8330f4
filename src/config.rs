// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};
use crate::export::DEFAULT_HEADLINE;
use crate::plot::{default_output, DEFAULT_PREFIX, DEFAULT_SIZE};
use crate::record::ChartTitle;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use serde_derive::*;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_BASELINE: &str = "baseline";

fn default_baseline() -> String {
    DEFAULT_BASELINE.to_owned()
}

fn default_headline() -> String {
    DEFAULT_HEADLINE.to_owned()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_owned()
}

fn default_width() -> u32 {
    DEFAULT_SIZE.0
}

fn default_height() -> u32 {
    DEFAULT_SIZE.1
}

/// Contents of the optional TOML config file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    general: General,
    #[serde(default)]
    plot: Plot,
}

impl ConfigFile {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_baseline")]
    baseline: String,
    #[serde(default)]
    verbose: u64,
}

impl Default for General {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            verbose: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    #[serde(default = "default_headline")]
    headline: String,
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default)]
    output: Option<PathBuf>,
    #[serde(default)]
    payload: Option<PathBuf>,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            headline: default_headline(),
            prefix: default_prefix(),
            output: None,
            payload: None,
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Runtime configuration: the config file, if any, with command line
/// overrides applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    input: PathBuf,
    general: General,
    plot: Plot,
}

fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Plot benchmark results of several implementations against a baseline")
        .arg(
            Arg::with_name("input")
                .long("benchmarks-result-json")
                .alias("benchmarks_result_json")
                .value_name("FILE")
                .help("JSON benchmark results to plot")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("baseline")
                .long("baseline-name")
                .alias("baseline_name")
                .value_name("NAME")
                .help("Group used as the reference, it is not plotted [default: baseline]")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .help("Render the chart SVG to this file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("payload")
                .long("payload")
                .value_name("FILE")
                .help("Also write the chart series as JSON")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("headline")
                .long("headline")
                .value_name("TEXT")
                .help("First line of the chart title")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// Parse the process arguments. Exits with usage on invalid arguments.
    pub fn new() -> Result<Config> {
        Self::from_matches(&app().get_matches())
    }

    pub fn from_args<I, T>(args: I) -> Result<Config>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app()
            .get_matches_from_safe(args)
            .map_err(|e| Error::InvalidConfig(e.message))?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config> {
        let file = if let Some(path) = matches.value_of("config") {
            ConfigFile::load_from_file(path)?
        } else {
            ConfigFile::default()
        };

        let mut config = Config {
            // required by clap
            input: matches.value_of("input").map(PathBuf::from).unwrap_or_default(),
            general: file.general,
            plot: file.plot,
        };

        if let Some(baseline) = matches.value_of("baseline") {
            config.general.baseline = baseline.to_owned();
        }
        if let Some(output) = matches.value_of("output") {
            config.plot.output = Some(PathBuf::from(output));
        }
        if let Some(payload) = matches.value_of("payload") {
            config.plot.payload = Some(PathBuf::from(payload));
        }
        if let Some(headline) = matches.value_of("headline") {
            config.plot.headline = headline.to_owned();
        }
        config.general.verbose = config
            .general
            .verbose
            .max(matches.occurrences_of("verbose"));

        if config.plot.width == 0 || config.plot.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "chart size must be non-zero, got {}x{}",
                config.plot.width, config.plot.height
            )));
        }
        if config.general.baseline.is_empty() {
            return Err(Error::InvalidConfig("baseline name is empty".to_owned()));
        }

        Ok(config)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn baseline(&self) -> &str {
        &self.general.baseline
    }

    pub fn headline(&self) -> &str {
        &self.plot.headline
    }

    /// Explicit output path, or `<prefix>_<set_size>_<distribution_size>.svg`
    pub fn output(&self, title: &ChartTitle) -> PathBuf {
        match &self.plot.output {
            Some(output) => output.clone(),
            None => default_output(&self.plot.prefix, title),
        }
    }

    pub fn payload(&self) -> Option<&Path> {
        self.plot.payload.as_deref()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.plot.width, self.plot.height)
    }

    pub fn logging(&self) -> LevelFilter {
        match self.general.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn print(&self) {
        info!("input: {}", self.input.display());
        info!("baseline: {}", self.baseline());
        debug!("chart size: {}x{}", self.plot.width, self.plot.height);
        if let Some(payload) = self.payload() {
            debug!("payload: {}", payload.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_args(&["bench-plot", "--benchmarks-result-json", "out.json"]).unwrap();
        assert_eq!(config.input(), Path::new("out.json"));
        assert_eq!(config.baseline(), "baseline");
        assert_eq!(config.headline(), DEFAULT_HEADLINE);
        assert_eq!(config.payload(), None);
        assert_eq!(config.size(), (1280, 720));
        assert_eq!(config.logging(), LevelFilter::Info);
        assert_eq!(
            config.output(&ChartTitle {
                set_size: 100,
                distribution_size: 50
            }),
            PathBuf::from("flat_set_insert_100_50.svg")
        );
    }

    #[test]
    fn underscore_aliases() {
        let config = Config::from_args(&[
            "bench-plot",
            "--benchmarks_result_json",
            "out.json",
            "--baseline_name",
            "std",
        ])
        .unwrap();
        assert_eq!(config.input(), Path::new("out.json"));
        assert_eq!(config.baseline(), "std");
    }

    #[test]
    fn input_is_required() {
        let result = Config::from_args(&["bench-plot", "--baseline-name", "std"]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn verbosity() {
        let config =
            Config::from_args(&["bench-plot", "--benchmarks-result-json", "a", "-vv"]).unwrap();
        assert_eq!(config.logging(), LevelFilter::Trace);
        let config =
            Config::from_args(&["bench-plot", "--benchmarks-result-json", "a", "-v"]).unwrap();
        assert_eq!(config.logging(), LevelFilter::Debug);
    }

    #[test]
    fn parse_config_file() {
        let file = ConfigFile::parse(
            r#"
            [general]
            baseline = "std"
            verbose = 1

            [plot]
            headline = "Benchmarking nth_element"
            prefix = "nth_element"
            width = 800
            height = 600
            payload = "payload.json"
            "#,
        )
        .unwrap();
        assert_eq!(file.general.baseline, "std");
        assert_eq!(file.general.verbose, 1);
        assert_eq!(file.plot.headline, "Benchmarking nth_element");
        assert_eq!(file.plot.prefix, "nth_element");
        assert_eq!(file.plot.output, None);
        assert_eq!(file.plot.payload, Some(PathBuf::from("payload.json")));
        assert_eq!((file.plot.width, file.plot.height), (800, 600));
    }

    #[test]
    fn empty_config_file() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn unknown_config_key() {
        let result = ConfigFile::parse("[plot]\ncolour = \"red\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn command_line_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench-plot.toml");
        std::fs::write(
            &path,
            "[general]\nbaseline = \"std\"\n\n[plot]\noutput = \"file.svg\"\nheadline = \"from file\"\n",
        )
        .unwrap();

        let path = path.to_str().unwrap();
        let config = Config::from_args(&[
            "bench-plot",
            "--benchmarks-result-json",
            "a.json",
            "--config",
            path,
            "--output",
            "cli.svg",
        ])
        .unwrap();
        assert_eq!(config.baseline(), "std");
        assert_eq!(config.headline(), "from file");
        assert_eq!(
            config.output(&ChartTitle {
                set_size: 1,
                distribution_size: 1
            }),
            PathBuf::from("cli.svg")
        );
    }

    #[test]
    fn zero_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench-plot.toml");
        std::fs::write(&path, "[plot]\nwidth = 0\n").unwrap();

        let path = path.to_str().unwrap();
        let result = Config::from_args(&[
            "bench-plot",
            "--benchmarks-result-json",
            "a.json",
            "--config",
            path,
        ]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
