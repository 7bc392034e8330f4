// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

#[macro_use]
extern crate bench_plot;

use bench_plot::{Config, Logger};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    Logger::new()
        .label("bench_plot")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    info!("bench-plot {} initializing...", VERSION);
    config.print();

    match bench_plot::run(&config) {
        Ok(output) => println!("{}", output.display()),
        Err(e) => fatal!("{}", e),
    }
}
