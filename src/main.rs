// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Headless driver: opens a pretend window at one size, resizes it as
//! many times as asked, waits for the frame that matches the final
//! size, then closes the window and saves what it showed.

extern crate crossbeam;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate mandelview;

use crossbeam::channel;
use failure::{Error, ResultExt};
use std::time::Instant;

use mandelview::config::{app, Config};
use mandelview::headless::{run_events, HeadlessSurface};
use mandelview::{RenderSettings, View, ViewEvent};

fn run(config: &Config) -> Result<(), Error> {
    let (events_tx, events_rx) = channel::unbounded();
    let mut view = View::new(HeadlessSurface::new(events_tx), RenderSettings::default());
    let started = Instant::now();

    let mut sizes = vec![config.size];
    sizes.extend_from_slice(&config.resizes);
    for (width, height) in sizes {
        view.dispatch(ViewEvent::Resize { width, height });
        view.dispatch(ViewEvent::Paint);
    }

    let target = config.final_size();
    let waited = run_events(&mut view, &events_rx, config.timeout, |view| {
        view.presented_size() == Some(target)
    });
    view.dispatch(ViewEvent::Destroy);
    waited?;

    info!(
        "{}x{} frame presented after {:?} ({} draws)",
        target.0,
        target.1,
        started.elapsed(),
        view.surface().draws()
    );

    view.surface()
        .write_pnm(&config.output)
        .with_context(|_| format!("Could not write {}", config.output.display()))?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = app().get_matches();
    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Argument failure: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("    caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
