// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command line handling for the headless driver.

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Name of the output file argument.
pub const OUTPUT: &str = "output";
/// Name of the initial window size argument.
pub const SIZE: &str = "size";
/// Name of the repeatable resize argument.
pub const RESIZE: &str = "resize";
/// Name of the timeout argument.
pub const TIMEOUT: &str = "timeout";

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A `WIDTHxHEIGHT` window size; both must be at least one pixel.
pub fn parse_size(s: &str) -> Option<(usize, usize)> {
    match parse_pair::<u16>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Some((usize::from(w), usize::from(h))),
        _ => None,
    }
}

fn validate_size(s: String) -> Result<(), String> {
    match parse_size(&s) {
        Some(_) => Ok(()),
        None => Err(format!("Could not parse window size '{}'", s)),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

/// The argument parser.
pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("mandelview")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders the Mandelbrot set into a headless window, resizing it as asked")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PPM) for the last presented frame"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(validate_size)
                .help("Initial window size"),
        )
        .arg(
            Arg::with_name(RESIZE)
                .required(false)
                .long(RESIZE)
                .short("r")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(validate_size)
                .help("Resize the window after opening it; may be repeated"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .required(false)
                .long(TIMEOUT)
                .short("t")
                .takes_value(true)
                .default_value("30000")
                .validator(|s| {
                    validate_range::<u64>(
                        &s,
                        1,
                        3_600_000,
                        "Could not parse timeout",
                        "Timeout must be between 1 and 3600000 milliseconds",
                    )
                })
                .help("Milliseconds to wait for the final frame"),
        )
}

/// Everything the driver needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where to write the last presented frame.
    pub output: PathBuf,
    /// The window size at creation.
    pub size: (usize, usize),
    /// Resizes delivered after creation, in order.
    pub resizes: Vec<(usize, usize)>,
    /// How long to wait for the final frame.
    pub timeout: Duration,
}

impl Config {
    /// Build a config from parsed arguments.
    pub fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let output = matches
            .value_of(OUTPUT)
            .ok_or_else(|| format_err!("No output file given"))?;
        let size = matches
            .value_of(SIZE)
            .and_then(parse_size)
            .ok_or_else(|| format_err!("Error parsing window size"))?;
        let resizes = match matches.values_of(RESIZE) {
            None => vec![],
            Some(values) => values
                .map(|s| parse_size(s).ok_or_else(|| format_err!("Error parsing resize '{}'", s)))
                .collect::<Result<Vec<_>, Error>>()?,
        };
        let timeout = matches
            .value_of(TIMEOUT)
            .and_then(|s| u64::from_str(s).ok())
            .ok_or_else(|| format_err!("Error parsing timeout"))?;

        Ok(Config {
            output: PathBuf::from(output),
            size,
            resizes,
            timeout: Duration::from_millis(timeout),
        })
    }

    /// The size the window ends up at once every resize is delivered.
    pub fn final_size(&self) -> (usize, usize) {
        *self.resizes.last().unwrap_or(&self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config, Error> {
        let mut argv = vec!["mandelview"];
        argv.extend_from_slice(args);
        let matches = app().get_matches_from_safe(argv)?;
        Config::from_matches(&matches)
    }

    #[test]
    fn pairs() {
        assert_eq!(parse_pair::<i32>("10x20", 'x'), Some((10, 20)));
        assert_eq!(parse_pair::<f64>("-1.5,0.25", ','), Some((-1.5, 0.25)));
        assert_eq!(parse_pair::<i32>("10x", 'x'), None);
        assert_eq!(parse_pair::<i32>("10,20", 'x'), None);
    }

    #[test]
    fn sizes_must_have_area() {
        assert_eq!(parse_size("640x480"), Some((640, 480)));
        assert_eq!(parse_size("0x480"), None);
        assert_eq!(parse_size("640x0"), None);
        assert_eq!(parse_size("-1x480"), None);
        assert_eq!(parse_size("99999x480"), None);
    }

    #[test]
    fn defaults() {
        let config = config(&["-o", "out.ppm"]).unwrap();
        assert_eq!(config.output, PathBuf::from("out.ppm"));
        assert_eq!(config.size, (800, 600));
        assert!(config.resizes.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.final_size(), (800, 600));
    }

    #[test]
    fn repeated_resizes_keep_their_order() {
        let config = config(&["-o", "x.ppm", "-s", "100x100", "-r", "50x50", "-r", "20x10"]).unwrap();
        assert_eq!(config.resizes, vec![(50, 50), (20, 10)]);
        assert_eq!(config.final_size(), (20, 10));
    }

    #[test]
    fn bad_arguments_are_refused() {
        assert!(config(&[]).is_err());
        assert!(config(&["-o", "x.ppm", "-s", "0x10"]).is_err());
        assert!(config(&["-o", "x.ppm", "-t", "0"]).is_err());
        assert!(config(&["-o", "x.ppm", "-r", "nope"]).is_err());
    }
}
