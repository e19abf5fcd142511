// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn writes_the_final_frame() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("mandel.ppm");
    Command::cargo_bin("mandelview")
        .unwrap()
        .arg("-o")
        .arg(&output)
        .args(&["-s", "120x90", "-r", "60x40", "-r", "32x24"])
        .assert()
        .success();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"P6"), "not a binary pixmap");
    assert!(bytes.len() > 32 * 24 * 3);
    assert!(bytes.len() < 32 * 24 * 3 + 32);
}

#[test]
fn requires_an_output_file() {
    Command::cargo_bin("mandelview")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("output"));
}

#[test]
fn refuses_empty_windows() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("mandelview")
        .unwrap()
        .arg("-o")
        .arg(dir.path().join("never.ppm"))
        .args(&["-s", "0x10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("window size"));
}

#[test]
fn reports_unwritable_output() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("mandelview")
        .unwrap()
        .arg("-o")
        .arg(dir.path().join("missing").join("mandel.ppm"))
        .args(&["-s", "8x8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not write"));
}
