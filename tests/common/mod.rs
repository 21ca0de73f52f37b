//! Shared helpers for driving the executables against stand-in tools.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake tool");
    path
}

/// Script body that records its arguments one per line into `record`.
pub fn record_args(record: &Path) -> String {
    format!("printf '%s\\n' \"$@\" > '{}'", record.display())
}

/// Reads a file written by [`record_args`].
pub fn recorded_args(record: &Path) -> Vec<String> {
    std::fs::read_to_string(record)
        .expect("read recorded args")
        .lines()
        .map(str::to_string)
        .collect()
}
