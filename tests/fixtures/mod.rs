//! Test fixtures for lookup integration tests
//!
//! - inventory/group_vars: base namespace (TOML + JSON, loaded in name order)
//! - inventory/host_vars: per-host context namespaces
//! - requests: request files, paths relative to the request

#![allow(dead_code)]

use std::path::{Path, PathBuf};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Base namespace directory
pub fn group_vars() -> PathBuf {
    fixtures().join("inventory/group_vars")
}

/// Context namespace for host `web1`
pub fn web1_host_vars() -> PathBuf {
    fixtures().join("inventory/host_vars/web1.toml")
}

/// Path to a request file by name
pub fn request(name: &str) -> PathBuf {
    fixtures().join("requests").join(name)
}
