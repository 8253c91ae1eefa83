#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use db_infra::{ProvisionRequest, RootConfig};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

pub fn root_config() -> RootConfig {
    RootConfig::from_vars([
        ("ROOT_NAME", "root"),
        ("ROOT_PASSWORD", "root-password"),
        ("PORT", "27017"),
    ])
    .expect("valid root configuration")
}

/// Write a root configuration file into `dir` and return its path.
pub fn write_root_config(dir: &Path) -> PathBuf {
    let path = dir.join("root.env");
    let mut file = std::fs::File::create(&path).expect("create root config");
    file.write_all(b"ROOT_NAME=root\nROOT_PASSWORD=root-password\nPORT=27017\n")
        .expect("write root config");
    path
}

pub fn request(project: &str, force: bool, config_path: PathBuf, output_dir: &Path) -> ProvisionRequest {
    ProvisionRequest {
        project_name: project.to_string(),
        force,
        config_path,
        output_dir: output_dir.to_path_buf(),
    }
}

/// Parse a `KEY=value` credential file into pairs.
pub fn read_env_file(path: &Path) -> Vec<(String, String)> {
    std::fs::read_to_string(path)
        .expect("read env file")
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn env_value(pairs: &[(String, String)], key: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| panic!("{key} missing from env file"))
}
