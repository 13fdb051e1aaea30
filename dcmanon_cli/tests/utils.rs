use std::path::{Path, PathBuf};

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn dcmanon() -> Command {
  let mut cmd = cargo_bin_cmd!("dcmanon");
  cmd.env_remove("RUST_LOG");
  cmd
}

#[allow(dead_code)]
pub fn asset(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("assets")
    .join(name)
}

#[allow(dead_code)]
pub fn create_temp_dir() -> TempDir {
  TempDir::new().unwrap()
}

/// Copies assets into a directory under new names.
///
#[allow(dead_code)]
pub fn copy_assets(dir: &Path, assets: &[(&str, &str)]) {
  for (name, new_name) in assets {
    let path = dir.join(new_name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::copy(asset(name), path).unwrap();
  }
}

#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// Returns the first value of a data element in DICOM JSON, or `None` if it
/// has no value.
///
#[allow(dead_code)]
pub fn first_value<'a>(
  json: &'a serde_json::Value,
  tag: &str,
) -> Option<&'a serde_json::Value> {
  json[tag].get("Value").and_then(|value| value.get(0))
}
