use std::path::{Path, PathBuf};

use rand::Rng;

/// Creates a Rayon thread pool with the specified number of threads.
///
pub fn create_thread_pool(threads: usize) -> Result<rayon::ThreadPool, ()> {
  rayon::ThreadPoolBuilder::new()
    .num_threads(threads)
    .build()
    .map_err(|e| {
      eprintln!("Error: Failed creating thread pool, details: {}", e);
    })
}

/// Returns the path of a temporary file alongside the given output file. A
/// random suffix makes the name unique.
///
pub fn temp_filename(output_filename: &Path) -> PathBuf {
  let random_suffix: String = rand::thread_rng()
    .sample_iter(rand::distributions::Alphanumeric)
    .take(16)
    .map(char::from)
    .collect();

  let file_name = output_filename
    .file_name()
    .unwrap_or(std::ffi::OsStr::new(""))
    .to_string_lossy();

  output_filename.with_file_name(format!("{}.{}.tmp", file_name, random_suffix))
}

/// Renames a temporary file to an output filename when [`Self::commit()`] is
/// called, otherwise deletes the temporary file on drop.
///
pub struct TempFileRenamer {
  temp_filename: PathBuf,
  output_filename: PathBuf,
  committed: bool,
}

impl TempFileRenamer {
  pub fn new(temp_filename: PathBuf, output_filename: PathBuf) -> Self {
    Self {
      temp_filename,
      output_filename,
      committed: false,
    }
  }

  pub fn commit(&mut self) -> Result<(), (String, String)> {
    self.committed = true;

    std::fs::rename(&self.temp_filename, &self.output_filename).map_err(|e| {
      let _ = std::fs::remove_file(&self.temp_filename);

      (
        format!(
          "Renaming '{}' to '{}'",
          self.temp_filename.display(),
          self.output_filename.display()
        ),
        e.to_string(),
      )
    })
  }
}

impl Drop for TempFileRenamer {
  fn drop(&mut self) {
    if !self.committed {
      let _ = std::fs::remove_file(&self.temp_filename);
    }
  }
}
