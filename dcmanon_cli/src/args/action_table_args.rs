use std::path::{Path, PathBuf};

use clap::Args;

use dcmanon_anonymize::{ActionOverrides, ActionTable, TagCatalog};
use dcmanon_core::DcmanonError;

#[derive(Args, Debug)]
pub struct ActionTableArgs {
  #[arg(
    long,
    help_heading = "Actions",
    help = "A JSON file containing the tag catalog to use. The catalog assigns \
      tags to the confidentiality profile action categories D_TAGS, Z_TAGS, \
      X_TAGS, U_TAGS, Z_D_TAGS, X_Z_TAGS, X_D_TAGS, X_Z_D_TAGS, and \
      X_Z_U_STAR_TAGS.\n\
      \n\
      By default the built-in catalog for the Basic Application Level \
      Confidentiality Profile is used."
  )]
  catalog: Option<PathBuf>,

  #[arg(
    long,
    help_heading = "Actions",
    help = "A JSON file containing action overrides. Keys are tags such as \
      \"0010,0010\", and values are either an action name such as \"keep\", or \
      an object such as {\"action\": \"replace\", \"value\": \"REDACTED\"}. \
      Overrides take precedence over the catalog."
  )]
  actions: Option<PathBuf>,
}

impl ActionTableArgs {
  /// Builds the action table from the catalog and overrides. Errors are
  /// printed to stderr.
  ///
  pub fn action_table(&self) -> Result<ActionTable, ()> {
    let catalog = match &self.catalog {
      Some(path) => TagCatalog::from_json(&read_file(path)?)
        .map_err(|e| e.print(&format!("loading \"{}\"", path.display())))?,
      None => TagCatalog::basic_profile()
        .map_err(|e| e.print("loading the built-in catalog"))?,
    };

    let mut action_table = ActionTable::from_catalog(&catalog);

    if let Some(path) = &self.actions {
      let overrides = ActionOverrides::from_json(&read_file(path)?)
        .map_err(|e| e.print(&format!("loading \"{}\"", path.display())))?;

      action_table.merge(&overrides);
    }

    Ok(action_table)
  }
}

fn read_file(path: &Path) -> Result<String, ()> {
  std::fs::read_to_string(path).map_err(|e| {
    eprintln!(
      "Error: Failed reading file '{}', details: {}",
      path.display(),
      e
    );
  })
}
