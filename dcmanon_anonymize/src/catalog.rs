//! The tag catalog, which lists the tags assigned to each confidentiality
//! action category.

use serde::Deserialize;

use dcmanon_core::DcmanonError;

use crate::{ActionKind, TagSpecification};

/// The built-in catalog, based on the Basic Application Level Confidentiality
/// Profile.
///
/// Ref: PS3.15 E.1-1.
///
const BASIC_PROFILE_JSON: &str = include_str!("../data/basic_profile.json");

/// The action categories in a tag catalog. Categories are added to an action
/// table in the order they appear in [`Self::ALL`].
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionCategory {
  D,
  Z,
  X,
  U,
  ZD,
  XZ,
  XD,
  XZD,
  XZUStar,
}

impl ActionCategory {
  /// All action categories, in the order they are added to an action table.
  ///
  pub const ALL: [Self; 9] = [
    Self::D,
    Self::Z,
    Self::X,
    Self::U,
    Self::ZD,
    Self::XZ,
    Self::XD,
    Self::XZD,
    Self::XZUStar,
  ];

  /// Returns the key used for a category in catalog JSON.
  ///
  pub fn key(&self) -> &'static str {
    match self {
      Self::D => "D_TAGS",
      Self::Z => "Z_TAGS",
      Self::X => "X_TAGS",
      Self::U => "U_TAGS",
      Self::ZD => "Z_D_TAGS",
      Self::XZ => "X_Z_TAGS",
      Self::XD => "X_D_TAGS",
      Self::XZD => "X_Z_D_TAGS",
      Self::XZUStar => "X_Z_U_STAR_TAGS",
    }
  }

  /// Returns the action applied to the tags in a category.
  ///
  pub fn action_kind(&self) -> ActionKind {
    match self {
      Self::D => ActionKind::Replace,
      Self::Z => ActionKind::Empty,
      Self::X => ActionKind::Delete,
      Self::U => ActionKind::ReplaceUid,
      Self::ZD => ActionKind::EmptyOrReplace,
      Self::XZ => ActionKind::DeleteOrEmpty,
      Self::XD => ActionKind::DeleteOrReplace,
      Self::XZD => ActionKind::DeleteOrEmptyOrReplace,
      Self::XZUStar => ActionKind::DeleteOrEmptyOrReplaceUid,
    }
  }
}

/// A tag specification in a catalog along with its attribute name.
///
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
  pub name: String,
  pub specification: TagSpecification,
}

/// A tag catalog holding the list of tag specifications in each action
/// category.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagCatalog {
  categories: Vec<(ActionCategory, Vec<CatalogEntry>)>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
  #[serde(rename = "D_TAGS", default)]
  d: Vec<RawCatalogEntry>,
  #[serde(rename = "Z_TAGS", default)]
  z: Vec<RawCatalogEntry>,
  #[serde(rename = "X_TAGS", default)]
  x: Vec<RawCatalogEntry>,
  #[serde(rename = "U_TAGS", default)]
  u: Vec<RawCatalogEntry>,
  #[serde(rename = "Z_D_TAGS", default)]
  z_d: Vec<RawCatalogEntry>,
  #[serde(rename = "X_Z_TAGS", default)]
  x_z: Vec<RawCatalogEntry>,
  #[serde(rename = "X_D_TAGS", default)]
  x_d: Vec<RawCatalogEntry>,
  #[serde(rename = "X_Z_D_TAGS", default)]
  x_z_d: Vec<RawCatalogEntry>,
  #[serde(rename = "X_Z_U_STAR_TAGS", default)]
  x_z_u_star: Vec<RawCatalogEntry>,
}

#[derive(Deserialize)]
struct RawCatalogEntry {
  name: String,
  tag: (String, String),
}

impl TagCatalog {
  /// Parses a tag catalog from JSON of the form
  /// `{"D_TAGS": [{"name": "...", "tag": ["0008", "0050"]}], ...}`. Missing
  /// categories are treated as empty.
  ///
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let raw: RawCatalog =
      serde_json::from_str(json).map_err(|e| CatalogError::JsonInvalid {
        details: e.to_string(),
      })?;

    let raw_categories = [
      raw.d,
      raw.z,
      raw.x,
      raw.u,
      raw.z_d,
      raw.x_z,
      raw.x_d,
      raw.x_z_d,
      raw.x_z_u_star,
    ];

    let categories = ActionCategory::ALL
      .into_iter()
      .zip(raw_categories)
      .map(|(category, raw_entries)| {
        let entries = raw_entries
          .into_iter()
          .map(|entry| {
            TagSpecification::new(&entry.tag.0, &entry.tag.1)
              .map(|specification| CatalogEntry {
                name: entry.name.clone(),
                specification,
              })
              .map_err(|details| CatalogError::TagSpecificationInvalid {
                specification: format!("{}: {}", category.key(), entry.name),
                details,
              })
          })
          .collect::<Result<Vec<_>, _>>()?;

        Ok((category, entries))
      })
      .collect::<Result<Vec<_>, CatalogError>>()?;

    Ok(Self { categories })
  }

  /// Returns the built-in catalog for the Basic Application Level
  /// Confidentiality Profile.
  ///
  pub fn basic_profile() -> Result<Self, CatalogError> {
    Self::from_json(BASIC_PROFILE_JSON)
  }

  /// Returns the entries in a category.
  ///
  pub fn entries(&self, category: ActionCategory) -> &[CatalogEntry] {
    self
      .categories
      .iter()
      .find(|(c, _)| *c == category)
      .map(|(_, entries)| entries.as_slice())
      .unwrap_or_default()
  }

  /// Returns the total number of entries across all categories.
  ///
  pub fn len(&self) -> usize {
    self.categories.iter().map(|(_, entries)| entries.len()).sum()
  }

  /// Returns whether the catalog has no entries.
  ///
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// An error in a tag catalog or in action overrides.
///
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogError {
  /// The JSON is malformed or doesn't have the expected structure.
  JsonInvalid { details: String },

  /// A tag specification couldn't be parsed.
  TagSpecificationInvalid {
    specification: String,
    details: String,
  },

  /// An action couldn't be parsed.
  ActionInvalid { tag: String, details: String },
}

impl CatalogError {
  /// Returns the name of the error as a human-readable string.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::JsonInvalid { .. } => "Invalid JSON",
      Self::TagSpecificationInvalid { .. } => "Invalid tag specification",
      Self::ActionInvalid { .. } => "Invalid action",
    }
  }

  fn details(&self) -> String {
    match self {
      Self::JsonInvalid { details } => details.clone(),
      Self::TagSpecificationInvalid {
        specification,
        details,
      } => format!("{}: {}", specification, details),
      Self::ActionInvalid { tag, details } => format!("{}: {}", tag, details),
    }
  }
}

impl core::fmt::Display for CatalogError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(
      f,
      "Catalog error: {}, details: {}",
      self.name(),
      self.details()
    )
  }
}

impl std::error::Error for CatalogError {}

impl DcmanonError for CatalogError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Catalog error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self.name()),
      format!("  Details: {}", self.details()),
    ]
  }
}
