//! Caller-supplied action overrides that are merged into an action table
//! after the catalog.

use serde::Deserialize;

use crate::{Action, ActionKind, CatalogError, TagPattern, TagSpecification};

/// An ordered list of action overrides. Overrides are applied after all
/// catalog categories, so they win over any catalog entry for the same tag
/// pattern. Within the list, later overrides win over earlier ones.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionOverrides {
  entries: Vec<(TagPattern, Action)>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOverride {
  Name(String),
  Detailed(RawDetailedOverride),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDetailedOverride {
  action: String,
  value: Option<String>,
}

impl ActionOverrides {
  /// Creates a new empty set of overrides.
  ///
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an override for a tag pattern.
  ///
  pub fn insert(&mut self, pattern: impl Into<TagPattern>, action: Action) {
    self.entries.push((pattern.into(), action));
  }

  /// Adds an override for every tag pattern a tag specification expands to,
  /// e.g. `"0010,0010"` or `"60xx,3000"`.
  ///
  pub fn insert_specification(
    &mut self,
    specification: &str,
    action: Action,
  ) -> Result<(), CatalogError> {
    let patterns = parse_specification(specification)?;

    for pattern in patterns {
      self.insert(pattern, action.clone());
    }

    Ok(())
  }

  /// Parses overrides from a JSON object whose keys are tag specifications
  /// and whose values are either an action name, or an object of the form
  /// `{"action": "replace", "value": "REDACTED"}`.
  ///
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let raw: serde_json::Map<String, serde_json::Value> =
      serde_json::from_str(json).map_err(|e| CatalogError::JsonInvalid {
        details: e.to_string(),
      })?;

    let mut overrides = Self::new();

    for (specification, value) in raw {
      let raw_override: RawOverride =
        serde_json::from_value(value).map_err(|e| {
          CatalogError::ActionInvalid {
            tag: specification.clone(),
            details: e.to_string(),
          }
        })?;

      let action = parse_action(&specification, raw_override)?;

      overrides.insert_specification(&specification, action)?;
    }

    Ok(overrides)
  }

  /// Returns the number of overrides.
  ///
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns whether there are no overrides.
  ///
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterates over the overrides in the order they were added.
  ///
  pub fn iter(&self) -> impl Iterator<Item = &(TagPattern, Action)> {
    self.entries.iter()
  }
}

fn parse_specification(
  specification: &str,
) -> Result<Vec<TagPattern>, CatalogError> {
  let parsed = specification
    .parse::<TagSpecification>()
    .map_err(|details| CatalogError::TagSpecificationInvalid {
      specification: specification.to_string(),
      details,
    })?;

  if parsed == TagSpecification::PrivateAttributes {
    return Err(CatalogError::TagSpecificationInvalid {
      specification: specification.to_string(),
      details: "Private attributes can't be overridden".to_string(),
    });
  }

  Ok(parsed.expand())
}

fn parse_action(
  specification: &str,
  raw_override: RawOverride,
) -> Result<Action, CatalogError> {
  let action_error = |details: String| CatalogError::ActionInvalid {
    tag: specification.to_string(),
    details,
  };

  match raw_override {
    RawOverride::Name(name) => {
      name.parse::<ActionKind>().map(Action::from).map_err(action_error)
    }

    RawOverride::Detailed(RawDetailedOverride { action, value }) => {
      let kind = action.parse::<ActionKind>().map_err(action_error)?;

      match (kind, value) {
        (_, None) => Ok(Action::from(kind)),
        (ActionKind::Replace, Some(value)) => Ok(Action::ReplaceWith(value)),
        (kind, Some(_)) => Err(action_error(format!(
          "A value can only be given for the replace action, not '{}'",
          kind
        ))),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmanon_core::DataElementTag;

  use crate::ActionTable;

  #[test]
  fn from_json_test() {
    let overrides = ActionOverrides::from_json(
      r#"{
        "0010,0010": "keep",
        "(0008,0050)": {"action": "replace", "value": "REDACTED"},
        "00100020": {"action": "delete"}
      }"#,
    )
    .unwrap();

    let entries: Vec<_> = overrides.iter().cloned().collect();

    assert_eq!(
      entries,
      vec![
        (
          TagPattern::Exact(DataElementTag::new(0x0010, 0x0010)),
          Action::Builtin(ActionKind::Keep)
        ),
        (
          TagPattern::Exact(DataElementTag::new(0x0008, 0x0050)),
          Action::ReplaceWith("REDACTED".to_string())
        ),
        (
          TagPattern::Exact(DataElementTag::new(0x0010, 0x0020)),
          Action::Builtin(ActionKind::Delete)
        ),
      ]
    );
  }

  #[test]
  fn from_json_keeps_file_order_test() {
    let overrides = ActionOverrides::from_json(
      r#"{"0010,00xx": "keep", "0010,0010": "delete"}"#,
    )
    .unwrap();

    let mut table = ActionTable::new();
    table.merge(&overrides);

    assert_eq!(
      table.get(&TagPattern::Exact(DataElementTag::new(0x0010, 0x0010))),
      Some(&Action::Builtin(ActionKind::Delete))
    );
    assert_eq!(
      table.get(&TagPattern::Exact(DataElementTag::new(0x0010, 0x0020))),
      Some(&Action::Builtin(ActionKind::Keep))
    );
  }

  #[test]
  fn wildcard_specification_test() {
    let mut overrides = ActionOverrides::new();
    overrides
      .insert_specification("0028,30xx", ActionKind::Keep.into())
      .unwrap();

    assert_eq!(overrides.len(), 256);
  }

  #[test]
  fn from_json_error_test() {
    assert!(matches!(
      ActionOverrides::from_json("[]"),
      Err(CatalogError::JsonInvalid { .. })
    ));

    assert_eq!(
      ActionOverrides::from_json(r#"{"0010,0010": "remove"}"#),
      Err(CatalogError::ActionInvalid {
        tag: "0010,0010".to_string(),
        details: "Unknown action: \"remove\"".to_string(),
      })
    );

    assert!(matches!(
      ActionOverrides::from_json(
        r#"{"0010,0010": {"action": "empty", "value": "x"}}"#
      ),
      Err(CatalogError::ActionInvalid { .. })
    ));

    assert!(matches!(
      ActionOverrides::from_json(r#"{"0010": "keep"}"#),
      Err(CatalogError::TagSpecificationInvalid { .. })
    ));

    assert!(matches!(
      ActionOverrides::from_json(r#"{"gggg,eeee": "keep"}"#),
      Err(CatalogError::TagSpecificationInvalid { .. })
    ));
  }
}
