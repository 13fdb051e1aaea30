//! Actions that can be assigned to tags in an action table.

use std::sync::Arc;

use dcmanon_core::{DataElementTag, DataSet, DataSetPath};

use crate::{AnonymizeError, UidResolver, actions};

/// The signature shared by all action functions. An action function is given
/// the data set that owns the data element and the data element's tag, and
/// does nothing if the data element isn't present.
///
pub type ActionFn = fn(
  &mut DataSet,
  DataElementTag,
  &mut ActionContext,
) -> Result<(), AnonymizeError>;

/// The confidentiality profile actions.
///
/// Ref: PS3.15 E.1.1.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
  /// K: keep the data element unchanged.
  Keep,

  /// X: remove the data element.
  Delete,

  /// Z: replace with a zero length or neutral value.
  Empty,

  /// D: replace with a non-zero length dummy value.
  Replace,

  /// U: replace with a UID that is internally consistent across records.
  ReplaceUid,

  /// Z/D. Resolves to [`Self::Replace`].
  EmptyOrReplace,

  /// X/Z. Resolves to [`Self::Empty`].
  DeleteOrEmpty,

  /// X/D. Resolves to [`Self::Replace`].
  DeleteOrReplace,

  /// X/Z/D. Resolves to [`Self::Replace`].
  DeleteOrEmptyOrReplace,

  /// X/Z/U*. UIDs are replaced and all other values are emptied.
  DeleteOrEmptyOrReplaceUid,

  /// C: replace with values of similar meaning. Not implemented.
  Clean,
}

impl ActionKind {
  /// All action kinds.
  ///
  pub const ALL: [Self; 11] = [
    Self::Keep,
    Self::Delete,
    Self::Empty,
    Self::Replace,
    Self::ReplaceUid,
    Self::EmptyOrReplace,
    Self::DeleteOrEmpty,
    Self::DeleteOrReplace,
    Self::DeleteOrEmptyOrReplace,
    Self::DeleteOrEmptyOrReplaceUid,
    Self::Clean,
  ];

  /// Returns the name of an action kind as used in action override files.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::Keep => "keep",
      Self::Delete => "delete",
      Self::Empty => "empty",
      Self::Replace => "replace",
      Self::ReplaceUid => "replace_UID",
      Self::EmptyOrReplace => "empty_or_replace",
      Self::DeleteOrEmpty => "delete_or_empty",
      Self::DeleteOrReplace => "delete_or_replace",
      Self::DeleteOrEmptyOrReplace => "delete_or_empty_or_replace",
      Self::DeleteOrEmptyOrReplaceUid => "delete_or_empty_or_replace_UID",
      Self::Clean => "clean",
    }
  }

  /// Returns the action code used for an action kind by the confidentiality
  /// profiles.
  ///
  pub fn code(&self) -> &'static str {
    match self {
      Self::Keep => "K",
      Self::Delete => "X",
      Self::Empty => "Z",
      Self::Replace => "D",
      Self::ReplaceUid => "U",
      Self::EmptyOrReplace => "Z/D",
      Self::DeleteOrEmpty => "X/Z",
      Self::DeleteOrReplace => "X/D",
      Self::DeleteOrEmptyOrReplace => "X/Z/D",
      Self::DeleteOrEmptyOrReplaceUid => "X/Z/U*",
      Self::Clean => "C",
    }
  }

  /// Returns the function that implements an action kind. Conditional kinds
  /// resolve to the single behavior used for them.
  ///
  pub fn function(&self) -> ActionFn {
    match self {
      Self::Keep => actions::keep,
      Self::Delete => actions::delete,
      Self::Empty | Self::DeleteOrEmpty => actions::empty,
      Self::Replace
      | Self::EmptyOrReplace
      | Self::DeleteOrReplace
      | Self::DeleteOrEmptyOrReplace => actions::replace,
      Self::ReplaceUid => actions::replace_uid,
      Self::DeleteOrEmptyOrReplaceUid => actions::replace_uid_or_empty,
      Self::Clean => actions::clean,
    }
  }
}

impl core::str::FromStr for ActionKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|kind| kind.name() == s)
      .ok_or_else(|| format!("Unknown action: {:?}", s))
  }
}

impl core::fmt::Display for ActionKind {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// State available to actions while they run: the UID resolver, and the
/// location of the data set currently being processed.
///
pub struct ActionContext<'a> {
  uid_resolver: &'a mut dyn UidResolver,
  path: DataSetPath,
}

impl<'a> ActionContext<'a> {
  /// Creates a new action context positioned at the root data set.
  ///
  pub fn new(uid_resolver: &'a mut dyn UidResolver) -> Self {
    Self {
      uid_resolver,
      path: DataSetPath::new(),
    }
  }

  /// Returns the path to the data set currently being processed.
  ///
  pub fn path(&self) -> &DataSetPath {
    &self.path
  }

  /// Returns the path to a data element in the data set currently being
  /// processed.
  ///
  pub fn element_path(&self, tag: DataElementTag) -> DataSetPath {
    self.path.with_data_element(tag)
  }

  /// Returns the replacement for a UID.
  ///
  pub fn resolve_uid(&mut self, uid: &str) -> String {
    self.uid_resolver.resolve(uid)
  }

  pub(crate) fn set_path(&mut self, path: DataSetPath) -> DataSetPath {
    core::mem::replace(&mut self.path, path)
  }
}

/// A caller-supplied action function.
///
pub type CustomActionFn = dyn Fn(
    &mut DataSet,
    DataElementTag,
    &mut ActionContext,
  ) -> Result<(), AnonymizeError>
  + Send
  + Sync;

/// A named caller-supplied action.
///
#[derive(Clone)]
pub struct CustomAction {
  name: String,
  function: Arc<CustomActionFn>,
}

impl CustomAction {
  /// Creates a new custom action from a name and a function.
  ///
  pub fn new<F>(name: &str, function: F) -> Self
  where
    F: Fn(
        &mut DataSet,
        DataElementTag,
        &mut ActionContext,
      ) -> Result<(), AnonymizeError>
      + Send
      + Sync
      + 'static,
  {
    Self {
      name: name.to_string(),
      function: Arc::new(function),
    }
  }

  /// Returns the name of a custom action.
  ///
  pub fn name(&self) -> &str {
    &self.name
  }
}

impl core::fmt::Debug for CustomAction {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    f.debug_struct("CustomAction")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

/// An action in an action table.
///
#[derive(Clone, Debug)]
pub enum Action {
  /// One of the confidentiality profile actions.
  Builtin(ActionKind),

  /// Replaces string values with the given text. Sequences are processed
  /// recursively.
  ReplaceWith(String),

  /// A caller-supplied action.
  Custom(CustomAction),
}

impl Action {
  /// Applies an action to a data element in a data set.
  ///
  pub fn apply(
    &self,
    data_set: &mut DataSet,
    tag: DataElementTag,
    context: &mut ActionContext,
  ) -> Result<(), AnonymizeError> {
    match self {
      Self::Builtin(kind) => kind.function()(data_set, tag, context),
      Self::ReplaceWith(text) => {
        actions::replace_with(data_set, tag, text, context)
      }
      Self::Custom(custom) => (custom.function)(data_set, tag, context),
    }
  }
}

impl From<ActionKind> for Action {
  fn from(kind: ActionKind) -> Self {
    Self::Builtin(kind)
  }
}

impl PartialEq for Action {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Builtin(a), Self::Builtin(b)) => a == b,
      (Self::ReplaceWith(a), Self::ReplaceWith(b)) => a == b,
      (Self::Custom(a), Self::Custom(b)) => {
        Arc::ptr_eq(&a.function, &b.function)
      }
      _ => false,
    }
  }
}

impl core::fmt::Display for Action {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::Builtin(kind) => write!(f, "{} ({})", kind.code(), kind.name()),
      Self::ReplaceWith(text) => write!(f, "D (replace with {:?})", text),
      Self::Custom(custom) => write!(f, "custom ({})", custom.name),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_str_test() {
    for kind in ActionKind::ALL {
      assert_eq!(kind.name().parse::<ActionKind>(), Ok(kind));
    }

    assert_eq!(
      "remove".parse::<ActionKind>(),
      Err("Unknown action: \"remove\"".to_string())
    );
    assert!("replace_uid".parse::<ActionKind>().is_err());
  }

  #[test]
  fn to_string_test() {
    assert_eq!(
      Action::Builtin(ActionKind::DeleteOrEmptyOrReplaceUid).to_string(),
      "X/Z/U* (delete_or_empty_or_replace_UID)"
    );
    assert_eq!(
      Action::ReplaceWith("REDACTED".to_string()).to_string(),
      "D (replace with \"REDACTED\")"
    );
    assert_eq!(
      Action::Custom(CustomAction::new("noop", |_, _, _| Ok(()))).to_string(),
      "custom (noop)"
    );
  }

  #[test]
  fn custom_action_equality_test() {
    let a = CustomAction::new("noop", |_, _, _| Ok(()));
    let b = CustomAction::new("noop", |_, _, _| Ok(()));

    assert_eq!(Action::Custom(a.clone()), Action::Custom(a.clone()));
    assert_ne!(Action::Custom(a), Action::Custom(b));
  }
}
