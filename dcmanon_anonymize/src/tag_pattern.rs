//! Tag patterns and the expansion of wildcarded tag specifications into them.

use std::sync::LazyLock;

use regex::Regex;

use dcmanon_core::DataElementTag;

/// The largest number of concrete tags a wildcarded tag specification is
/// expanded into. Specifications that cover more tags than this are matched
/// with a [`TagRange`] instead.
///
pub const MAX_ENUMERATED_TAGS: usize = 256;

/// The group half used by tag specifications to denote "any odd group", i.e.
/// all private attributes.
///
const PRIVATE_ATTRIBUTES_GROUP: &str = "gggg";

static TAG_HALF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new("^(?:0[xX])?([0-9A-Fa-fxX]{4})$").expect("regex is valid")
});

/// Matches data element tags, either a single exact tag, or a range of tags
/// described by masks.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagPattern {
  Exact(DataElementTag),
  Range(TagRange),
}

impl TagPattern {
  /// Returns whether a tag is matched by this pattern.
  ///
  pub fn matches(&self, tag: DataElementTag) -> bool {
    match self {
      Self::Exact(exact) => *exact == tag,
      Self::Range(range) => range.matches(tag),
    }
  }
}

impl From<DataElementTag> for TagPattern {
  fn from(tag: DataElementTag) -> Self {
    Self::Exact(tag)
  }
}

impl core::fmt::Display for TagPattern {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::Exact(tag) => tag.fmt(f),
      Self::Range(range) => range.fmt(f),
    }
  }
}

/// A range predicate over tags. A tag matches when
/// `group & group_mask == group_value` and
/// `element & element_mask == element_value`.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagRange {
  pub group_value: u16,
  pub group_mask: u16,
  pub element_value: u16,
  pub element_mask: u16,
}

impl TagRange {
  /// Creates a new tag range. Bits of the values outside their masks are
  /// cleared.
  ///
  pub fn new(
    group_value: u16,
    group_mask: u16,
    element_value: u16,
    element_mask: u16,
  ) -> Self {
    Self {
      group_value: group_value & group_mask,
      group_mask,
      element_value: element_value & element_mask,
      element_mask,
    }
  }

  /// Returns whether a tag falls in this range.
  ///
  pub fn matches(&self, tag: DataElementTag) -> bool {
    tag.group & self.group_mask == self.group_value
      && tag.element & self.element_mask == self.element_value
  }
}

impl core::fmt::Display for TagRange {
  /// Formats a tag range as `(GGGG,EEEE)` with wildcard nibbles shown as `x`.
  ///
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(
      f,
      "({},{})",
      TagHalf::new(self.group_value, self.group_mask),
      TagHalf::new(self.element_value, self.element_mask)
    )
  }
}

/// One half of a tag specification, i.e. a group or an element. Nibbles that
/// are zero in the mask are wildcards.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagHalf {
  value: u16,
  mask: u16,
}

impl TagHalf {
  fn new(value: u16, mask: u16) -> Self {
    Self {
      value: value & mask,
      mask,
    }
  }

  /// Parses a tag half from four characters that are each either a hex digit
  /// or an `x` wildcard, with an optional `0x` prefix.
  ///
  fn parse(s: &str) -> Result<Self, String> {
    let captures = TAG_HALF_REGEX
      .captures(s.trim())
      .ok_or_else(|| format!("Invalid tag half: {:?}", s))?;

    let mut value = 0u16;
    let mut mask = 0u16;

    for c in captures[1].chars() {
      value <<= 4;
      mask <<= 4;

      if let Some(digit) = c.to_digit(16) {
        value |= digit as u16;
        mask |= 0xF;
      }
    }

    Ok(Self { value, mask })
  }

  /// Returns the indexes of the nibbles that are wildcards, with zero being
  /// the least significant nibble.
  ///
  fn wildcard_nibbles(&self) -> Vec<u32> {
    (0..4).filter(|i| (self.mask >> (i * 4)) & 0xF == 0).collect()
  }

  /// Returns every concrete value this half matches, in ascending order.
  ///
  fn values(&self) -> Vec<u16> {
    let nibbles = self.wildcard_nibbles();

    (0..1u32 << (4 * nibbles.len()))
      .map(|i| {
        nibbles.iter().enumerate().fold(self.value, |value, (j, nibble)| {
          value | ((((i >> (4 * j)) & 0xF) as u16) << (4 * nibble))
        })
      })
      .collect()
  }
}

impl core::fmt::Display for TagHalf {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    let s: String = (0..4)
      .rev()
      .map(|i| {
        if (self.mask >> (i * 4)) & 0xF == 0 {
          'x'
        } else {
          let digit = (self.value >> (i * 4)) & 0xF;
          char::from_digit(u32::from(digit), 16)
            .unwrap_or('?')
            .to_ascii_uppercase()
        }
      })
      .collect();

    f.write_str(&s)
  }
}

/// A tag specification as it appears in a tag catalog or override: a group
/// and an element, either of which may contain wildcards. The special group
/// `gggg` denotes all private attributes.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagSpecification {
  /// All private attributes, i.e. every data element in an odd group. These
  /// are handled by the private tag pass rather than by expansion.
  PrivateAttributes,

  /// A group and element that may contain wildcard nibbles.
  Pattern { group: TagHalf, element: TagHalf },
}

impl TagSpecification {
  /// Parses a tag specification from its group and element halves.
  ///
  pub fn new(group: &str, element: &str) -> Result<Self, String> {
    if group.trim().eq_ignore_ascii_case(PRIVATE_ATTRIBUTES_GROUP) {
      return Ok(Self::PrivateAttributes);
    }

    Ok(Self::Pattern {
      group: TagHalf::parse(group)?,
      element: TagHalf::parse(element)?,
    })
  }

  /// Returns the number of concrete tags this specification covers.
  ///
  pub fn tag_count(&self) -> usize {
    match self {
      Self::PrivateAttributes => 0,
      Self::Pattern { group, element } => {
        1usize << (4 * (group.wildcard_nibbles().len()
          + element.wildcard_nibbles().len()))
      }
    }
  }

  /// Expands this specification into tag patterns. Specifications covering
  /// at most [`MAX_ENUMERATED_TAGS`] tags are expanded to exact tags in
  /// ascending order, wider ones to a single range. Private attributes
  /// expand to nothing.
  ///
  pub fn expand(&self) -> Vec<TagPattern> {
    let Self::Pattern { group, element } = self else {
      return vec![];
    };

    if self.tag_count() > MAX_ENUMERATED_TAGS {
      return vec![TagPattern::Range(TagRange::new(
        group.value,
        group.mask,
        element.value,
        element.mask,
      ))];
    }

    let elements = element.values();

    group
      .values()
      .into_iter()
      .flat_map(|group| {
        elements.iter().map(move |element| {
          TagPattern::Exact(DataElementTag::new(group, *element))
        })
      })
      .collect()
  }
}

impl core::str::FromStr for TagSpecification {
  type Err = String;

  /// Parses a tag specification written as `GGGG,EEEE`, `(GGGG,EEEE)`, or
  /// `GGGGEEEE`.
  ///
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let inner = trimmed
      .strip_prefix('(')
      .and_then(|s| s.strip_suffix(')'))
      .unwrap_or(trimmed);

    if let Some((group, element)) = inner.split_once(',') {
      return Self::new(group, element);
    }

    if inner.len() == 8 && inner.is_ascii() {
      return Self::new(&inner[0..4], &inner[4..8]);
    }

    Err(format!("Invalid tag specification: {:?}", s))
  }
}

impl core::fmt::Display for TagSpecification {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::PrivateAttributes => f.write_str("(gggg,eeee)"),
      Self::Pattern { group, element } => write!(f, "({},{})", group, element),
    }
  }
}
