//! Version inference from a source archive file name.
//!
//! The name is reduced by an ordered list of strip rules. Order matters: the
//! leading product token must go first so that the convention tokens after it
//! sit at the front of what remains.

use std::fmt;

use super::archive::strip_archive_extension;

/// How a strip rule reduces its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripKind {
  /// Remove the outer archive extension.
  ArchiveExtension,
  /// Remove everything up to and including the first `-`.
  LeadingProduct,
  /// Remove the first occurrence of a token.
  Substring(&'static str),
  /// Remove a token at the end of the input.
  Suffix(&'static str),
}

/// A named step of version inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripRule {
  pub name: &'static str,
  pub kind: StripKind,
}

impl StripRule {
  pub fn apply(&self, input: &str) -> String {
    match self.kind {
      StripKind::ArchiveExtension => strip_archive_extension(input).to_string(),
      StripKind::LeadingProduct => match input.split_once('-') {
        Some((_, rest)) => rest.to_string(),
        None => input.to_string(),
      },
      StripKind::Substring(token) => input.replacen(token, "", 1),
      StripKind::Suffix(token) => input.strip_suffix(token).unwrap_or(input).to_string(),
    }
  }
}

impl fmt::Display for StripRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Strip rules in the order they are applied.
pub const STRIP_RULES: &[StripRule] = &[
  StripRule {
    name: "archive-extension",
    kind: StripKind::ArchiveExtension,
  },
  StripRule {
    name: "product-prefix",
    kind: StripKind::LeadingProduct,
  },
  StripRule {
    name: "everywhere",
    kind: StripKind::Substring("everywhere-"),
  },
  StripRule {
    name: "opensource",
    kind: StripKind::Substring("opensource-"),
  },
  StripRule {
    name: "src-prefix",
    kind: StripKind::Substring("src-"),
  },
  StripRule {
    name: "src-suffix",
    kind: StripKind::Suffix("-src"),
  },
];

/// Derives a version string from a source archive file name.
///
/// Never fails; an unconventional name yields an unconventional version.
pub fn infer_version(file_name: &str) -> String {
  STRIP_RULES
    .iter()
    .fold(file_name.to_string(), |acc, rule| rule.apply(&acc))
}

/// Returns `explicit` untouched when given, otherwise infers from `file_name`.
pub fn resolve_version(explicit: Option<&str>, file_name: &str) -> String {
  match explicit {
    Some(version) => version.to_string(),
    None => infer_version(file_name),
  }
}
