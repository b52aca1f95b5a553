//! Source archive naming.

/// Archive extensions recognized as a single unit, longest first so that
/// `.tar.xz` wins over `.xz`.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".tar.bz2", ".tar.xz", ".tar.gz", ".tgz", ".txz", ".tar", ".zip", ".7z"];

/// Compressed tarballs that unpack to an intermediate `.tar`.
const TAR_WRAPPED: &[&str] = &[".tar.bz2", ".tar.xz", ".tar.gz", ".tgz", ".txz"];

/// Final path segment of a URL, without query string or fragment.
pub fn source_file_name(url: &str) -> String {
  let without_query = url.split(['?', '#']).next().unwrap_or(url);
  without_query
    .trim_end_matches('/')
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(without_query)
    .to_string()
}

/// Splits `name` into its stem and outer archive extension.
///
/// Falls back to the last `.ext` when no known archive extension matches, and
/// returns no extension at all for a name without a dot.
pub fn split_archive_extension(name: &str) -> (&str, Option<&str>) {
  let lower = name.to_ascii_lowercase();
  for ext in ARCHIVE_EXTENSIONS {
    if lower.ends_with(ext) && lower.len() > ext.len() {
      let split = name.len() - ext.len();
      return (&name[..split], Some(&name[split..]));
    }
  }

  match name.rfind('.') {
    Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx..])),
    _ => (name, None),
  }
}

/// Name of the directory the archive unpacks to.
pub fn strip_archive_extension(name: &str) -> &str {
  split_archive_extension(name).0
}

/// For compressed tarballs, the name of the intermediate `.tar` produced by the
/// first extraction pass.
pub fn intermediate_tar_name(name: &str) -> Option<String> {
  let (stem, ext) = split_archive_extension(name);
  let ext = ext?.to_ascii_lowercase();
  TAR_WRAPPED.contains(&ext.as_str()).then(|| format!("{stem}.tar"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_name_is_last_url_segment() {
    assert_eq!(
      source_file_name("https://download.qt.io/archive/qt/5.15/5.15.2/single/qt-everywhere-src-5.15.2.zip"),
      "qt-everywhere-src-5.15.2.zip"
    );
  }

  #[test]
  fn file_name_drops_query_and_fragment() {
    assert_eq!(source_file_name("https://example.com/a/b.tar.xz?mirror=1#top"), "b.tar.xz");
  }

  #[test]
  fn file_name_from_local_path() {
    assert_eq!(source_file_name(r"C:\mirror\qt-src.zip"), "qt-src.zip");
  }

  #[test]
  fn compound_extensions_are_one_unit() {
    assert_eq!(strip_archive_extension("qt-everywhere-src-6.2.0.tar.xz"), "qt-everywhere-src-6.2.0");
    assert_eq!(strip_archive_extension("qt-everywhere-src-5.15.2.zip"), "qt-everywhere-src-5.15.2");
    assert_eq!(strip_archive_extension("pkg-1.0.TGZ"), "pkg-1.0");
  }

  #[test]
  fn unknown_extension_strips_last_suffix() {
    assert_eq!(split_archive_extension("source-1.2.rar"), ("source-1.2", Some(".rar")));
    assert_eq!(split_archive_extension("README"), ("README", None));
  }

  #[test]
  fn intermediate_tar_only_for_compressed_tarballs() {
    assert_eq!(intermediate_tar_name("a-1.0.tar.xz").as_deref(), Some("a-1.0.tar"));
    assert_eq!(intermediate_tar_name("a-1.0.tgz").as_deref(), Some("a-1.0.tar"));
    assert_eq!(intermediate_tar_name("a-1.0.zip"), None);
    assert_eq!(intermediate_tar_name("a-1.0.tar"), None);
  }
}
