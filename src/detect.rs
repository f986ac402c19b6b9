use std::path::{Path, PathBuf};

/// Supported compression formats for GFF3 sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Returns true when the source is compressed.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use gff2bigbed::detect::Compression;
    ///
    /// assert!(Compression::Gzip.is_compressed());
    /// assert!(!Compression::None.is_compressed());
    /// ```
    pub fn is_compressed(self) -> bool {
        !matches!(self, Compression::None)
    }
}

/// Where a GFF3 source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// `http://` or `https://` URL.
    Remote(String),
    /// `file://` URL or plain filesystem path.
    Local(PathBuf),
}

/// Describes the detected source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKind {
    /// Remote URL or local path.
    pub location: Location,
    /// Compression format.
    pub compression: Compression,
}

/// Detects location and compression of a catalog `gff3_url`.
///
/// Compression is decided from the last extension only, ignoring any query
/// string, so `annotation.gff3.gz?download=1` is still gzip.
///
/// # Arguments
///
/// * `source` - URL or path as written in the catalog
///
/// # Example
///
/// ```rust, ignore
/// use gff2bigbed::detect::{detect_source_kind, Compression, Location};
///
/// let kind = detect_source_kind("https://example.org/genes.gff3.gz");
/// assert_eq!(kind.compression, Compression::Gzip);
/// assert!(matches!(kind.location, Location::Remote(_)));
/// ```
pub fn detect_source_kind(source: &str) -> SourceKind {
    let location = location_from_source(source);
    let path_part = source.split(['?', '#']).next().unwrap_or(source);
    let compression = extension_lowercase(Path::new(path_part))
        .as_deref()
        .and_then(compression_from_extension)
        .unwrap_or(Compression::None);

    SourceKind {
        location,
        compression,
    }
}

/// Splits a source string into a remote URL or a local path.
fn location_from_source(source: &str) -> Location {
    let lower = source.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Location::Remote(source.to_string())
    } else if let Some(path) = source.strip_prefix("file://") {
        Location::Local(PathBuf::from(path))
    } else {
        Location::Local(PathBuf::from(source))
    }
}

/// Extracts the lowercase extension from a path.
fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Determines compression based on extension.
fn compression_from_extension(ext: &str) -> Option<Compression> {
    match ext {
        "gz" | "gzip" => Some(Compression::Gzip),
        _ => None,
    }
}
