use gff2bigbed::detect::{detect_source_kind, Compression, Location};
use std::path::PathBuf;

/// Ensures a plain HTTPS GFF3 is detected as remote and uncompressed.
#[test]
fn detect_plain_remote() {
    let kind = detect_source_kind("https://example.org/pub/genes.gff3");
    assert_eq!(
        kind.location,
        Location::Remote("https://example.org/pub/genes.gff3".to_string())
    );
    assert_eq!(kind.compression, Compression::None);
}

/// Ensures gzip compression is detected, even behind a query string.
#[test]
fn detect_remote_gzip() {
    let kind = detect_source_kind("http://example.org/genes.gff3.gz?raw=1");
    assert!(matches!(kind.location, Location::Remote(_)));
    assert_eq!(kind.compression, Compression::Gzip);
    assert!(kind.compression.is_compressed());
}

/// Ensures file:// URLs and bare paths resolve to local files.
#[test]
fn detect_local_sources() {
    let kind = detect_source_kind("file:///data/genes.GFF3.GZ");
    assert_eq!(kind.location, Location::Local(PathBuf::from("/data/genes.GFF3.GZ")));
    assert_eq!(kind.compression, Compression::Gzip);

    let kind = detect_source_kind("annotations/genes.gff");
    assert_eq!(
        kind.location,
        Location::Local(PathBuf::from("annotations/genes.gff"))
    );
    assert_eq!(kind.compression, Compression::None);
}
