use std::path::PathBuf;
use thiserror::Error;

/// Error type for gff2bigbed operations.
#[derive(Debug, Error)]
pub enum Gff2BigBedError {
    /// Requested genome id is not listed in the catalog.
    #[error("genome '{0}' not found in config")]
    UnknownGenome(String),
    /// Catalog is structurally valid JSON but semantically broken.
    #[error("invalid genome catalog: {0}")]
    InvalidCatalog(String),
    /// No prebuilt bedToBigBed binary exists for this platform.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    /// Remote server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },
    /// The GFF3 yielded neither genes nor transcripts.
    #[error("no features found in {0:?}")]
    NoFeatures(PathBuf),
    /// A track had no BED lines left to convert.
    #[error("no {0} records to convert")]
    EmptyTrack(String),
    /// bedToBigBed exited with a non-zero status.
    #[error("bedToBigBed failed ({status}): {stderr}")]
    ToolFailed { status: String, stderr: String },
    /// Failed to build a Rayon thread pool.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Wraps catalog decoding errors.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),
    /// Wraps transport errors from reqwest.
    #[error("download error: {0}")]
    Request(#[from] reqwest::Error),
    /// Wraps temp file persistence errors.
    #[error("could not persist download: {0}")]
    Persist(#[from] tempfile::PersistError),
    /// Wraps standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gff2bigbed operations.
pub type Result<T> = std::result::Result<T, Gff2BigBedError>;
