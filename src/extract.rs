use crate::bed::{gene_to_bed12, transcript_to_bed12, Bed12};
use crate::error::Result;
use crate::gff::parse_records;
use crate::index::{Feature, FeatureIndex};
use crate::label::{format_label, LabelKind};
use std::path::Path;

const GENE_TYPES: [&str; 1] = ["gene"];
const TRANSCRIPT_TYPES: [&str; 2] = ["mRNA", "transcript"];
/// Used only when a file has neither genes nor transcripts (typical of
/// some bacterial annotations).
const FALLBACK_TYPES: [&str; 1] = ["CDS"];

/// BED12 records for both tracks of a genome.
#[derive(Debug, Default)]
pub struct Tracks {
    pub genes: Vec<Bed12>,
    pub transcripts: Vec<Bed12>,
}

impl Tracks {
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty() && self.transcripts.is_empty()
    }
}

/// Reads a GFF3 file and builds gene and transcript BED12 records.
///
/// # Arguments
///
/// * `path` - Uncompressed GFF3 file
///
/// # Errors
///
/// Only I/O errors are returned; unparseable lines are skipped.
///
/// # Example
///
/// ```rust, ignore
/// use gff2bigbed::extract::extract_features;
/// use std::path::Path;
///
/// let tracks = extract_features(Path::new("temp/tair10.gff3"))?;
/// println!("{} genes", tracks.genes.len());
/// ```
pub fn extract_features(path: &Path) -> Result<Tracks> {
    log::info!("Indexing {}", path.display());
    // Stray non-UTF-8 bytes (Latin-1 notes and the like) are replaced, not fatal.
    let bytes = std::fs::read(path)?;
    let parsed = parse_records(&String::from_utf8_lossy(&bytes));
    drop(bytes);

    if parsed.skipped > 0 {
        log::warn!("Skipped {} malformed GFF3 lines", parsed.skipped);
    }

    let index = FeatureIndex::build(parsed.records);
    Ok(extract_from_index(&index))
}

/// Builds both tracks from an already indexed GFF3.
pub fn extract_from_index(index: &FeatureIndex) -> Tracks {
    let mut tracks = Tracks {
        genes: first_present(index, &GENE_TYPES, |f| {
            gene_to_bed12(f, format_label(f, LabelKind::Gene))
        }),
        transcripts: first_present(index, &TRANSCRIPT_TYPES, |f| {
            transcript_to_bed12(f, index, format_label(f, LabelKind::Transcript))
        }),
    };

    if tracks.is_empty() {
        log::info!("No gene/mRNA features, trying CDS...");
        tracks.genes = first_present(index, &FALLBACK_TYPES, |f| {
            gene_to_bed12(f, format_label(f, LabelKind::Gene))
        });
    }

    log::info!(
        "Extracted {} genes, {} transcripts",
        tracks.genes.len(),
        tracks.transcripts.len()
    );
    tracks
}

/// Converts every feature of the first type in `types` that occurs in the
/// index; later types are not consulted.
fn first_present<F>(index: &FeatureIndex, types: &[&str], convert: F) -> Vec<Bed12>
where
    F: Fn(&Feature) -> Bed12,
{
    for feature_type in types {
        let count = index.count_of_type(feature_type);
        if count == 0 {
            continue;
        }

        log::info!("Found {count} {feature_type} features");
        return index.features_of_type(feature_type).map(&convert).collect();
    }
    Vec::new()
}
