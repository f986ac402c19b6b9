mod attr;
pub use attr::*;

use rayon::prelude::*;
use thiserror::Error;

/// Directive after which a GFF3 file carries sequences, not features.
const FASTA_DIRECTIVE: &str = "##FASTA";

#[derive(Debug, PartialEq, Clone)]
pub struct GffRecord {
    pub chr: String,
    pub feature: String,
    /// 1-based, inclusive.
    pub start: u64,
    /// 1-based, inclusive.
    pub end: u64,
    pub strand: Strand,
    pub attr: Attributes,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

impl From<&str> for Strand {
    fn from(value: &str) -> Self {
        match value {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Empty line")]
    Empty,
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Start {0} is past end {1}")]
    InvertedInterval(u64, u64),
    #[error("Error parsing attributes: {0}")]
    Attributes(#[from] ParseError),
}

impl GffRecord {
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        if line.trim().is_empty() {
            return Err(RecordError::Empty);
        }

        let mut fields = line.split('\t');

        let (chr, _, feature, start, end, _, strand, _, attr) = (
            fields.next().ok_or(RecordError::MissingField("seqid"))?,
            fields.next().ok_or(RecordError::MissingField("source"))?,
            fields.next().ok_or(RecordError::MissingField("type"))?,
            fields.next().ok_or(RecordError::MissingField("start"))?,
            fields.next().ok_or(RecordError::MissingField("end"))?,
            fields.next().ok_or(RecordError::MissingField("score"))?,
            fields.next().ok_or(RecordError::MissingField("strand"))?,
            fields.next().ok_or(RecordError::MissingField("phase"))?,
            fields.next().ok_or(RecordError::MissingField("attributes"))?,
        );

        let start = parse_coordinate(start)?;
        let end = parse_coordinate(end)?;
        if start > end {
            return Err(RecordError::InvertedInterval(start, end));
        }

        Ok(Self {
            chr: chr.to_string(),
            feature: feature.to_string(),
            start,
            end,
            strand: Strand::from(strand.trim()),
            attr: Attributes::parse(attr)?,
        })
    }

    /// Length in bases.
    pub fn span(&self) -> u64 {
        self.end - self.start + 1
    }
}

fn parse_coordinate(value: &str) -> Result<u64, RecordError> {
    match value.trim().parse::<u64>() {
        Ok(pos) if pos > 0 => Ok(pos),
        _ => Err(RecordError::InvalidCoordinate(value.to_string())),
    }
}

/// Everything before the first line that starts with `##FASTA`.
fn feature_body(content: &str) -> &str {
    if content.starts_with(FASTA_DIRECTIVE) {
        return "";
    }
    content
        .match_indices(FASTA_DIRECTIVE)
        .find(|(idx, _)| content.as_bytes()[idx - 1] == b'\n')
        .map_or(content, |(idx, _)| &content[..idx])
}

/// Outcome of parsing a whole GFF3 body.
#[derive(Debug, Default)]
pub struct ParsedGff {
    /// Features in file order.
    pub records: Vec<GffRecord>,
    /// Non-comment lines that could not be parsed.
    pub skipped: usize,
}

/// Parses every feature line of `content` in parallel, keeping file order.
///
/// Comment and directive lines are ignored, everything after `##FASTA` is
/// dropped, and malformed lines are counted in [`ParsedGff::skipped`].
pub fn parse_records(content: &str) -> ParsedGff {
    let parsed = feature_body(content)
        .par_lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| {
            GffRecord::parse(line.trim_end_matches('\r')).map_err(|e| {
                log::debug!("skipping line: {e}");
                e
            })
        })
        .collect::<Vec<_>>();

    let mut out = ParsedGff::default();
    for record in parsed {
        match record {
            Ok(record) => out.records.push(record),
            Err(_) => out.skipped += 1,
        }
    }
    out
}
