//! Display labels for BED name fields: `LOCUS_ID (SYMBOL)` or `LOCUS_ID`.

use crate::index::Feature;

/// Attributes holding a gene locus id, by priority.
const GENE_LOCUS_KEYS: [&str; 2] = ["gene_id", "locus_tag"];
/// Attributes holding a gene symbol, by priority.
const GENE_SYMBOL_KEYS: [&str; 3] = ["Name", "gene", "gene_name"];
const TRANSCRIPT_LOCUS_KEYS: [&str; 1] = ["transcript_id"];
const TRANSCRIPT_SYMBOL_KEYS: [&str; 1] = ["Name"];

const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Gene,
    Transcript,
}

impl LabelKind {
    fn locus_keys(self) -> &'static [&'static str] {
        match self {
            LabelKind::Gene => &GENE_LOCUS_KEYS,
            LabelKind::Transcript => &TRANSCRIPT_LOCUS_KEYS,
        }
    }

    fn symbol_keys(self) -> &'static [&'static str] {
        match self {
            LabelKind::Gene => &GENE_SYMBOL_KEYS,
            LabelKind::Transcript => &TRANSCRIPT_SYMBOL_KEYS,
        }
    }
}

/// `gene:AT1G01010` -> `AT1G01010`.
fn strip_prefix(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

#[inline(always)]
fn is_informative(value: &str) -> bool {
    !value.is_empty() && value != "."
}

/// Picks the locus id: dedicated attributes first, then `ID`, then the
/// index id, the last two with any `prefix:` removed.
fn locus_id<'a>(feature: &'a Feature, kind: LabelKind) -> &'a str {
    kind.locus_keys()
        .iter()
        .filter_map(|key| feature.attr.first(key))
        .find(|value| is_informative(value))
        .or_else(|| feature.attr.id().map(strip_prefix))
        .unwrap_or_else(|| strip_prefix(&feature.id))
}

fn symbol<'a>(feature: &'a Feature, kind: LabelKind, locus: &str) -> Option<&'a str> {
    kind.symbol_keys()
        .iter()
        .filter_map(|key| feature.attr.first(key))
        .find(|value| is_informative(value) && *value != locus)
}

/// Formats the BED name for `feature`.
///
/// # Example
///
/// ```rust, ignore
/// // ID=gene:AT1G01010;Name=NAC001
/// assert_eq!(format_label(&feature, LabelKind::Gene), "AT1G01010 (NAC001)");
/// ```
pub fn format_label(feature: &Feature, kind: LabelKind) -> String {
    let locus = locus_id(feature, kind);
    if locus.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }

    match symbol(feature, kind, locus) {
        Some(symbol) => format!("{locus} ({symbol})"),
        None => locus.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff::GffRecord;

    fn feature(attributes: &str) -> Feature {
        let line = format!("1\tsrc\tgene\t1\t100\t.\t+\t.\t{attributes}");
        let record = GffRecord::parse(&line).unwrap();
        let id = record.attr.id().unwrap_or("gene_1").to_string();
        Feature { id, record }
    }

    #[test]
    fn test_ensembl_plants_gene() {
        let f = feature("ID=gene:AT1G01010;Name=NAC001;biotype=protein_coding;gene_id=AT1G01010");
        assert_eq!(format_label(&f, LabelKind::Gene), "AT1G01010 (NAC001)");
    }

    #[test]
    fn test_ncbi_gene_uses_locus_tag() {
        let f = feature("ID=gene-b0001;Name=thrL;gbkey=Gene;gene=thrL;locus_tag=b0001");
        assert_eq!(format_label(&f, LabelKind::Gene), "b0001 (thrL)");
    }

    #[test]
    fn test_symbol_equal_to_locus_falls_through() {
        let f = feature("ID=gene-thrL;Name=thrL;gene=thrA");
        assert_eq!(format_label(&f, LabelKind::Gene), "gene-thrL (thrL)");

        let f = feature("ID=gene:thrL;Name=thrL;gene=thrA");
        assert_eq!(format_label(&f, LabelKind::Gene), "thrL (thrA)");

        let f = feature("ID=gene:thrL;Name=thrL");
        assert_eq!(format_label(&f, LabelKind::Gene), "thrL");
    }

    #[test]
    fn test_placeholder_values_ignored() {
        let f = feature("ID=g1;gene_id=.;locus_tag=LT1;Name=.");
        assert_eq!(format_label(&f, LabelKind::Gene), "LT1");
    }

    #[test]
    fn test_transcript_label() {
        let f = feature("ID=transcript:AT1G01010.1;Parent=gene:AT1G01010;Name=NAC001-201;transcript_id=AT1G01010.1");
        assert_eq!(
            format_label(&f, LabelKind::Transcript),
            "AT1G01010.1 (NAC001-201)"
        );

        // gene_id is not consulted for transcripts
        let f = feature("ID=rna-NM_1.1;gene_id=G;gene=ABC");
        assert_eq!(format_label(&f, LabelKind::Transcript), "rna-NM_1.1");
    }

    #[test]
    fn test_falls_back_to_index_id() {
        let f = feature("Name=orphan");
        assert_eq!(format_label(&f, LabelKind::Gene), "gene_1 (orphan)");
    }

    #[test]
    fn test_empty_locus_is_unknown() {
        let f = feature("ID=gene:;Name=NAC001");
        assert_eq!(format_label(&f, LabelKind::Gene), "unknown");
    }
}
