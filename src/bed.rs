use crate::gff::Strand;
use crate::index::{Feature, FeatureIndex};
use std::collections::BTreeSet;
use std::fmt;

const EXON: &str = "exon";
const CDS: &str = "CDS";
const ITEM_RGB: &str = "0,0,0";

/// A BED12 line. Coordinates are 0-based, half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bed12 {
    pub chr: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub score: u16,
    pub strand: Strand,
    pub thick_start: u64,
    pub thick_end: u64,
    /// `(offset from start, size)` per block, ascending.
    pub blocks: Vec<(u64, u64)>,
}

impl Bed12 {
    /// A single block spanning the whole interval.
    pub fn single_block(chr: &str, start: u64, end: u64, name: String, strand: Strand) -> Self {
        Self {
            chr: chr.to_string(),
            start,
            end,
            name,
            score: 0,
            strand,
            thick_start: start,
            thick_end: end,
            blocks: vec![(0, end - start)],
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Comma-joined sizes and starts, each with a trailing comma.
    pub fn get_blocks_info(&self) -> (String, String) {
        let sizes = self
            .blocks
            .iter()
            .map(|(_, size)| size.to_string())
            .collect::<Vec<String>>()
            .join(",")
            + ",";

        let starts = self
            .blocks
            .iter()
            .map(|(offset, _)| offset.to_string())
            .collect::<Vec<String>>()
            .join(",")
            + ",";

        (sizes, starts)
    }
}

impl fmt::Display for Bed12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sizes, starts) = self.get_blocks_info();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chr,
            self.start,
            self.end,
            self.name,
            self.score,
            self.strand,
            self.thick_start,
            self.thick_end,
            ITEM_RGB,
            self.block_count(),
            sizes,
            starts,
        )
    }
}

/// Genes span the whole locus, introns included, so they are drawn as one block.
pub fn gene_to_bed12(feature: &Feature, label: String) -> Bed12 {
    Bed12::single_block(
        &feature.chr,
        feature.start - 1,
        feature.end,
        label,
        feature.strand,
    )
}

/// Transcripts carry exon blocks and a CDS thick span.
///
/// Falls back to [`gene_to_bed12`] when the exon children cannot be turned
/// into blocks tiling the transcript from `chromStart` to `chromEnd`.
pub fn transcript_to_bed12(feature: &Feature, index: &FeatureIndex, label: String) -> Bed12 {
    let start = feature.start - 1;
    let end = feature.end;

    let exons = index
        .children_of_type(feature, EXON)
        .iter()
        .map(|exon| (exon.start - 1, exon.end))
        .collect::<BTreeSet<_>>();

    let Some(blocks) = exon_blocks(&exons, start, end) else {
        return gene_to_bed12(feature, label);
    };

    let (thick_start, thick_end) = thick_span(feature, index, start, end);

    Bed12 {
        chr: feature.chr.clone(),
        start,
        end,
        name: label,
        score: 0,
        strand: feature.strand,
        thick_start,
        thick_end,
        blocks,
    }
}

/// Merges overlapping exons and converts them to relative blocks.
///
/// Returns `None` if there are no exons, or the merged exons do not start at
/// `start` and end at `end`.
fn exon_blocks(exons: &BTreeSet<(u64, u64)>, start: u64, end: u64) -> Option<Vec<(u64, u64)>> {
    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(exons.len());
    for &(s, e) in exons {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let first = merged.first()?;
    let last = merged.last()?;
    if first.0 != start || last.1 != end {
        return None;
    }

    Some(merged.iter().map(|&(s, e)| (s - start, e - s)).collect())
}

/// CDS extent clamped to the transcript, or the whole transcript without CDS.
fn thick_span(feature: &Feature, index: &FeatureIndex, start: u64, end: u64) -> (u64, u64) {
    let cds = index.children_of_type(feature, CDS);
    let thick_start = cds.iter().map(|c| c.start - 1).min();
    let thick_end = cds.iter().map(|c| c.end).max();

    match (thick_start, thick_end) {
        (Some(s), Some(e)) => {
            let s = s.clamp(start, end);
            let e = e.clamp(s, end);
            (s, e)
        }
        _ => (start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff::parse_records;
    use indoc::indoc;

    fn index(gff: &str) -> FeatureIndex {
        FeatureIndex::build(parse_records(gff).records)
    }

    #[test]
    fn test_gene_single_block() {
        let idx = index("chr1\tsrc\tgene\t3631\t5899\t.\t+\t.\tID=g1\n");
        let gene = idx.features_of_type("gene").next().unwrap();
        let bed = gene_to_bed12(gene, "g1".to_string());
        assert_eq!(
            bed.to_string(),
            "chr1\t3630\t5899\tg1\t0\t+\t3630\t5899\t0,0,0\t1\t2269,\t0,"
        );
    }

    #[test]
    fn test_transcript_blocks_and_thick() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t100\t200\t.\t-\t.\tID=tx1
            chr1\tsrc\texon\t180\t200\t.\t-\t.\tParent=tx1
            chr1\tsrc\texon\t100\t150\t.\t-\t.\tParent=tx1
            chr1\tsrc\tCDS\t120\t150\t.\t-\t0\tParent=tx1
            chr1\tsrc\tCDS\t180\t190\t.\t-\t1\tParent=tx1
        "});
        let tx = idx.features_of_type("mRNA").next().unwrap();
        let bed = transcript_to_bed12(tx, &idx, "tx1".to_string());

        let fields = bed.to_string();
        let fields = fields.split('\t').collect::<Vec<_>>();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[1], "99");
        assert_eq!(fields[2], "200");
        assert_eq!(fields[5], "-");
        assert_eq!(fields[6], "119");
        assert_eq!(fields[7], "190");
        assert_eq!(fields[9], "2");
        assert_eq!(fields[10], "51,21,");
        assert_eq!(fields[11], "0,80,");
    }

    #[test]
    fn test_noncoding_transcript_thick_is_whole_span() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t100\t200\t.\t+\t.\tID=tx1
            chr1\tsrc\texon\t100\t200\t.\t+\t.\tParent=tx1
        "});
        let tx = idx.features_of_type("mRNA").next().unwrap();
        let bed = transcript_to_bed12(tx, &idx, "tx1".to_string());
        assert_eq!((bed.thick_start, bed.thick_end), (99, 200));
        assert_eq!(bed.blocks, vec![(0, 101)]);
    }

    #[test]
    fn test_cds_clamped_to_transcript() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t100\t200\t.\t+\t.\tID=tx1
            chr1\tsrc\texon\t100\t200\t.\t+\t.\tParent=tx1
            chr1\tsrc\tCDS\t90\t120\t.\t+\t0\tParent=tx1
            chr1\tsrc\tCDS\t190\t250\t.\t+\t0\tParent=tx1
        "});
        let tx = idx.features_of_type("mRNA").next().unwrap();
        let bed = transcript_to_bed12(tx, &idx, "tx1".to_string());
        assert_eq!((bed.thick_start, bed.thick_end), (99, 200));
    }

    #[test]
    fn test_overlapping_exons_merged() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=tx1
            chr1\tsrc\texon\t1\t40\t.\t+\t.\tParent=tx1
            chr1\tsrc\texon\t30\t50\t.\t+\t.\tParent=tx1
            chr1\tsrc\texon\t1\t40\t.\t+\t.\tParent=tx1
            chr1\tsrc\texon\t81\t100\t.\t+\t.\tParent=tx1
        "});
        let tx = idx.features_of_type("mRNA").next().unwrap();
        let bed = transcript_to_bed12(tx, &idx, "tx1".to_string());
        assert_eq!(bed.blocks, vec![(0, 50), (80, 20)]);
    }

    #[test]
    fn test_fallback_without_exons_or_when_blocks_do_not_tile() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=tx1
            chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=tx2
            chr1\tsrc\texon\t10\t100\t.\t+\t.\tParent=tx2
        "});
        for tx in idx.features_of_type("mRNA") {
            let bed = transcript_to_bed12(tx, &idx, tx.id.clone());
            assert_eq!(bed.blocks, vec![(0, 100)]);
            assert_eq!((bed.thick_start, bed.thick_end), (0, 100));
        }
    }
}
