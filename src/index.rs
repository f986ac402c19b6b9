//! In-memory feature database.
//!
//! Every parsed GFF3 feature receives a unique id and is reachable by type
//! (in file order) and by parent id.

use crate::gff::GffRecord;
use hashbrown::HashMap;

/// A GFF3 feature with its database id.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Unique id: `ID` attribute, `<type>_<n>` when absent, suffixed on clashes.
    pub id: String,
    pub record: GffRecord,
}

impl std::ops::Deref for Feature {
    type Target = GffRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

#[derive(Debug, Default)]
pub struct FeatureIndex {
    features: Vec<Feature>,
    by_type: HashMap<String, Vec<usize>>,
    children: HashMap<String, Vec<usize>>,
}

impl FeatureIndex {
    /// Builds the index, consuming records in file order.
    pub fn build(records: Vec<GffRecord>) -> Self {
        let mut index = FeatureIndex {
            features: Vec::with_capacity(records.len()),
            ..Default::default()
        };

        let mut type_counters: HashMap<String, usize> = HashMap::new();
        let mut id_counters: HashMap<String, usize> = HashMap::new();

        for record in records {
            let id = match record.attr.id() {
                Some(id) => unique_id(id, &mut id_counters),
                None => {
                    let n = type_counters.entry(record.feature.clone()).or_insert(0);
                    *n += 1;
                    unique_id(&format!("{}_{}", record.feature, n), &mut id_counters)
                }
            };

            let idx = index.features.len();
            index
                .by_type
                .entry(record.feature.clone())
                .or_default()
                .push(idx);
            for parent in record.attr.parents() {
                index.children.entry(parent.clone()).or_default().push(idx);
            }

            index.features.push(Feature { id, record });
        }

        index
    }

    /// Features of `feature_type` in file order.
    pub fn features_of_type<'a>(
        &'a self,
        feature_type: &str,
    ) -> impl Iterator<Item = &'a Feature> {
        self.by_type
            .get(feature_type)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.features[idx])
    }

    pub fn count_of_type(&self, feature_type: &str) -> usize {
        self.by_type.get(feature_type).map_or(0, Vec::len)
    }

    /// Direct children of `parent` with type `feature_type`, ordered by start.
    ///
    /// Children are matched on the parent's `ID` attribute, so features whose
    /// id was made unique still collect children that name the original id.
    pub fn children_of_type<'a>(
        &'a self,
        parent: &Feature,
        feature_type: &str,
    ) -> Vec<&'a Feature> {
        let key = parent.attr.id().unwrap_or(parent.id.as_str());
        let mut out = self
            .children
            .get(key)
            .into_iter()
            .flatten()
            .map(|&idx| &self.features[idx])
            .filter(|child| child.feature == feature_type && child.chr == parent.chr)
            .collect::<Vec<_>>();
        out.sort_by_key(|child| (child.start, child.end));
        out
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Returns `id`, or `id_<n>` with the first unused `n` when taken.
fn unique_id(id: &str, seen: &mut HashMap<String, usize>) -> String {
    let Some(mut n) = seen.get(id).copied() else {
        seen.insert(id.to_string(), 0);
        return id.to_string();
    };

    loop {
        n += 1;
        let candidate = format!("{id}_{n}");
        if !seen.contains_key(&candidate) {
            seen.insert(id.to_string(), n);
            seen.insert(candidate.clone(), 0);
            return candidate;
        }
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
    fn test_ids_assigned() {
        let idx = index(indoc! {"
            chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1
            chr1\tsrc\tgene\t200\t300\t.\t+\t.\tName=nameless
            chr1\tsrc\tCDS\t1\t30\t.\t+\t0\tID=cds1;Parent=t1
            chr1\tsrc\tCDS\t50\t90\t.\t+\t0\tID=cds1;Parent=t1
            chr1\tsrc\tgene\t400\t500\t.\t+\t.\tName=other
        "});

        let genes = idx.features_of_type("gene").map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(genes, ["g1", "gene_1", "gene_2"]);

        let cds = idx.features_of_type("CDS").map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(cds, ["cds1", "cds1_1"]);
        assert_eq!(idx.count_of_type("mRNA"), 0);
        assert_eq!(idx.len(), 5);
    }

    #[test]
    fn test_children_sorted_and_filtered() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t1\t100\t.\t-\t.\tID=t1
            chr1\tsrc\texon\t60\t100\t.\t-\t.\tParent=t1
            chr1\tsrc\texon\t1\t20\t.\t-\t.\tParent=t1
            chr1\tsrc\tCDS\t10\t20\t.\t-\t0\tParent=t1
            chr1\tsrc\texon\t5\t15\t.\t-\t.\tParent=t2
        "});

        let tx = idx.features_of_type("mRNA").next().unwrap();
        let exons = idx
            .children_of_type(tx, "exon")
            .iter()
            .map(|e| (e.start, e.end))
            .collect::<Vec<_>>();
        assert_eq!(exons, [(1, 20), (60, 100)]);
        assert_eq!(idx.children_of_type(tx, "CDS").len(), 1);
    }

    #[test]
    fn test_shared_exon_multiple_parents() {
        let idx = index(indoc! {"
            chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=t1
            chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=t2
            chr1\tsrc\texon\t1\t100\t.\t+\t.\tParent=t1,t2
        "});

        for tx in idx.features_of_type("mRNA") {
            assert_eq!(idx.children_of_type(tx, "exon").len(), 1);
        }
    }
}
