use crate::error::{Gff2BigBedError, Result};
use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A chromosome and its length in bases.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chromosome {
    pub name: String,
    pub length: u64,
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Genome {
    pub id: String,
    pub name: String,
    pub gff3_url: String,
    #[serde(default)]
    pub chromosomes: Vec<Chromosome>,
}

/// The genome catalog, usually `genomes.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub genomes: Vec<Genome>,
}

impl Catalog {
    /// Reads and validates a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid JSON
    /// for this layout, or fails [`Catalog::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let catalog: Catalog = serde_json::from_reader(BufReader::new(file))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Rejects empty or duplicated genome ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for genome in &self.genomes {
            if genome.id.trim().is_empty() {
                return Err(Gff2BigBedError::InvalidCatalog(format!(
                    "genome '{}' has an empty id",
                    genome.name
                )));
            }
            if !seen.insert(genome.id.as_str()) {
                return Err(Gff2BigBedError::InvalidCatalog(format!(
                    "duplicate genome id '{}'",
                    genome.id
                )));
            }
        }
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&Genome> {
        self.genomes.iter().find(|g| g.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.genomes.iter().map(|g| g.id.as_str())
    }
}

/// Writes `<dir>/<id>.chrom.sizes` in catalog order and returns its path.
pub fn write_chrom_sizes(genome: &Genome, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.chrom.sizes", genome.id));
    let mut writer = BufWriter::new(File::create(&path)?);
    for chrom in &genome.chromosomes {
        writeln!(writer, "{}\t{}", chrom.name, chrom.length)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Chromosome name to length, as read back from a chrom.sizes file.
#[derive(Debug, Default)]
pub struct ChromSizes {
    sizes: HashMap<String, u64>,
}

impl ChromSizes {
    /// Parses a two-column chrom.sizes file. Lines that do not carry a
    /// numeric length are ignored.
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut sizes = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.trim().split('\t');
            if let (Some(name), Some(len)) = (fields.next(), fields.next()) {
                if let Ok(len) = len.parse::<u64>() {
                    sizes.insert(name.to_string(), len);
                }
            }
        }
        Ok(Self { sizes })
    }

    pub fn get(&self, chrom: &str) -> Option<u64> {
        self.sizes.get(chrom).copied()
    }

    /// True when `chrom` is known and `end` does not run past it.
    pub fn contains(&self, chrom: &str, end: u64) -> bool {
        self.get(chrom).is_some_and(|len| end <= len)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
