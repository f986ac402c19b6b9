//! # gff2bigbed
//!
//! Builds genome-browser BigBed tracks from GFF3 annotations.
//!
//! For every genome in a JSON catalog the GFF3 is downloaded (and cached),
//! indexed in memory, and turned into two BED12 tracks:
//!
//! - `<id>.genes.bb`: one block per gene, spanning the whole locus
//! - `<id>.transcripts.bb`: exon blocks with the CDS drawn thick
//!
//! Records are labelled `LOCUS_ID (SYMBOL)`, or `LOCUS_ID` when no symbol is
//! annotated. The binary BigBed files are written by UCSC's `bedToBigBed`,
//! which is fetched into the tools directory on first use.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use gff2bigbed::{run, Config, Mode};
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     mode: Mode::One("tair10".to_string()),
//!     catalog: PathBuf::from("genomes.json"),
//!     output_dir: PathBuf::from("output"),
//!     temp_dir: PathBuf::from("temp"),
//!     tools_dir: PathBuf::from("tools"),
//!     bed_to_bigbed: None,
//!     threads: 4,
//!     keep_temp: false,
//! };
//!
//! let stats = run(&config)?;
//! println!("Conversion completed in {:?}", stats.elapsed);
//! ```
//!
//! ## Catalog
//!
//! ```json
//! {
//!   "genomes": [
//!     {
//!       "id": "tair10",
//!       "name": "Arabidopsis thaliana (TAIR10)",
//!       "gff3_url": "https://example.org/Arabidopsis_thaliana.TAIR10.gff3.gz",
//!       "chromosomes": [{ "name": "1", "length": 30427671 }]
//!     }
//!   ]
//! }
//! ```

pub mod bed;
pub mod bigbed;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod gff;
pub mod index;
pub mod label;

pub use bed::Bed12;
pub use catalog::{Catalog, Chromosome, Genome};
pub use cli::Args;
pub use config::{Config, Mode};
pub use convert::{convert_genome, run, GenomeReport, RunStats};
pub use error::{Gff2BigBedError, Result};
pub use label::{format_label, LabelKind};
