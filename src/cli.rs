//! GFF3-to-BigBed gene and transcript track builder
//! Alejandro Gonzales-Irribarren, 2025

use clap::Parser;
use indoc::indoc;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(
    name = "gff2bigbed",
    version = env!("CARGO_PKG_VERSION"),
    author = "Alejandro Gonzales-Irribarren <alejandrxgzi@gmail.com>",
    about = "build BigBed gene/transcript tracks from GFF3 annotations",
    after_help = indoc! {"
        Examples:
          gff2bigbed --list
          gff2bigbed arabidopsis_tair10
          gff2bigbed --all -o tracks/

        Every genome produces <id>.genes.bb and <id>.transcripts.bb in the
        output directory. Labels read LOCUS_ID (SYMBOL), or LOCUS_ID alone
        when no symbol is annotated.
    "}
)]
pub struct Args {
    /// Genome id to convert, as listed by --list.
    #[clap(
        value_name = "GENOME_ID",
        conflicts_with_all = ["all", "list"]
    )]
    pub genome_id: Option<String>,

    /// Convert every genome in the catalog.
    #[clap(long, help = "Convert all genomes", conflicts_with = "list")]
    pub all: bool,

    /// Print configured genome ids and names.
    #[clap(long, help = "List available genomes")]
    pub list: bool,

    /// JSON catalog describing genomes, their GFF3 sources and chromosome sizes.
    #[clap(
        short = 'c',
        long = "config",
        help = "Path to genome catalog",
        value_name = "JSON",
        default_value = "genomes.json"
    )]
    pub config: PathBuf,

    /// Where the .bb files are written.
    #[clap(
        short = 'o',
        long = "output-dir",
        help = "Output directory",
        value_name = "DIR",
        default_value = "output"
    )]
    pub output_dir: PathBuf,

    /// Scratch space for downloads, chrom.sizes and intermediate BED12 files.
    #[clap(
        long = "temp-dir",
        help = "Temporary directory",
        value_name = "DIR",
        default_value = "temp"
    )]
    pub temp_dir: PathBuf,

    /// Where bedToBigBed is looked up (and downloaded to when missing).
    #[clap(
        long = "tools-dir",
        help = "Tools directory",
        value_name = "DIR",
        default_value = "tools"
    )]
    pub tools_dir: PathBuf,

    /// Use this bedToBigBed binary instead of the one in --tools-dir.
    #[clap(
        long = "bed-to-bigbed",
        help = "Path to an existing bedToBigBed binary",
        value_name = "BIN"
    )]
    pub bed_to_bigbed: Option<PathBuf>,

    /// Number of threads to use; default is the number of logical CPUs.
    #[clap(
        short = 't',
        long,
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,

    /// Keep temp files (including the downloaded GFF3) after conversion.
    #[clap(long = "keep-temp", help = "Do not delete temporary files")]
    pub keep_temp: bool,
}

impl Args {
    /// Checks all the arguments for validity using validate_args()
    pub fn check(&self) -> Result<(), ArgError> {
        self.validate_args()
    }

    /// The catalog must exist and not be empty.
    fn check_config(&self) -> Result<(), ArgError> {
        match std::fs::metadata(&self.config) {
            Err(_) => Err(ArgError::InvalidConfig(format!(
                "file {:?} does not exist",
                self.config
            ))),
            Ok(meta) if meta.len() == 0 => Err(ArgError::InvalidConfig(format!(
                "file {:?} is empty",
                self.config
            ))),
            Ok(_) => Ok(()),
        }
    }

    /// Checks the number of threads for validity. The number of threads must be greater than 0
    /// and less than or equal to the number of logical CPUs.
    fn check_threads(&self) -> Result<(), ArgError> {
        if self.threads == 0 {
            let err = "number of threads must be greater than 0".to_string();
            Err(ArgError::InvalidThreads(err))
        } else if self.threads > num_cpus::get() {
            let err = "number of threads must be less than or equal to the number of logical CPUs"
                .to_string();
            Err(ArgError::InvalidThreads(err))
        } else {
            Ok(())
        }
    }

    /// Validates all the arguments
    fn validate_args(&self) -> Result<(), ArgError> {
        self.check_config()?;
        self.check_threads()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArgError {
    /// The catalog file does not exist or is empty.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The number of threads is invalid.
    #[error("Invalid number of threads: {0}")]
    InvalidThreads(String),
}
