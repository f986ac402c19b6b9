use crate::cli::Args;
use std::path::PathBuf;

/// What a run should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Print the catalog.
    List,
    /// Convert every genome in the catalog.
    All,
    /// Convert a single genome.
    One(String),
    /// Nothing was requested; print usage.
    Help,
}

/// Normalized configuration for a conversion run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Selected action.
    pub mode: Mode,
    /// Genome catalog path.
    pub catalog: PathBuf,
    /// Directory receiving the .bb files.
    pub output_dir: PathBuf,
    /// Scratch directory for downloads and intermediates.
    pub temp_dir: PathBuf,
    /// Directory holding (or receiving) bedToBigBed.
    pub tools_dir: PathBuf,
    /// Explicit bedToBigBed binary, bypassing `tools_dir`.
    pub bed_to_bigbed: Option<PathBuf>,
    /// Number of threads to use.
    pub threads: usize,
    /// Leave `<temp>/<id>.*` in place after a genome is processed.
    pub keep_temp: bool,
}

impl Config {
    /// Builds a conversion config from CLI arguments.
    ///
    /// `--list` wins over `--all`, which wins over a positional genome id;
    /// clap already rejects the combinations, the order only matters for
    /// programmatic callers.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use clap::Parser;
    /// use gff2bigbed::{Args, Config, Mode};
    ///
    /// let args = Args::parse_from(["gff2bigbed", "--all"]);
    /// let config = Config::from_args(&args);
    /// assert_eq!(config.mode, Mode::All);
    /// ```
    pub fn from_args(args: &Args) -> Self {
        let mode = if args.list {
            Mode::List
        } else if args.all {
            Mode::All
        } else if let Some(id) = &args.genome_id {
            Mode::One(id.clone())
        } else {
            Mode::Help
        };

        Self {
            mode,
            catalog: args.config.clone(),
            output_dir: args.output_dir.clone(),
            temp_dir: args.temp_dir.clone(),
            tools_dir: args.tools_dir.clone(),
            bed_to_bigbed: args.bed_to_bigbed.clone(),
            threads: args.threads,
            keep_temp: args.keep_temp,
        }
    }
}
