//! # gff2bigbed
//!
//! Builds BigBed gene and transcript tracks from GFF3 annotations.
//!
//! ## Usage
//!
//! ```bash
//! gff2bigbed [GENOME_ID] [OPTIONS]
//!
//! Actions (pick one):
//!   <GENOME_ID>                 Convert a single genome
//!   --all                       Convert every genome in the catalog
//!   --list                      List available genomes
//!
//! Optional arguments:
//!   -c, --config <JSON>         Genome catalog [default: genomes.json]
//!   -o, --output-dir <DIR>      Output directory [default: output]
//!       --temp-dir <DIR>        Temporary directory [default: temp]
//!       --tools-dir <DIR>       Tools directory [default: tools]
//!       --bed-to-bigbed <BIN>   Use an existing bedToBigBed binary
//!   -t, --threads <THREADS>     Number of threads (default: CPU count)
//!       --keep-temp             Do not delete temporary files
//! ```
//!
//! ## Examples
//!
//! ```bash
//! gff2bigbed --list
//! gff2bigbed tair10
//! gff2bigbed --all -o tracks/ --keep-temp
//! ```
use clap::{CommandFactory, Parser};
use gff2bigbed::{run, Args, Config, Mode};
use log::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(Level::Info)?;

    let args = Args::parse();
    log::debug!("{:?}", args);

    let config = Config::from_args(&args);
    if config.mode == Mode::Help {
        Args::command().print_help()?;
        return Ok(());
    }

    args.check()?;
    log::info!("Using {} threads", config.threads);

    let stats = run(&config)?;
    if !stats.attempted.is_empty() {
        log::info!("Elapsed: {:.4?} secs", stats.elapsed.as_secs_f32());
        log::info!("Memory: {:.2} MB", stats.mem_delta_mb);
    }

    if !stats.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
