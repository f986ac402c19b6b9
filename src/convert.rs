use crate::bed::Bed12;
use crate::bigbed::{create_bigbed, ensure_tool, TrackContext, TrackReport};
use crate::catalog::{write_chrom_sizes, Catalog};
use crate::config::{Config, Mode};
use crate::error::{Gff2BigBedError, Result};
use crate::extract::extract_features;
use crate::fetch::fetch_gff3;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const GENES_TRACK: &str = "genes";
const TRANSCRIPTS_TRACK: &str = "transcripts";

/// Summary statistics for a run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Wall clock time spent in the run.
    pub elapsed: Duration,
    /// Delta in maximum RSS memory usage, in MB.
    pub mem_delta_mb: f64,
    /// Genomes that were attempted.
    pub attempted: Vec<String>,
    /// Genomes that produced no track.
    pub failed: Vec<String>,
}

impl RunStats {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tracks produced for one genome.
#[derive(Debug, Clone, Default)]
pub struct GenomeReport {
    pub genes: Option<TrackReport>,
    pub transcripts: Option<TrackReport>,
}

impl GenomeReport {
    /// A genome succeeds when at least one track was written.
    pub fn is_success(&self) -> bool {
        self.genes.is_some() || self.transcripts.is_some()
    }
}

/// Runs the action selected in `config`.
///
/// `Mode::List` prints the catalog, `Mode::One` and `Mode::All` convert
/// genomes. With `Mode::All` a failing genome is logged and recorded in
/// [`RunStats::failed`] without stopping the others.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the thread pool
/// cannot be built. Conversion failures are reported through `RunStats`.
///
/// # Example
///
/// ```rust, ignore
/// use gff2bigbed::{run, Config};
///
/// let stats = run(&config)?;
/// if !stats.is_success() {
///     eprintln!("failed: {}", stats.failed.join(", "));
/// }
/// ```
pub fn run(config: &Config) -> Result<RunStats> {
    let start = Instant::now();
    let start_mem = max_mem_usage_mb();

    let catalog = Catalog::load(&config.catalog)?;

    let ids: Vec<String> = match &config.mode {
        Mode::List => {
            list_genomes(&catalog)?;
            Vec::new()
        }
        Mode::Help => Vec::new(),
        Mode::All => catalog.ids().map(str::to_string).collect(),
        Mode::One(id) => vec![id.clone()],
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let mut failed = Vec::new();
    pool.install(|| {
        for id in &ids {
            match convert_genome(id, &catalog, config) {
                Ok(report) if report.is_success() => {}
                Ok(_) => {
                    log::warn!("No track could be built for {id}");
                    failed.push(id.clone());
                }
                Err(e) => {
                    log::error!("{}: {}: {}", "ERROR".red().bold(), id, e);
                    failed.push(id.clone());
                }
            }
        }
    });

    if config.mode == Mode::All {
        print_summary(&config.output_dir, &failed);
    }

    Ok(RunStats {
        elapsed: start.elapsed(),
        mem_delta_mb: (max_mem_usage_mb() - start_mem).max(0.0),
        attempted: ids,
        failed,
    })
}

/// Prints `  <id>: <name>` for every catalog entry.
pub fn list_genomes(catalog: &Catalog) -> Result<()> {
    let stdout = std::io::stdout();
    write_genome_list(catalog, &mut stdout.lock())
}

fn write_genome_list<W: Write>(catalog: &Catalog, out: &mut W) -> Result<()> {
    writeln!(out, "Available genomes:")?;
    for genome in &catalog.genomes {
        writeln!(out, "  {}: {}", genome.id, genome.name)?;
    }
    Ok(())
}

fn print_summary(output_dir: &Path, failed: &[String]) {
    println!("\n{}", "=".repeat(50));
    println!("Conversion complete. Output in {}", output_dir.display());
    if !failed.is_empty() {
        println!("{}: {}", "Failed".red(), failed.join(", "));
    }
}

/// Converts one genome from GFF3 to `<id>.genes.bb` and `<id>.transcripts.bb`.
///
/// Each track is attempted independently; a track that fails is logged and
/// left out of the report. Temp files `<temp>/<id>.*` are removed once both
/// tracks were attempted, unless `config.keep_temp` is set.
///
/// # Errors
///
/// Returns an error for unknown genome ids, download failures, a GFF3 with
/// no extractable features, or I/O errors before track building starts.
pub fn convert_genome(id: &str, catalog: &Catalog, config: &Config) -> Result<GenomeReport> {
    let genome = catalog
        .find(id)
        .ok_or_else(|| Gff2BigBedError::UnknownGenome(id.to_string()))?;

    log::info!("Processing: {} ({})", genome.name, genome.id);

    std::fs::create_dir_all(&config.temp_dir)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let gff3_path = fetch_gff3(genome, &config.temp_dir)?;
    let tracks = extract_features(&gff3_path)?;
    if tracks.is_empty() {
        return Err(Gff2BigBedError::NoFeatures(gff3_path));
    }

    let chrom_sizes = write_chrom_sizes(genome, &config.temp_dir)?;
    let tool = resolve_tool(config)?;
    let ctx = TrackContext {
        tool: &tool,
        chrom_sizes: &chrom_sizes,
        temp_dir: &config.temp_dir,
        genome_id: &genome.id,
    };

    let mut report = GenomeReport::default();
    if !tracks.genes.is_empty() {
        let output = track_output(&config.output_dir, &genome.id, GENES_TRACK);
        report.genes = build_track(tracks.genes, &output, ctx, GENES_TRACK);
    }
    if !tracks.transcripts.is_empty() {
        let output = track_output(&config.output_dir, &genome.id, TRANSCRIPTS_TRACK);
        report.transcripts = build_track(tracks.transcripts, &output, ctx, TRANSCRIPTS_TRACK);
    }

    if !config.keep_temp {
        cleanup_temp(&config.temp_dir, &genome.id)?;
    }

    Ok(report)
}

/// `<output>/<id>.<track>.bb`
pub fn track_output(output_dir: &Path, genome_id: &str, track: &str) -> PathBuf {
    output_dir.join(format!("{genome_id}.{track}.bb"))
}

fn resolve_tool(config: &Config) -> Result<PathBuf> {
    match &config.bed_to_bigbed {
        Some(path) => Ok(path.clone()),
        None => ensure_tool(&config.tools_dir),
    }
}

fn build_track(
    records: Vec<Bed12>,
    output: &Path,
    ctx: TrackContext<'_>,
    track: &str,
) -> Option<TrackReport> {
    match create_bigbed(records, output, ctx, track) {
        Ok(report) => Some(report),
        Err(e) => {
            log::error!("{}: {}", "ERROR".red().bold(), e);
            None
        }
    }
}

/// Removes every `<id>.*` file directly inside `temp_dir`.
pub fn cleanup_temp(temp_dir: &Path, genome_id: &str) -> Result<()> {
    let prefix = format!("{genome_id}.");
    for entry in std::fs::read_dir(temp_dir)? {
        let entry = entry?;
        let is_match = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(&prefix));
        if is_match && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Peak resident set size of this process in MB (`ru_maxrss` is KB on
/// Linux, bytes on macOS).
fn max_mem_usage_mb() -> f64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::uninit();
        libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr());
        rusage.assume_init()
    };
    let maxrss = rusage.ru_maxrss as f64;
    if cfg!(target_os = "macos") {
        maxrss / 1024.0 / 1024.0
    } else {
        maxrss / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const CATALOG: &str = indoc! {r#"
        {
          "genomes": [
            {"id": "tair10", "name": "Arabidopsis thaliana (TAIR10)", "gff3_url": "tair10.gff3"},
            {"id": "ecoli", "name": "Escherichia coli K-12", "gff3_url": "ecoli.gff3"}
          ]
        }
    "#};

    fn config(dir: &Path, mode: Mode) -> Config {
        let catalog = dir.join("genomes.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        Config {
            mode,
            catalog,
            output_dir: dir.join("output"),
            temp_dir: dir.join("temp"),
            tools_dir: dir.join("tools"),
            bed_to_bigbed: None,
            threads: 1,
            keep_temp: false,
        }
    }

    #[test]
    fn test_genome_list_format() {
        let catalog: Catalog = serde_json::from_str(CATALOG).unwrap();
        let mut out = Vec::new();
        write_genome_list(&catalog, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {"
                Available genomes:
                  tair10: Arabidopsis thaliana (TAIR10)
                  ecoli: Escherichia coli K-12
            "}
        );
    }

    #[test]
    fn test_unknown_genome_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Mode::One("missing".to_string()));

        let catalog = Catalog::load(&config.catalog).unwrap();
        assert!(matches!(
            convert_genome("missing", &catalog, &config),
            Err(Gff2BigBedError::UnknownGenome(id)) if id == "missing"
        ));

        let stats = run(&config).unwrap();
        assert_eq!(stats.attempted, ["missing"]);
        assert_eq!(stats.failed, ["missing"]);
        assert!(!stats.is_success());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_cleanup_only_touches_genome_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["g1.gff3", "g1.chrom.sizes", "g1.genes.bed12", "g10.gff3", "other.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }

        cleanup_temp(dir.path(), "g1").unwrap();

        let mut left = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        left.sort();
        assert_eq!(left, ["g10.gff3", "other.txt"]);
    }

    #[test]
    fn test_track_output() {
        assert_eq!(
            track_output(Path::new("output"), "tair10", GENES_TRACK),
            PathBuf::from("output/tair10.genes.bb")
        );
    }

    #[test]
    fn test_genome_report_success() {
        assert!(!GenomeReport::default().is_success());
    }
}
