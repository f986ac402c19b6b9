use crate::bed::Bed12;
use crate::catalog::ChromSizes;
use crate::error::{Gff2BigBedError, Result};
use crate::fetch::download;
use colored::Colorize;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const TOOL_NAME: &str = "bedToBigBed";
const TOOL_BASE_URL: &str = "https://hgdownload.soe.ucsc.edu/admin/exe";

/// Outcome of a BED12 -> BigBed conversion.
#[derive(Debug, Clone)]
pub struct TrackReport {
    pub output: PathBuf,
    /// Records handed to bedToBigBed.
    pub written: usize,
    /// Records dropped by the bounds filter.
    pub dropped: usize,
    /// Size of the .bb file in bytes.
    pub size: u64,
}

/// UCSC download directory name for the running platform.
///
/// # Errors
///
/// Returns [`Gff2BigBedError::UnsupportedPlatform`] for anything but macOS
/// and Linux.
pub fn platform_dir(os: &str, arch: &str) -> Result<&'static str> {
    match (os, arch) {
        ("macos", "aarch64") => Ok("macOSX.arm64"),
        ("macos", _) => Ok("macOSX.x86_64"),
        ("linux", _) => Ok("linux.x86_64"),
        _ => Err(Gff2BigBedError::UnsupportedPlatform(format!("{os}/{arch}"))),
    }
}

/// Returns the path to bedToBigBed in `tools_dir`, downloading it on first use.
pub fn ensure_tool(tools_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(tools_dir)?;

    let tool_path = tools_dir.join(TOOL_NAME);
    if tool_path.exists() {
        return Ok(tool_path);
    }

    let platform = platform_dir(std::env::consts::OS, std::env::consts::ARCH)?;
    let url = format!("{TOOL_BASE_URL}/{platform}/{TOOL_NAME}");
    log::info!("Downloading {TOOL_NAME} from {url}");
    download(&url, &tool_path)?;
    make_executable(&tool_path)?;

    Ok(tool_path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Sorts records the way bedToBigBed expects (`LC_ALL=C sort -k1,1 -k2,2n`).
///
/// Ties on start are broken by end and name so output is deterministic.
pub fn sort_records(records: &mut [Bed12]) {
    records.par_sort_unstable_by(|a, b| {
        a.chr
            .as_bytes()
            .cmp(b.chr.as_bytes())
            .then(a.start.cmp(&b.start))
            .then(a.end.cmp(&b.end))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Drops records on chromosomes absent from `sizes` or running past their end.
/// Returns the number of records removed.
pub fn filter_in_bounds(records: &mut Vec<Bed12>, sizes: &ChromSizes) -> usize {
    let before = records.len();
    records.retain(|record| sizes.contains(&record.chr, record.end));
    before - records.len()
}

/// Writes records as tab-separated BED12, one per line.
pub fn write_bed(path: &Path, records: &[Bed12]) -> Result<()> {
    let mut writer = BufWriter::with_capacity(256 * 1024, File::create(path)?);
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()?;
    Ok(())
}

/// `1.5 MB` above one MiB, `12.3 KB` otherwise.
pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if bytes > 1024 * 1024 {
        format!("{:.1} MB", kb / 1024.0)
    } else {
        format!("{kb:.1} KB")
    }
}

/// Paths and names shared by both tracks of a genome.
#[derive(Debug, Clone, Copy)]
pub struct TrackContext<'a> {
    pub tool: &'a Path,
    pub chrom_sizes: &'a Path,
    pub temp_dir: &'a Path,
    pub genome_id: &'a str,
}

/// Sorts, bounds-filters and converts one track to BigBed.
///
/// The intermediate BED12 is written to `<temp>/<id>.<track>.bed12` and
/// handed to `bedToBigBed -type=bed12 -tab`.
///
/// # Arguments
///
/// * `records` - BED12 records of the track, in any order
/// * `output` - Destination .bb path
/// * `ctx` - Converter, chrom.sizes and naming shared across tracks
/// * `track` - Track name, `genes` or `transcripts`
///
/// # Errors
///
/// Returns [`Gff2BigBedError::EmptyTrack`] when no record survives,
/// [`Gff2BigBedError::ToolFailed`] when bedToBigBed exits non-zero,
/// and I/O errors.
///
/// # Example
///
/// ```rust, ignore
/// let report = create_bigbed(tracks.genes, Path::new("output/tair10.genes.bb"), ctx, "genes")?;
/// println!("{} records", report.written);
/// ```
pub fn create_bigbed(
    mut records: Vec<Bed12>,
    output: &Path,
    ctx: TrackContext<'_>,
    track: &str,
) -> Result<TrackReport> {
    if records.is_empty() {
        return Err(Gff2BigBedError::EmptyTrack(track.to_string()));
    }

    sort_records(&mut records);

    let sizes = ChromSizes::read(ctx.chrom_sizes)?;
    let dropped = filter_in_bounds(&mut records, &sizes);
    if dropped > 0 {
        log::warn!("Dropped {dropped} {track} records outside chromosome bounds");
    }
    if records.is_empty() {
        return Err(Gff2BigBedError::EmptyTrack(track.to_string()));
    }

    let bed_path = ctx
        .temp_dir
        .join(format!("{}.{}.bed12", ctx.genome_id, track));
    write_bed(&bed_path, &records)?;

    log::info!("Creating BigBed: {}", output.display());
    let result = Command::new(ctx.tool)
        .arg("-type=bed12")
        .arg("-tab")
        .arg(&bed_path)
        .arg(ctx.chrom_sizes)
        .arg(output)
        .output()?;

    if !result.status.success() {
        return Err(Gff2BigBedError::ToolFailed {
            status: result.status.to_string(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    let size = std::fs::metadata(output)?.len();
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::info!(
        "{}: Created {} ({})",
        "SUCCESS".green().bold(),
        name,
        format_size(size)
    );

    Ok(TrackReport {
        output: output.to_path_buf(),
        written: records.len(),
        dropped,
        size,
    })
}
