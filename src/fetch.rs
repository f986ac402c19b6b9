use crate::catalog::Genome;
use crate::detect::{detect_source_kind, Compression, Location};
use crate::error::{Gff2BigBedError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Path of the cached, uncompressed GFF3 for `genome`.
pub fn gff3_cache_path(genome: &Genome, temp_dir: &Path) -> PathBuf {
    temp_dir.join(format!("{}.gff3", genome.id))
}

/// Returns a local, uncompressed copy of the genome's GFF3.
///
/// A previous download in `temp_dir` is reused as is. Otherwise the
/// catalog source is fetched; gzip sources are stored as `<id>.gff3.gz`,
/// inflated to `<id>.gff3` and the compressed copy removed.
///
/// # Errors
///
/// Returns an error on transport failures, non-2xx responses, or I/O errors.
pub fn fetch_gff3(genome: &Genome, temp_dir: &Path) -> Result<PathBuf> {
    let gff3_path = gff3_cache_path(genome, temp_dir);
    if gff3_path.exists() {
        log::info!("Using cached GFF3: {}", gff3_path.display());
        return Ok(gff3_path);
    }

    log::info!("Downloading GFF3...");
    let kind = detect_source_kind(&genome.gff3_url);
    match kind.compression {
        Compression::Gzip => {
            let compressed = temp_dir.join(format!("{}.gff3.gz", genome.id));
            fetch_to(&kind.location, &compressed)?;
            gunzip(&compressed, &gff3_path)?;
            std::fs::remove_file(&compressed)?;
        }
        Compression::None => fetch_to(&kind.location, &gff3_path)?,
    }

    Ok(gff3_path)
}

/// Copies a remote or local source to `dest`.
pub fn fetch_to(location: &Location, dest: &Path) -> Result<()> {
    match location {
        Location::Remote(url) => download(url, dest),
        Location::Local(path) => {
            log::debug!("Copying {} to {}", path.display(), dest.display());
            write_atomically(dest, |writer| {
                let mut reader = BufReader::new(File::open(path)?);
                std::io::copy(&mut reader, writer)?;
                Ok(())
            })
        }
    }
}

/// Blocking HTTP GET of `url` into `dest`.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    log::debug!("GET {url}");
    let mut response = reqwest::blocking::get(url)?;

    if !response.status().is_success() {
        return Err(Gff2BigBedError::Http {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    write_atomically(dest, |writer| {
        response.copy_to(writer)?;
        Ok(())
    })
}

/// Inflates a gzip file. Multi-member (bgzip) files are read to the end.
pub fn gunzip(src: &Path, dest: &Path) -> Result<()> {
    write_atomically(dest, |writer| {
        let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(src)?));
        std::io::copy(&mut decoder, writer)?;
        Ok(())
    })
}

/// Writes through a temp file next to `dest` and renames it into place,
/// so `dest` only ever exists complete.
fn write_atomically<F>(dest: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::with_capacity(256 * 1024, tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(dest)?;
    Ok(())
}
