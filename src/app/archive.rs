//! Release archive extraction and temporary file cleanup
//!
//! Extraction runs on the blocking pool because the zip reader is
//! synchronous. The archive handle lives only inside the blocking closure,
//! so it is closed on every exit path before control returns.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::app::models::TempArchivePath;
use crate::errors::{ArchiveError, IoError, Result};

/// Extract `archive` into `destination`, then delete the archive
///
/// The archive file is removed whatever the extraction outcome, including
/// when this future is dropped before completion; a failed removal is only
/// logged.
///
/// # Errors
///
/// Returns the extraction error, never a cleanup error.
pub async fn extract_and_clean_up(archive: TempArchivePath, destination: &Path) -> Result<()> {
    let result = extract(archive.path(), destination).await;
    drop(archive);
    result
}

/// Extract every entry of `archive` into `destination`
///
/// Creates `destination` and any intermediate directories when absent.
/// An entry whose name would escape `destination` aborts the extraction
/// with `ArchiveError::Extract`; entries before it are already written.
///
/// # Errors
///
/// Returns `IoError::CreateDir` if the destination cannot be created,
/// `ArchiveError::Open` for a missing or invalid archive and
/// `ArchiveError::Extract` if an entry cannot be written.
pub async fn extract(archive: &Path, destination: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let destination = destination.to_path_buf();

    tokio::task::spawn_blocking(move || extract_blocking(&archive, &destination))
        .await
        .map_err(|e| ArchiveError::TaskFailed {
            reason: e.to_string(),
        })?
}

fn extract_blocking(archive: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination).map_err(|source| IoError::CreateDir {
        path: destination.to_path_buf(),
        source,
    })?;

    let open_error = |source| ArchiveError::Open {
        path: archive.to_path_buf(),
        source,
    };
    let file = File::open(archive).map_err(|e| open_error(ZipError::Io(e)))?;
    let mut zip = ZipArchive::new(file).map_err(open_error)?;

    info!(
        "Extracting {} entries into {}",
        zip.len(),
        destination.display()
    );

    zip.extract(destination).map_err(|source| ArchiveError::Extract {
        path: archive.to_path_buf(),
        destination: destination.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Best-effort removal of the temporary archive
///
/// Permissions are relaxed first so a restrictive mode cannot block the
/// delete. Neither step fails the run.
pub fn clean_up(path: &Path) {
    if let Err(e) = relax_permissions(path) {
        debug!("Could not relax permissions on {}: {}", path.display(), e);
    }

    match fs::remove_file(path) {
        Ok(()) => debug!("Removed temporary archive {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Temporary archive {} already gone", path.display())
        }
        Err(e) => warn!(
            "Could not remove temporary archive {}: {}",
            path.display(),
            e
        ),
    }
}

#[cfg(unix)]
fn relax_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    use crate::constants::files::CLEANUP_PERMISSIONS;

    fs::set_permissions(path, fs::Permissions::from_mode(CLEANUP_PERMISSIONS))
}

#[cfg(not(unix))]
fn relax_permissions(path: &Path) -> std::io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

/// Round-trip a deflated entry through an in-memory archive
///
/// Proves the zip backend this binary was built with can both write and
/// read compressed entries before any download starts.
pub fn probe_support() -> std::result::Result<(), String> {
    const PROBE_NAME: &str = "probe.txt";
    const PROBE_BODY: &[u8] = b"mylar";

    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(PROBE_NAME, options)
        .map_err(|e| e.to_string())?;
    writer.write_all(PROBE_BODY).map_err(|e| e.to_string())?;
    let bytes = writer.finish().map_err(|e| e.to_string())?.into_inner();

    let mut reader = ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut entry = reader.by_name(PROBE_NAME).map_err(|e| e.to_string())?;
    let mut body = Vec::new();
    entry.read_to_end(&mut body).map_err(|e| e.to_string())?;

    if body == PROBE_BODY {
        Ok(())
    } else {
        Err("deflate round-trip produced different bytes".to_string())
    }
}

/// Paths of every regular file under `root`, relative to it
#[cfg(test)]
pub(crate) fn list_files(root: &Path) -> Vec<std::path::PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<std::path::PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}

/// Build a zip archive in memory from `(name, body)` pairs
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
