//! Timestamped copies of save files taken before a run touches them.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::report::Reporter;
use crate::timestamp::file_timestamp;

/// Copy every file in `files` into `backup_dir` as `<stem>_<timestamp>.<ext>`.
///
/// Existing backups are never overwritten; a name that is already taken
/// gets a numeric suffix (`<stem>_<timestamp>_1.<ext>`). Returns the paths
/// written.
pub fn backup_files(
    files: &[PathBuf],
    backup_dir: &Path,
    reporter: &dyn Reporter,
) -> io::Result<Vec<PathBuf>> {
    backup_files_at(files, backup_dir, &file_timestamp(), reporter)
}

/// Like [`backup_files`] with an explicit timestamp.
pub fn backup_files_at(
    files: &[PathBuf],
    backup_dir: &Path,
    timestamp: &str,
    reporter: &dyn Reporter,
) -> io::Result<Vec<PathBuf>> {
    reporter.info("Backing up game data...");
    reporter.debug(&format!("Writing to {}", backup_dir.display()));
    fs::create_dir_all(backup_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = copy_new(file, backup_dir, timestamp)?;
        reporter.debug(&format!("{} -> {}", file.display(), target.display()));
        written.push(target);
    }
    Ok(written)
}

/// Copy `file` into the first free backup name in `backup_dir`.
fn copy_new(file: &Path, backup_dir: &Path, timestamp: &str) -> io::Result<PathBuf> {
    let mut source = File::open(file)?;
    let mut attempt = 0u32;
    loop {
        let tag = match attempt {
            0 => timestamp.to_string(),
            n => format!("{}_{}", timestamp, n),
        };
        let target = backup_dir.join(backup_name(file, &tag));
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(mut dest) => {
                io::copy(&mut source, &mut dest)?;
                dest.sync_all()?;
                return Ok(target);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

fn backup_name(file: &Path, timestamp: &str) -> String {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    match file.extension() {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, timestamp),
    }
}
