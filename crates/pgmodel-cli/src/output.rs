use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// A rendered document and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Write every file atomically, in order.
pub fn write_outputs(files: &[OutputFile]) -> CliResult<()> {
    for file in files {
        write_bytes_atomic(&file.path, &file.contents)?;
        tracing::info!(
            event = "output_written",
            path = %file.path.display(),
            bytes = file.contents.len()
        );
    }
    Ok(())
}

pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> CliResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> CliResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        CliError::InvalidConfig(format!("invalid output path {}", path.display()))
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}
