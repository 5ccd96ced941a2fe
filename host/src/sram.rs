use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use handheld_asteroids_core::save::{check_range, SRAM_SIZE};
use handheld_asteroids_core::{SaveError, Sram};
use tracing::{debug, warn};

/// Save memory backed by a 32 KiB file. A missing or short file is padded
/// with 0xFF, the contents of a blank cartridge.
#[derive(Debug)]
pub struct FileSram {
    path: PathBuf,
    file: File,
}

impl FileSram {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("failed to open sram file: {}", path.display()))?;

        let len = file
            .metadata()
            .with_context(|| format!("failed to stat sram file: {}", path.display()))?
            .len() as usize;
        if len < SRAM_SIZE {
            debug!(path = %path.display(), len, "padding sram file");
            file.seek(SeekFrom::Start(len as u64))?;
            file.write_all(&vec![0xFF; SRAM_SIZE - len])
                .with_context(|| format!("failed to initialise sram file: {}", path.display()))?;
            file.flush()?;
        }

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn medium_error(&self, op: &'static str, offset: usize, err: io::Error) -> SaveError {
        warn!(path = %self.path.display(), op, offset, %err, "sram i/o failed");
        SaveError::Medium
    }
}

impl Sram for FileSram {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), SaveError> {
        check_range(offset, buf.len())?;
        self.file
            .seek(SeekFrom::Start(offset as u64))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|err| self.medium_error("read", offset, err))
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), SaveError> {
        check_range(offset, data.len())?;
        self.file
            .seek(SeekFrom::Start(offset as u64))
            .and_then(|_| self.file.write_all(data))
            .and_then(|_| self.file.flush())
            .map_err(|err| self.medium_error("write", offset, err))
    }
}
