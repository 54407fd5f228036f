//! Program images as read from disk, validated before they reach memory.
use std::{fmt, fs, path::Path};

use crate::memory::PROGRAM_MAX_SIZE;
use crate::{Error, Result};

/// Everything from `0x200` to the end of memory.
pub const MAX_ROM_SIZE: usize = PROGRAM_MAX_SIZE;

/// A raw, headerless CHIP-8 program that is known to fit in memory.
#[derive(Clone)]
pub struct Rom {
    name: String,
    program: Vec<u8>,
}

impl Rom {
    /// # Errors
    /// [`Error::EmptyRom`] or [`Error::RomTooLarge`].
    pub fn from_bytes(name: impl Into<String>, program: &[u8]) -> Result<Self> {
        match program.len() {
            0 => Err(Error::EmptyRom),
            len if len > MAX_ROM_SIZE => Err(Error::RomTooLarge(len)),
            _ => Ok(Self {
                name: name.into(),
                program: program.to_vec(),
            }),
        }
    }

    /// Read a rom from disk. It is named after the file.
    ///
    /// # Errors
    /// [`Error::RomUnreadable`] if the file cannot be read, otherwise the
    /// same errors as [`Rom::from_bytes`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let program = fs::read(path)
            .map_err(|err| Error::RomUnreadable(format!("{}: {}", path.display(), err)))?;
        let name = match path.file_name() {
            Some(file_name) => file_name.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        Self::from_bytes(name, &program)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.program
    }
}

impl fmt::Debug for Rom {
    /// Name, size and a short prefix. Full roms are too noisy for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.program[..self.program.len().min(6)];
        write!(
            f,
            "{} ({} bytes): {:02X?}",
            self.name,
            self.program.len(),
            head
        )
    }
}
