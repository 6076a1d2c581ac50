//! Error types. `ElfError` is for the image itself, `DecodeError` for a single SDT
//! note and `SdtError` is what callers of the parse functions see.
use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElfError {
    #[error("image is much too small to be an ELF file ({0} bytes)")]
    TooSmall(usize),

    #[error("not an ELF file (bad magic)")]
    BadMagic,

    #[error("bad ELF class: {0}")]
    BadClass(u8),

    #[error("bad ELF data encoding: {0}")]
    BadEncoding(u8),

    #[error("bad ELF version: {0}")]
    BadVersion(u8),

    #[error("bad ELF type {0}: not a relocatable, exe, shared lib, or core")]
    BadType(u16),

    #[error("read of {size} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, size: usize },

    #[error("string at offset {0} is not NUL terminated")]
    UnterminatedString(usize),

    #[error("note at offset {offset} needs {needed} bytes but only {available} remain")]
    NoteOverrun {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Reasons an individual `stapsdt` note is rejected.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("description is {len} bytes but the address triple needs {needed}")]
    TooShort { len: usize, needed: usize },

    #[error("{0} string is not NUL terminated")]
    Unterminated(&'static str),

    #[error("{0} string is empty")]
    Empty(&'static str),

    #[error("out of memory copying probe strings")]
    OutOfMemory(#[from] TryReserveError),
}

#[derive(Error, Debug)]
pub enum SdtError {
    #[error("couldn't open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("{}: {source}", path.display())]
    NotElf { path: PathBuf, source: ElfError },

    #[error("out of memory while building probe list")]
    OutOfMemory(#[from] TryReserveError),
}

impl SdtError {
    /// True for the failures that mean the image couldn't be accessed at all.
    pub fn is_open_error(&self) -> bool {
        matches!(self, SdtError::Open { .. } | SdtError::NotElf { .. })
    }
}
