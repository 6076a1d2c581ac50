//! SystemTap style SDT probes. Compilers emit one `stapsdt` note (type 3) per
//! probe site into a non-allocated note section. Each note records the probe's
//! address, the address the linker expected `.stapsdt.base` to end up at, an
//! optional semaphore address, and the provider, name, and argument strings.
//!
//! Parsing happens in three passes over one image:
//! * resolver: finds `.stapsdt.base` and `.probes` and derives the constants needed
//!   to turn addresses into file offsets.
//! * scanner: walks the note sections and picks out the `stapsdt` notes.
//! * decoder: decodes each note and normalizes its addresses.
pub mod decoder;
pub mod resolver;
pub mod scanner;

pub use resolver::*;
pub use scanner::*;

use crate::elf::ElfFile;
use crate::errors::SdtError;
use std::path::Path;

/// One probe site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SdtProbe {
    /// The subsystem, e.g. "libc".
    pub provider: String,

    /// The probe within the provider, e.g. "setjmp".
    pub name: String,

    /// Argument descriptors like "-4@%eax 8@%rdx", possibly empty.
    pub args: String,

    /// File offset of the probe's instruction, independent of where the image is
    /// loaded.
    pub pc_offset: u64,

    /// File offset of the semaphore a tracer increments to enable the probe, zero if
    /// the probe has none.
    pub sem_offset: u64,
}

impl SdtProbe {
    pub fn has_semaphore(&self) -> bool {
        self.sem_offset != 0
    }
}

/// Probes in the order their notes appear in the image. Duplicates are kept.
pub type ProbeList = Vec<SdtProbe>;

/// Returns every SDT probe in the ELF file at path. An ELF file without probes is
/// not an error.
pub fn parse(path: impl AsRef<Path>) -> Result<ProbeList, SdtError> {
    let file = ElfFile::new(path)?;
    parse_elf(&file)
}

/// Like parse but for an image that's already in memory.
pub fn parse_bytes(bytes: Vec<u8>) -> Result<ProbeList, SdtError> {
    let file = ElfFile::from_bytes(bytes).map_err(|source| SdtError::NotElf {
        path: "<memory>".into(),
        source,
    })?;
    parse_elf(&file)
}

pub fn parse_elf(file: &ElfFile) -> Result<ProbeList, SdtError> {
    let context = NormalizationContext::resolve(file);
    let probes = scanner::scan_notes(file, &context)?;
    if let Some(path) = &file.path {
        log::debug!("found {} SDT probes in {}", probes.len(), path.display());
    }
    Ok(probes)
}
