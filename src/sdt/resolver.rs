//! Finds `.stapsdt.base` and `.probes` and turns them into the constants used to
//! convert probe addresses into file offsets.
use crate::elf::{ElfFile, SectionType};

pub const STAPSDT_BASE_SECTION: &str = ".stapsdt.base";
pub const PROBES_SECTION: &str = ".probes";

/// Constants for one image, computed before any note is decoded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NormalizationContext {
    /// Virtual address of `.stapsdt.base`.
    pub base_addr: u64,

    /// File offset of `.stapsdt.base`, zero if the section is missing.
    pub base_file_offset: u64,

    /// How much further `.probes` is displaced from its file offset than
    /// `.stapsdt.base` is. Semaphores live in `.probes`. Zero if there is no
    /// `.probes` section.
    pub probes_virtual_offset: u64,
}

impl NormalizationContext {
    /// Missing sections are fine: the image may simply have no probes.
    pub fn resolve(file: &ElfFile) -> Self {
        let mut base = None;
        let mut probes = None;

        // Later sections win if a name is repeated.
        for section in file.sections().iter().skip(1) {
            if section.stype != SectionType::ProgBits || !section.is_alloc() {
                continue;
            }
            match file.section_name(section) {
                Some(STAPSDT_BASE_SECTION) => base = Some((section.vaddr(), section.offset())),
                Some(PROBES_SECTION) => probes = Some((section.vaddr(), section.offset())),
                _ => (),
            }
        }

        let (base_addr, base_file_offset) = base.unwrap_or((0, 0));
        let probes_virtual_offset = match probes {
            Some((addr, offset)) => addr
                .wrapping_sub(offset)
                .wrapping_sub(base_addr.wrapping_sub(base_file_offset)),
            None => 0,
        };
        let context = NormalizationContext {
            base_addr,
            base_file_offset,
            probes_virtual_offset,
        };
        log::debug!("SDT normalization: {context:x?}");
        context
    }

    /// `pc_raw` was encoded assuming `.stapsdt.base` would be at `base_ref`.
    pub fn pc_offset(&self, pc_raw: u64, base_ref: u64) -> u64 {
        pc_raw
            .wrapping_add(self.base_file_offset)
            .wrapping_sub(base_ref)
    }

    /// Zero means no semaphore and stays zero.
    pub fn sem_offset(&self, sem_raw: u64, base_ref: u64) -> u64 {
        if sem_raw == 0 {
            return 0;
        }
        sem_raw
            .wrapping_add(self.base_file_offset)
            .wrapping_sub(base_ref)
            .wrapping_sub(self.probes_virtual_offset)
    }
}
