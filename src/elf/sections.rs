//! Section headers. SDT probes live entirely in sections: the notes themselves in a
//! non-allocated SHT_NOTE section and the address anchors in `.stapsdt.base` and
//! `.probes`.
use super::{Bytes, Offset, Reader, VirtualAddr};
use crate::errors::ElfError;

pub const WRITE_FLAG: u64 = 1 << 0; // Writable
pub const ALLOC_FLAG: u64 = 1 << 1; // Occupies memory during execution

/// Describes a section.
#[derive(Clone, Debug)]
pub struct SectionHeader {
    // Elf32_Shdr or Elf64_Shdr, see
    // https://gist.github.com/x0nu11byt3/bcb35c3de461e5fb66173071a2379779
    /// Index into the section name string table. Zero means no name.
    pub name: u32,

    /// Type of the section.
    pub stype: SectionType,

    /// Write, alloc, and/or exec.
    pub flags: u64,

    /// Addressing for the bytes in the section using offsets from the start of the ELF file.
    pub obytes: Bytes<Offset>,

    /// Addressing for the bytes in the section using virtual addresses once loaded.
    pub vbytes: Bytes<VirtualAddr>,

    /// Link to another section with related information, usually a string
    /// or symbol table.
    pub link: u32,

    /// Additional section info.
    pub info: u32,

    /// Section alignment.
    pub align: u64,

    /// Set if the section holds a table of entries.
    pub entry_size: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SectionType {
    /// Uninitialized data.
    NoBits,

    /// Arbitrary metadata, including SDT probe descriptors.
    Note,

    /// CPU instructions or constant data.
    ProgBits,

    /// Anything else. Only the types above matter when looking for probes.
    Other(u32),
}

impl SectionType {
    pub fn from_u32(value: u32) -> Self {
        // see https://android.googlesource.com/platform/art/+/e34fa1d/runtime/elf.h
        match value {
            0x1 => SectionType::ProgBits,
            0x7 => SectionType::Note,
            0x8 => SectionType::NoBits,
            _ => SectionType::Other(value),
        }
    }
}

impl SectionHeader {
    pub fn new(reader: &Reader, offset: usize) -> Result<Self, ElfError> {
        // The two layouts only differ in which fields are address sized.
        let mut s = reader.stream(offset);
        let name = s.read_word()?;
        let stype = SectionType::from_u32(s.read_word()?);
        let flags = s.read_xword_or_word()?;
        let vaddr = s.read_addr()?;
        let offset = s.read_offset()?;
        let size = s.read_xword_or_word()?;
        let link = s.read_word()?;
        let info = s.read_word()?;
        let align = s.read_xword_or_word()?;
        let entry_size = s.read_xword_or_word()?;
        Ok(SectionHeader {
            name,
            stype,
            flags,
            obytes: Bytes::<Offset>::from_raw(offset, size),
            vbytes: Bytes::<VirtualAddr>::from_raw(vaddr, size),
            link,
            info,
            align,
            entry_size,
        })
    }

    /// True if the section is loaded into memory at run time.
    pub fn is_alloc(&self) -> bool {
        self.flags & ALLOC_FLAG != 0
    }

    pub fn vaddr(&self) -> u64 {
        self.vbytes.start.0
    }

    pub fn offset(&self) -> u64 {
        self.obytes.start.0
    }
}
