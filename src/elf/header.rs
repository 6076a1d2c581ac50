//! The ELF file header (Elf32_Ehdr or Elf64_Ehdr). Only the fields needed to find the
//! section table are kept.
use super::Reader;
use crate::errors::ElfError;

/// e_shstrndx value meaning the real index lives in section 0's sh_link.
pub const SHN_XINDEX: u16 = 0xffff;

#[derive(Clone, Debug)]
pub struct ElfHeader {
    /// Relocatable, executable, shared object, or core.
    pub etype: u16,

    /// Offset in the file to the section header table, zero if there isn't one.
    pub section_offset: u64,

    /// Size of one section header entry.
    pub section_entry_size: u16,

    /// Number of section header entries. Zero with a non-zero section_offset means
    /// the real count is in section 0's sh_size.
    pub num_section_entries: u16,

    /// Section index of the section name string table.
    pub string_table_index: u16,
}

impl ElfHeader {
    pub fn new(reader: &Reader) -> Result<Self, ElfError> {
        let mut s = reader.stream(0x10);
        let etype = s.read_half()?;
        let _machine = s.read_half()?;
        let _version = s.read_word()?;
        let _entry = s.read_addr()?;
        let _ph_offset = s.read_offset()?;
        let section_offset = s.read_offset()?;
        let _flags = s.read_word()?;
        let _header_size = s.read_half()?;
        let _ph_entry_size = s.read_half()?;
        let _num_ph_entries = s.read_half()?;
        let section_entry_size = s.read_half()?;
        let num_section_entries = s.read_half()?;
        let string_table_index = s.read_half()?;
        Ok(ElfHeader {
            etype,
            section_offset,
            section_entry_size,
            num_section_entries,
            string_table_index,
        })
    }
}
