//! An opened ELF image plus its section table.
use super::{ElfHeader, Image, Notes, Reader, SHN_XINDEX, SectionHeader, SectionType};
use crate::errors::{ElfError, SdtError};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct ElfFile {
    pub header: ElfHeader,
    pub path: Option<PathBuf>,
    pub reader: Reader,
    sections: Vec<SectionHeader>,
    string_table_index: usize,
}

impl ElfFile {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SdtError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SdtError::Open {
            path: path.clone(),
            source,
        })?;

        // This is unsafe because it has undefined behavior if the underlying file is
        // modified while the memory map is in use.
        let bytes = unsafe { Mmap::map(&file) }.map_err(|source| SdtError::Open {
            path: path.clone(),
            source,
        })?;
        match ElfFile::from_image(Image::Mapped(bytes)) {
            Ok(mut file) => {
                file.path = Some(path);
                Ok(file)
            }
            Err(source) => Err(SdtError::NotElf { path, source }),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ElfError> {
        ElfFile::from_image(Image::Owned(bytes))
    }

    fn from_image(image: Image) -> Result<Self, ElfError> {
        let reader = Reader::new(image)?;
        let header = ElfHeader::new(&reader)?;
        let sections = ElfFile::load_sections(&reader, &header);
        let string_table_index = match (header.string_table_index, sections.first()) {
            (SHN_XINDEX, Some(first)) => first.link as usize,
            (index, _) => index as usize,
        };
        Ok(ElfFile {
            header,
            path: None,
            reader,
            sections,
            string_table_index,
        })
    }

    /// Section headers in table order, including the null section at index 0.
    pub fn sections(&self) -> &[SectionHeader] {
        &self.sections
    }

    /// Returns the section's name from the section name string table.
    pub fn section_name(&self, section: &SectionHeader) -> Option<&str> {
        let table = self.sections.get(self.string_table_index)?;
        let strings = match self.section_data(table) {
            Ok(strings) => strings,
            Err(err) => {
                log::warn!("couldn't read section name table: {err}");
                return None;
            }
        };
        let start = strings.get(section.name as usize..)?;
        let len = start.iter().position(|&b| b == 0)?;
        std::str::from_utf8(&start[..len]).ok()
    }

    pub fn find_section(&self, name: &str) -> Option<&SectionHeader> {
        self.sections
            .iter()
            .find(|s| self.section_name(s) == Some(name))
    }

    /// The bytes of a section. SHT_NOBITS sections occupy no file space so these
    /// return an empty slice.
    pub fn section_data(&self, section: &SectionHeader) -> Result<&[u8], ElfError> {
        if section.stype == SectionType::NoBits {
            return Ok(&[]);
        }
        let offset = usize::try_from(section.offset()).map_err(|_| ElfError::OutOfBounds {
            offset: usize::MAX,
            size: 0,
        })?;
        let size = usize::try_from(section.obytes.size).map_err(|_| ElfError::OutOfBounds {
            offset,
            size: usize::MAX,
        })?;
        self.reader.slice(offset, size)
    }

    /// The note records in a section.
    pub fn notes<'a>(&'a self, section: &SectionHeader) -> Result<Notes<'a>, ElfError> {
        let bytes = self.section_data(section)?;
        Ok(Notes::new(bytes, self.reader.encoding, section.align))
    }
}

impl ElfFile {
    fn load_sections(reader: &Reader, header: &ElfHeader) -> Vec<SectionHeader> {
        let mut sections = Vec::new();
        if header.section_offset == 0 {
            return sections;
        }
        let Ok(mut offset) = usize::try_from(header.section_offset) else {
            log::warn!("section table offset {} is out of range", header.section_offset);
            return sections;
        };
        let min_entry_size = if reader.encoding.sixty_four_bit { 64 } else { 40 };
        if (header.section_entry_size as usize) < min_entry_size {
            log::warn!("bad section header size: {}", header.section_entry_size);
            return sections;
        }

        let mut count = header.num_section_entries as u64;
        if count == 0 {
            // Extended numbering: the count is in section 0's sh_size.
            match SectionHeader::new(reader, offset) {
                Ok(first) => count = first.obytes.size,
                Err(err) => {
                    log::warn!("failed to read section header at {offset}: {err}");
                    return sections;
                }
            }
        }

        for _ in 0..count {
            match SectionHeader::new(reader, offset) {
                Ok(h) => sections.push(h),

                // Later entries are no better off and skipping one would shift the
                // indices the string table lookup depends on.
                Err(err) => {
                    log::warn!("failed to read section header at {offset}: {err}");
                    break;
                }
            }
            offset = offset.saturating_add(header.section_entry_size as usize);
        }
        sections
    }
}
