use crate::errors::ElfError;
use crate::utils;
use memmap2::Mmap;
use std::ops::Deref;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const EI_NIDENT: usize = 16;

/// The raw bytes of an ELF image, either mapped from a file or owned.
pub enum Image {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Image {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Image::Mapped(map) => map,
            Image::Owned(bytes) => bytes,
        }
    }
}

/// Byte order and word size of an image. All multi-byte reads go through this so
/// that 32-bit and big endian files need no special casing elsewhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Encoding {
    pub little_endian: bool,
    pub sixty_four_bit: bool,
}

impl Encoding {
    /// Size of an Elf32_Addr or Elf64_Addr.
    pub fn addr_size(self) -> usize {
        if self.sixty_four_bit { 8 } else { 4 }
    }

    pub fn read_half(self, bytes: &[u8], offset: usize) -> Result<u16, ElfError> {
        let raw = array(bytes, offset)?;
        if self.little_endian {
            Ok(u16::from_le_bytes(raw))
        } else {
            Ok(u16::from_be_bytes(raw))
        }
    }

    pub fn read_word(self, bytes: &[u8], offset: usize) -> Result<u32, ElfError> {
        let raw = array(bytes, offset)?;
        if self.little_endian {
            Ok(u32::from_le_bytes(raw))
        } else {
            Ok(u32::from_be_bytes(raw))
        }
    }

    pub fn read_xword(self, bytes: &[u8], offset: usize) -> Result<u64, ElfError> {
        let raw = array(bytes, offset)?;
        if self.little_endian {
            Ok(u64::from_le_bytes(raw))
        } else {
            Ok(u64::from_be_bytes(raw))
        }
    }

    /// Read either a u32 or u64 word depending on whether the image is 64-bit.
    /// But, for sanity, always return the result as 64 bits.
    pub fn read_addr(self, bytes: &[u8], offset: usize) -> Result<u64, ElfError> {
        if self.sixty_four_bit {
            self.read_xword(bytes, offset)
        } else {
            Ok(self.read_word(bytes, offset)? as u64)
        }
    }
}

fn array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], ElfError> {
    offset
        .checked_add(N)
        .and_then(|end| bytes.get(offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(ElfError::OutOfBounds { offset, size: N })
}

pub struct Reader {
    pub encoding: Encoding,
    bytes: Image,
}

impl Reader {
    /// Checks the identification bytes and the file type. Everything past the header
    /// is read lazily and bounds checked so damaged files fail softly.
    pub fn new(bytes: Image) -> Result<Self, ElfError> {
        // see https://en.wikipedia.org/wiki/Executable_and_Linkable_Format
        utils::require(bytes.len() >= EI_NIDENT, ElfError::TooSmall(bytes.len()))?;
        utils::require(bytes[0..4] == ELF_MAGIC, ElfError::BadMagic)?;

        let ei_class = bytes[0x04];
        let ei_data = bytes[0x05];
        let ei_version = bytes[0x06];
        utils::require(ei_class == 1 || ei_class == 2, ElfError::BadClass(ei_class))?;
        utils::require(ei_data == 1 || ei_data == 2, ElfError::BadEncoding(ei_data))?;
        utils::require(ei_version == 1, ElfError::BadVersion(ei_version))?;

        let encoding = Encoding {
            little_endian: ei_data == 1,
            sixty_four_bit: ei_class == 2,
        };
        let header_size = if encoding.sixty_four_bit { 64 } else { 52 };
        utils::require(bytes.len() >= header_size, ElfError::TooSmall(bytes.len()))?;

        let e_type = encoding.read_half(&bytes, 0x10)?;
        utils::require((1..=4).contains(&e_type), ElfError::BadType(e_type))?;

        Ok(Reader { encoding, bytes })
    }

    pub fn slice(&self, offset: usize, size: usize) -> Result<&[u8], ElfError> {
        offset
            .checked_add(size)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(ElfError::OutOfBounds { offset, size })
    }

    pub fn stream(&self, offset: usize) -> Stream<'_> {
        Stream::new(&self.bytes, self.encoding, offset)
    }
}

/// Sequential reads over a byte slice, which may be the whole image or just the
/// contents of one section or note.
pub struct Stream<'a> {
    bytes: &'a [u8],
    encoding: Encoding,
    pub offset: usize,
}

impl<'a> Stream<'a> {
    pub fn new(bytes: &'a [u8], encoding: Encoding, offset: usize) -> Self {
        Stream {
            bytes,
            encoding,
            offset,
        }
    }

    /// Everything the stream can read, regardless of the current offset.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn read_half(&mut self) -> Result<u16, ElfError> {
        let half = self.encoding.read_half(self.bytes, self.offset)?;
        self.offset += 2;
        Ok(half)
    }

    pub fn read_word(&mut self) -> Result<u32, ElfError> {
        let word = self.encoding.read_word(self.bytes, self.offset)?;
        self.offset += 4;
        Ok(word)
    }

    pub fn read_xword(&mut self) -> Result<u64, ElfError> {
        let xword = self.encoding.read_xword(self.bytes, self.offset)?;
        self.offset += 8;
        Ok(xword)
    }

    pub fn read_addr(&mut self) -> Result<u64, ElfError> {
        let addr = self.encoding.read_addr(self.bytes, self.offset)?;
        self.offset += self.encoding.addr_size();
        Ok(addr)
    }

    /// Offsets are the same width as addresses.
    pub fn read_offset(&mut self) -> Result<u64, ElfError> {
        self.read_addr()
    }

    /// Fields like sh_flags and sh_size are 32 bits in ELF32 and 64 bits in ELF64.
    pub fn read_xword_or_word(&mut self) -> Result<u64, ElfError> {
        if self.encoding.sixty_four_bit {
            self.read_xword()
        } else {
            Ok(self.read_word()? as u64)
        }
    }

    /// Read a NUL-terminated string. The terminator is consumed but not returned.
    pub fn read_cstr(&mut self) -> Result<&'a [u8], ElfError> {
        let rest = self
            .bytes
            .get(self.offset..)
            .ok_or(ElfError::UnterminatedString(self.offset))?;
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(ElfError::UnterminatedString(self.offset))?;
        self.offset += len + 1;
        Ok(&rest[..len])
    }
}
