//! Builds small synthetic ELF images for the unit tests.
use crate::elf::{ALLOC_FLAG, Encoding};

pub const SHT_PROGBITS: u32 = 1;
pub const SHT_NOTE: u32 = 7;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn put_half(buf: &mut Vec<u8>, encoding: Encoding, value: u16) {
    if encoding.little_endian {
        buf.extend(value.to_le_bytes());
    } else {
        buf.extend(value.to_be_bytes());
    }
}

pub fn put_word(buf: &mut Vec<u8>, encoding: Encoding, value: u32) {
    if encoding.little_endian {
        buf.extend(value.to_le_bytes());
    } else {
        buf.extend(value.to_be_bytes());
    }
}

pub fn put_xword(buf: &mut Vec<u8>, encoding: Encoding, value: u64) {
    if encoding.little_endian {
        buf.extend(value.to_le_bytes());
    } else {
        buf.extend(value.to_be_bytes());
    }
}

/// Writes a 4 or 8 byte value depending on the class.
pub fn put_addr(buf: &mut Vec<u8>, encoding: Encoding, value: u64) {
    if encoding.sixty_four_bit {
        put_xword(buf, encoding, value);
    } else {
        put_word(buf, encoding, value as u32);
    }
}

fn pad(buf: &mut Vec<u8>, align: usize) {
    while buf.len() % align != 0 {
        buf.push(0);
    }
}

/// One note record with 4-byte padding. An empty name is written with namesz 0.
pub fn note(encoding: Encoding, name: &[u8], ntype: u32, desc: &[u8]) -> Vec<u8> {
    aligned_note(encoding, name, ntype, desc, 4)
}

pub fn aligned_note(
    encoding: Encoding,
    name: &[u8],
    ntype: u32,
    desc: &[u8],
    align: usize,
) -> Vec<u8> {
    let namesz = if name.is_empty() { 0 } else { name.len() + 1 };
    let mut buf = Vec::new();
    put_word(&mut buf, encoding, namesz as u32);
    put_word(&mut buf, encoding, desc.len() as u32);
    put_word(&mut buf, encoding, ntype);
    if !name.is_empty() {
        buf.extend(name);
        buf.push(0);
    }
    pad(&mut buf, align);
    buf.extend(desc);
    pad(&mut buf, align);
    buf
}

/// The description of a stapsdt note: pc, base, and semaphore followed by the
/// provider, name, and argument strings.
pub fn sdt_desc(
    encoding: Encoding,
    pc: u64,
    base: u64,
    sem: u64,
    strings: [&str; 3],
) -> Vec<u8> {
    let mut desc = Vec::new();
    put_addr(&mut desc, encoding, pc);
    put_addr(&mut desc, encoding, base);
    put_addr(&mut desc, encoding, sem);
    for s in strings {
        desc.extend(s.as_bytes());
        desc.push(0);
    }
    desc
}

pub fn sdt_note(
    encoding: Encoding,
    pc: u64,
    base: u64,
    sem: u64,
    strings: [&str; 3],
) -> Vec<u8> {
    note(encoding, b"stapsdt", 3, &sdt_desc(encoding, pc, base, sem, strings))
}

struct TestSection {
    name: String,
    stype: u32,
    flags: u64,
    addr: u64,
    align: u64,
    contents: Contents,
}

enum Contents {
    Data(Vec<u8>),

    /// Header only: claims one byte at this file offset.
    At(u64),
}

/// Lays out the ELF header, then section contents, then .shstrtab, and finally the
/// section header table.
pub struct ElfBuilder {
    encoding: Encoding,
    sections: Vec<TestSection>,
}

impl ElfBuilder {
    pub fn new(little_endian: bool, sixty_four_bit: bool) -> Self {
        ElfBuilder {
            encoding: Encoding {
                little_endian,
                sixty_four_bit,
            },
            sections: Vec::new(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn section(
        mut self,
        name: &str,
        stype: u32,
        flags: u64,
        addr: u64,
        data: Vec<u8>,
    ) -> Self {
        self.sections.push(TestSection {
            name: name.to_string(),
            stype,
            flags,
            addr,
            align: 1,
            contents: Contents::Data(data),
        });
        self
    }

    /// A section whose header points at an arbitrary file offset, for exercising the
    /// address arithmetic without needing real contents there.
    pub fn section_at(
        mut self,
        name: &str,
        stype: u32,
        flags: u64,
        addr: u64,
        offset: u64,
    ) -> Self {
        self.sections.push(TestSection {
            name: name.to_string(),
            stype,
            flags,
            addr,
            align: 1,
            contents: Contents::At(offset),
        });
        self
    }

    /// `.stapsdt.base` is a single allocated byte.
    pub fn stapsdt_base(self, addr: u64) -> Self {
        self.section(".stapsdt.base", SHT_PROGBITS, ALLOC_FLAG, addr, vec![0])
    }

    /// A non-allocated note section, which is where SDT notes are stored.
    pub fn notes(self, name: &str, records: &[Vec<u8>]) -> Self {
        self.aligned_notes(name, 4, records)
    }

    /// Same as notes but with the given sh_addralign.
    pub fn aligned_notes(mut self, name: &str, align: u64, records: &[Vec<u8>]) -> Self {
        self.sections.push(TestSection {
            name: name.to_string(),
            stype: SHT_NOTE,
            flags: 0,
            addr: 0,
            align,
            contents: Contents::Data(records.concat()),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let e = self.encoding;
        let header_size: usize = if e.sixty_four_bit { 64 } else { 52 };
        let entry_size: usize = if e.sixty_four_bit { 64 } else { 40 };

        let mut shstrtab = vec![0u8];
        let mut body = vec![0u8; header_size];
        let mut headers = Vec::new();
        for section in &self.sections {
            let name = shstrtab.len() as u32;
            shstrtab.extend(section.name.as_bytes());
            shstrtab.push(0);
            let (offset, size) = match &section.contents {
                Contents::Data(data) => {
                    pad(&mut body, 8);
                    let offset = body.len() as u64;
                    body.extend(data);
                    (offset, data.len() as u64)
                }
                Contents::At(offset) => (*offset, 1),
            };
            headers.push((
                name,
                section.stype,
                section.flags,
                section.addr,
                offset,
                size,
                section.align,
            ));
        }
        let name = shstrtab.len() as u32;
        shstrtab.extend(b".shstrtab\0");
        let strtab_offset = body.len() as u64;
        body.extend(&shstrtab);
        headers.push((name, 3, 0, 0, strtab_offset, shstrtab.len() as u64, 1));

        pad(&mut body, 8);
        let shoff = body.len() as u64;
        let num_sections = headers.len() + 1;

        // null section first
        body.extend(vec![0u8; entry_size]);
        for (name, stype, flags, addr, offset, size, align) in headers {
            put_word(&mut body, e, name);
            put_word(&mut body, e, stype);
            put_addr(&mut body, e, flags);
            put_addr(&mut body, e, addr);
            put_addr(&mut body, e, offset);
            put_addr(&mut body, e, size);
            put_word(&mut body, e, 0);
            put_word(&mut body, e, 0);
            put_addr(&mut body, e, align);
            put_addr(&mut body, e, 0);
        }

        let mut ehdr = vec![0x7f, b'E', b'L', b'F'];
        ehdr.push(if e.sixty_four_bit { 2 } else { 1 });
        ehdr.push(if e.little_endian { 1 } else { 2 });
        ehdr.push(1);
        ehdr.resize(16, 0);
        put_half(&mut ehdr, e, 2); // ET_EXEC
        put_half(&mut ehdr, e, if e.sixty_four_bit { 0x3e } else { 0x3 });
        put_word(&mut ehdr, e, 1);
        put_addr(&mut ehdr, e, 0); // entry
        put_addr(&mut ehdr, e, 0); // phoff
        put_addr(&mut ehdr, e, shoff);
        put_word(&mut ehdr, e, 0); // flags
        put_half(&mut ehdr, e, header_size as u16);
        put_half(&mut ehdr, e, 0);
        put_half(&mut ehdr, e, 0);
        put_half(&mut ehdr, e, entry_size as u16);
        put_half(&mut ehdr, e, num_sections as u16);
        put_half(&mut ehdr, e, (num_sections - 1) as u16);
        assert_eq!(ehdr.len(), header_size);

        body[..header_size].copy_from_slice(&ehdr);
        body
    }
}
