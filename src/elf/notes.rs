//! Note records, as stored in SHT_NOTE sections. Each record is a 12-byte header
//! (namesz, descsz, type) followed by the name and the description, each padded out
//! to the note alignment.
use super::{Encoding, Stream};
use crate::errors::ElfError;
use crate::utils;

const NOTE_HEADER_SIZE: usize = 12;

/// One note record. The slices borrow from the section's bytes.
#[derive(Debug, Eq, PartialEq)]
pub struct Note<'a> {
    /// The owner, without the NUL terminator, e.g. "GNU" or "stapsdt".
    pub name: &'a [u8],

    /// Owner specific type.
    pub ntype: u32,

    /// Owner specific payload.
    pub desc: &'a [u8],
}

/// Reads the note at s.offset and leaves s positioned at the next one. The name and
/// description must fit within the stream's bytes.
pub fn read_note<'a>(s: &mut Stream<'a>, align: usize) -> Result<Note<'a>, ElfError> {
    let bytes = s.bytes();
    let start = s.offset;
    let n_namesz = s.read_word()? as usize;
    let n_descsz = s.read_word()? as usize;
    let n_type = s.read_word()?;

    let name_offset = s.offset;
    let desc_offset = utils::align_to(name_offset.saturating_add(n_namesz), align);
    let desc_end = desc_offset.saturating_add(n_descsz);
    if desc_end > bytes.len() {
        return Err(ElfError::NoteOverrun {
            offset: start,
            needed: desc_end - start,
            available: bytes.len() - start,
        });
    }

    // namesz counts the terminator, but be lenient about names that don't have one
    let name = &bytes[name_offset..name_offset + n_namesz];
    let name = match name.iter().position(|&b| b == 0) {
        Some(len) => &name[..len],
        None => name,
    };

    // The trailing padding of the last note is sometimes missing.
    s.offset = utils::align_to(desc_end, align).min(bytes.len());

    Ok(Note {
        name,
        ntype: n_type,
        desc: &bytes[desc_offset..desc_end],
    })
}

/// Iterates over the notes in a section's contents. Malformed framing yields one
/// error and then ends the iteration since there's no way to find the next record.
pub struct Notes<'a> {
    stream: Stream<'a>,
    align: usize,
    done: bool,
}

impl<'a> Notes<'a> {
    /// align is the section's sh_addralign: 8 selects the 8-byte note layout used for
    /// things like .note.gnu.property, anything else means the usual 4 bytes.
    pub fn new(bytes: &'a [u8], encoding: Encoding, align: u64) -> Self {
        Notes {
            stream: Stream::new(bytes, encoding, 0),
            align: if align == 8 { 8 } else { 4 },
            done: false,
        }
    }
}

impl<'a> Iterator for Notes<'a> {
    type Item = Result<Note<'a>, ElfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.stream.remaining() < NOTE_HEADER_SIZE {
            return None;
        }
        let result = read_note(&mut self.stream, self.align);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Notes<'_> {}
