//! Decodes the description of a `stapsdt` note. The layout is:
//!
//! ```text
//! pc        address sized, where the probe's instruction is
//! base      address sized, where the linker thought .stapsdt.base would be
//! semaphore address sized, zero if the probe has none
//! provider  NUL terminated
//! name      NUL terminated
//! args      NUL terminated, e.g. "-4@%eax 8@%rdx"
//! ```
//!
//! The addresses use the image's byte order and word size.
use super::{NormalizationContext, SdtProbe};
use crate::elf::{Encoding, Stream};
use crate::errors::{DecodeError, ElfError};

const REPLACEMENT_LEN: usize = char::REPLACEMENT_CHARACTER.len_utf8();

pub fn decode_probe(
    desc: &[u8],
    encoding: Encoding,
    context: &NormalizationContext,
) -> Result<SdtProbe, DecodeError> {
    let too_short = |_: ElfError| DecodeError::TooShort {
        len: desc.len(),
        needed: 3 * encoding.addr_size(),
    };
    let mut s = Stream::new(desc, encoding, 0);
    let pc_raw = s.read_addr().map_err(too_short)?;
    let base_ref = s.read_addr().map_err(too_short)?;
    let sem_raw = s.read_addr().map_err(too_short)?;

    let provider = s
        .read_cstr()
        .map_err(|_| DecodeError::Unterminated("provider"))?;
    let name = s.read_cstr().map_err(|_| DecodeError::Unterminated("name"))?;

    // Some emitters stop after the name. An args string that runs off the end is
    // treated the same way.
    let args = s.read_cstr().unwrap_or_default();

    if provider.is_empty() {
        return Err(DecodeError::Empty("provider"));
    }
    if name.is_empty() {
        return Err(DecodeError::Empty("name"));
    }

    Ok(SdtProbe {
        provider: owned_string(provider)?,
        name: owned_string(name)?,
        args: owned_string(args)?,
        pc_offset: context.pc_offset(pc_raw, base_ref),
        sem_offset: context.sem_offset(sem_raw, base_ref),
    })
}

/// Copies the bytes into a new String, reporting allocation failure instead of
/// aborting. Each run of invalid UTF-8 becomes one U+FFFD, as with
/// `String::from_utf8_lossy`.
fn owned_string(bytes: &[u8]) -> Result<String, DecodeError> {
    let len = bytes
        .utf8_chunks()
        .map(|chunk| {
            let replacement = if chunk.invalid().is_empty() { 0 } else { REPLACEMENT_LEN };
            chunk.valid().len() + replacement
        })
        .sum::<usize>();
    let mut result = String::new();
    result.try_reserve_exact(len)?;
    for chunk in bytes.utf8_chunks() {
        result.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            result.push(char::REPLACEMENT_CHARACTER);
        }
    }
    Ok(result)
}
