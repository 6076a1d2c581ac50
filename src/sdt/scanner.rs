//! Walks the non-allocated note sections and decodes every `stapsdt` note in them.
use super::{NormalizationContext, ProbeList, SdtProbe, decoder};
use crate::elf::{ElfFile, SectionType};
use crate::errors::{DecodeError, SdtError};

pub const SDT_NOTE_NAME: &[u8] = b"stapsdt";
pub const SDT_NOTE_TYPE: u32 = 3;

/// Probes come back in section order, then note order within a section. Damaged
/// notes are skipped, and damaged framing abandons the rest of that section only.
/// Running out of memory fails the whole scan.
pub fn scan_notes(file: &ElfFile, context: &NormalizationContext) -> Result<ProbeList, SdtError> {
    let mut probes = ProbeList::new();
    let encoding = file.reader.encoding;

    for section in file.sections().iter().skip(1) {
        if section.stype != SectionType::Note || section.is_alloc() {
            continue;
        }
        let notes = match file.notes(section) {
            Ok(notes) => notes,
            Err(err) => {
                log::warn!(
                    "couldn't read note section {}: {err}",
                    file.section_name(section).unwrap_or("?")
                );
                continue;
            }
        };

        for note in notes {
            let note = match note {
                Ok(note) => note,
                Err(err) => {
                    log::warn!(
                        "abandoning the rest of {}: {err}",
                        file.section_name(section).unwrap_or("?")
                    );
                    break;
                }
            };
            if note.name != SDT_NOTE_NAME || note.ntype != SDT_NOTE_TYPE {
                continue;
            }

            collect(decoder::decode_probe(note.desc, encoding, context), &mut probes)?;
        }
    }
    Ok(probes)
}

/// Appends a decoded probe. Bad records are logged and dropped but allocation
/// failure is returned so the scan stops.
fn collect(result: Result<SdtProbe, DecodeError>, probes: &mut ProbeList) -> Result<(), SdtError> {
    match result {
        Ok(probe) => {
            log::trace!(
                "found {}:{} at {:#x}",
                probe.provider,
                probe.name,
                probe.pc_offset
            );
            probes.try_reserve(1)?;
            probes.push(probe);
        }
        Err(DecodeError::OutOfMemory(err)) => return Err(SdtError::OutOfMemory(err)),
        Err(err) => log::debug!("skipping stapsdt note: {err}"),
    }
    Ok(())
}
