//! Generic ELF file support, just enough to find SDT notes. This module knows
//! nothing about probes.
//! Quick ELF reference: https://gist.github.com/x0nu11byt3/bcb35c3de461e5fb66173071a2379779
//!
//! ELF files start with an ELF header which includes:
//! * A magic number to identify the file as an ELF file.
//! * The class (32 or 64-bit) and data encoding (little or big endian).
//! * The offset to and number of section headers.
//!
//! Section headers identify sections. Section headers have name, type, flags, vaddr,
//! offset, size, etc. Note sections (SHT_NOTE) hold a sequence of records, each with
//! an owner name, a type, and an owner defined description.
pub mod elf_file;
pub mod header;
pub mod io;
pub mod notes;
pub mod primitives;
pub mod sections;

pub use elf_file::*;
pub use header::*;
pub use io::*;
pub use notes::*;
pub use primitives::*;
pub use sections::*;
