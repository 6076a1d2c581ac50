//! Extracts SystemTap SDT probe descriptors from ELF binaries.
//!
//! ```no_run
//! for probe in stapsdt::parse("/usr/lib64/libc.so.6")? {
//!     println!("{}:{} at {:#x}", probe.provider, probe.name, probe.pc_offset);
//! }
//! # Ok::<(), stapsdt::SdtError>(())
//! ```
//!
//! Offsets are file relative so they can be handed to something like a uprobe
//! without knowing where the binary will be loaded. Nothing is written to the image
//! and no global state is kept, so separate calls are independent.
pub mod elf;
mod errors;
pub mod sdt;
mod utils;

#[cfg(test)]
mod testing;

pub use elf::ElfFile;
pub use errors::{DecodeError, ElfError, SdtError};
pub use sdt::{NormalizationContext, ProbeList, SdtProbe, parse, parse_bytes, parse_elf};
