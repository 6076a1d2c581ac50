use crate::errors::ElfError;

pub fn require(predicate: bool, err: ElfError) -> Result<(), ElfError> {
    if predicate { Ok(()) } else { Err(err) }
}

/// Rounds n up to a multiple of align, which must be a power of two. Saturates instead
/// of wrapping so that a huge size from a corrupt note can't look small again.
pub fn align_to(n: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    n.saturating_add(align - 1) & !(align - 1)
}
