use std::ops::Add;

/// An index into a byte within an ELF file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Offset(pub u64);

/// The address a byte will have once the image is loaded, as recorded by the linker.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct VirtualAddr(pub u64);

/// A range of bytes that can be addressed using either offsets into an ELF file or
/// virtual addresses. Sections carry both: SDT normalization is all about the
/// difference between the two.
#[derive(Copy, Clone, Debug)]
pub struct Bytes<A>
where
    A: Add<u64, Output = A> + Copy,
{
    pub start: A,
    pub size: u64,
}

impl Bytes<Offset> {
    pub fn from_raw(start: u64, size: u64) -> Self {
        Bytes {
            start: Offset(start),
            size,
        }
    }
}

impl Bytes<VirtualAddr> {
    pub fn from_raw(start: u64, size: u64) -> Self {
        Bytes {
            start: VirtualAddr(start),
            size,
        }
    }
}

impl<A: Add<u64, Output = A> + Copy> Bytes<A> {
    pub fn end(&self) -> A {
        self.start + self.size
    }
}

// Corrupt headers can hold anything so these saturate rather than panic.
impl Add<u64> for VirtualAddr {
    type Output = VirtualAddr;

    fn add(self, rhs: u64) -> Self::Output {
        VirtualAddr(self.0.saturating_add(rhs))
    }
}

impl Add<u64> for Offset {
    type Output = Offset;

    fn add(self, rhs: u64) -> Self::Output {
        Offset(self.0.saturating_add(rhs))
    }
}
