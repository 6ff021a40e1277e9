//! Type-level byte alignments.
//!
//! Rust cannot take `#[repr(align(N))]` from a const generic, so the alignment of
//! a container is chosen with one of the zero-sized marker types below.
//! A zero-length array of the marker (`[A; 0]`) is placed in front of the inline
//! buffer; it occupies no space but raises the alignment of the whole struct.
//!
//! ```
//! # use svovec::align::{Alignment, A16, A64};
//! assert_eq!(A16::ALIGN, 16);
//! assert_eq!(core::mem::align_of::<[A64; 0]>(), 64);
//! ```

mod sealed {
    pub trait Sealed {}
}

/// A byte alignment carried at the type level.
///
/// This trait is sealed; use one of [`A1`], [`A2`], [`A4`], [`A8`], [`A16`],
/// [`A32`], [`A64`] or [`A128`].
pub trait Alignment: sealed::Sealed + Copy + Default + 'static {
    /// The alignment in bytes, always a power of two.
    const ALIGN: usize;
}

macro_rules! impl_alignment {
    ($($name:ident),+) => {
        $(
            impl sealed::Sealed for $name {}

            impl Alignment for $name {
                const ALIGN: usize = core::mem::align_of::<$name>();
            }
        )+
    };
}

/// 1-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(1))]
pub struct A1;

/// 2-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(2))]
pub struct A2;

/// 4-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(4))]
pub struct A4;

/// 8-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(8))]
pub struct A8;

/// 16-byte alignment, the default for [`SvoVec`](crate::SvoVec).
///
/// Wide enough for 128-bit SIMD loads on numeric element types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(16))]
pub struct A16;

/// 32-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(32))]
pub struct A32;

/// 64-byte alignment, one cache line on most targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(64))]
pub struct A64;

/// 128-byte alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(align(128))]
pub struct A128;

impl_alignment!(A1, A2, A4, A8, A16, A32, A64, A128);

/// The alignment actually used for a buffer of `T` under marker `A`.
#[inline(always)]
pub(crate) const fn effective_align<T, A: Alignment>() -> usize {
    let t = core::mem::align_of::<T>();
    if t > A::ALIGN { t } else { A::ALIGN }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem;

    #[test]
    fn marker_constants_match_layout() {
        assert_eq!(A1::ALIGN, 1);
        assert_eq!(A8::ALIGN, 8);
        assert_eq!(A16::ALIGN, 16);
        assert_eq!(A128::ALIGN, 128);
        assert_eq!(mem::size_of::<[A32; 0]>(), 0);
        assert_eq!(mem::align_of::<[A32; 0]>(), 32);
    }

    #[test]
    fn effective_align_takes_the_larger() {
        assert_eq!(effective_align::<u8, A16>(), 16);
        assert_eq!(effective_align::<u64, A1>(), mem::align_of::<u64>());

        #[repr(align(64))]
        struct Wide(#[allow(dead_code)] u8);
        assert_eq!(effective_align::<Wide, A16>(), 64);
    }
}
