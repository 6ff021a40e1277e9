//! The aligned allocation capability used by the heap storage.
//!
//! [`SvoVec`](crate::SvoVec) never calls the global allocator directly.
//! Every heap block comes from an [`AlignedAlloc`] value stored in the container,
//! which makes the large-storage path replaceable (arenas, counting allocators in tests).

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{fmt, ptr::NonNull};

/// The error type for `try_*` methods that may allocate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TryReserveError {
    /// The computed capacity exceeded `isize::MAX` bytes.
    CapacityOverflow,
    /// The allocator returned an error for this layout.
    AllocError {
        /// The layout of the failed request.
        layout: Layout,
    },
}

impl TryReserveError {
    /// Turns the error into the same outcome an infallible `Vec` method would produce.
    ///
    /// - [`CapacityOverflow`](TryReserveError::CapacityOverflow) panics.
    /// - [`AllocError`](TryReserveError::AllocError) calls [`handle_alloc_error`].
    #[cold]
    #[inline(never)]
    pub fn handle(self) -> ! {
        match self {
            TryReserveError::CapacityOverflow => panic!("capacity overflow"),
            TryReserveError::AllocError { layout } => handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")?;
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str(" because the computed capacity exceeded the collection's maximum")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                " because the allocator returned an error (size {}, align {})",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl core::error::Error for TryReserveError {}

/// An allocator that hands out blocks with a caller-chosen alignment.
///
/// The heap storage clones the allocator it was created with and returns every
/// block to that same value, so clones must be able to free each other's blocks.
///
/// # Safety
///
/// - A block returned by `allocate` must be valid for reads and writes of
///   `layout.size()` bytes and aligned to `layout.align()`.
/// - The block must stay valid until passed to `deallocate` (on this value or a clone).
pub unsafe trait AlignedAlloc: Clone {
    /// Allocates a block for `layout`. `layout.size()` is never zero.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, TryReserveError>;

    /// Returns a block to the allocator.
    ///
    /// # Safety
    /// `ptr` was returned by `allocate` on this allocator (or a clone) with the same `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The default allocator, backed by the global allocator.
///
/// The global allocator already honours any `Layout` alignment, so this type
/// only adapts its interface and turns null into an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl AlignedAlloc for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, TryReserveError> {
        debug_assert!(layout.size() != 0, "zero sized allocation");
        // SAFETY: layout size is non-zero.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(TryReserveError::AllocError { layout })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: see trait doc.
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}
