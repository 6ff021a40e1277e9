//! The large storage: a growable heap buffer with a guaranteed alignment.

use alloc::alloc::Layout;
use core::{marker::PhantomData, mem, ptr, ptr::NonNull, slice};

use crate::align::{A16, Alignment, effective_align};
use crate::allocator::{AlignedAlloc, Global, TryReserveError};
use crate::utils::cold_path;

/// A growable buffer whose block comes from an [`AlignedAlloc`].
///
/// The block is aligned to `max(A::ALIGN, align_of::<T>())` bytes and released
/// through a clone of the allocator it was obtained from.
/// Zero-sized types never allocate.
///
/// # Examples
///
/// ```
/// # use svovec::{HeapBuf, align::A64};
/// let mut buf: HeapBuf<u16, A64> = HeapBuf::new();
/// buf.resize_with(100, || 7);
///
/// assert_eq!(buf.len(), 100);
/// assert_eq!(buf.as_ptr() as usize % 64, 0);
/// ```
pub struct HeapBuf<T, A: Alignment = A16, M: AlignedAlloc = Global> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: M,
    _marker: PhantomData<(T, A)>,
}

unsafe impl<T: Send, A: Alignment, M: AlignedAlloc + Send> Send for HeapBuf<T, A, M> {}
unsafe impl<T: Sync, A: Alignment, M: AlignedAlloc + Sync> Sync for HeapBuf<T, A, M> {}

impl<T, A: Alignment, M: AlignedAlloc> Drop for HeapBuf<T, A, M> {
    fn drop(&mut self) {
        // SAFETY: slots `0..len` are initialized.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            self.release();
        }
    }
}

impl<T, A: Alignment> HeapBuf<T, A, Global> {
    /// Creates an empty buffer without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, A: Alignment, M: AlignedAlloc> HeapBuf<T, A, M> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty buffer that will allocate from `alloc`.
    #[inline]
    pub const fn new_in(alloc: M) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates a buffer with room for at least `capacity` elements.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: M) -> Result<Self, TryReserveError> {
        let mut buf = Self::new_in(alloc);
        if capacity > buf.cap {
            buf.grow_to(capacity)?;
        }
        Ok(buf)
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    #[inline(always)]
    pub const fn allocator(&self) -> &M {
        &self.alloc
    }

    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: slots `0..len` are initialized; the pointer is dangling only when len == 0.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Forces the length of the buffer to `new_len`.
    ///
    /// # Safety
    /// - `new_len <= capacity`.
    /// - Slots `0..new_len` are initialized.
    #[inline(always)]
    pub const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.cap);
        self.len = new_len;
    }

    /// The layout of a block holding `cap` elements.
    #[inline]
    fn layout_for(cap: usize) -> Result<Layout, TryReserveError> {
        Layout::array::<T>(cap)
            .and_then(|layout| layout.align_to(effective_align::<T, A>()))
            .map_err(|_| TryReserveError::CapacityOverflow)
    }

    /// Gives the current block back to the allocator.
    ///
    /// # Safety
    /// The elements were dropped or moved out; the block is not used afterwards.
    #[inline]
    unsafe fn release(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }
        // The layout was valid when the block was allocated.
        if let Ok(layout) = Self::layout_for(self.cap) {
            // SAFETY: the block came from `self.alloc` with this layout.
            unsafe { self.alloc.deallocate(self.ptr.cast(), layout) };
        }
    }

    /// Moves the elements into a new block of exactly `new_cap` slots.
    ///
    /// The old block is released only after the new one has been obtained,
    /// so on error the buffer is unchanged.
    #[inline(never)]
    fn grow_to(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        debug_assert!(new_cap > self.cap);
        if Self::IS_ZST {
            cold_path();
            return Err(TryReserveError::CapacityOverflow);
        }

        let layout = Self::layout_for(new_cap)?;
        let new_ptr = self.alloc.allocate(layout)?.cast::<T>();

        // SAFETY: the blocks are distinct and both hold at least `len` slots.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
            self.release();
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Makes room for at least `additional` more elements, doubling the capacity when growing.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if needed <= self.cap {
            return Ok(());
        }
        let doubled = self.cap.saturating_mul(2);
        self.grow_to(needed.max(doubled).max(4))
    }

    /// Makes room for exactly `additional` more elements.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if needed <= self.cap {
            return Ok(());
        }
        self.grow_to(needed)
    }

    /// Appends an element, growing the block if needed.
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            if let Err(e) = self.try_reserve(1) {
                e.handle();
            }
        }
        // SAFETY: len < cap.
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            cold_path();
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot was initialized and is now out of range.
            Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
        }
    }

    /// Drops the elements at `len..`, if any. Capacity is kept.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if self.len > len {
            let tail = self.len - len;
            self.len = len;
            // SAFETY: the tail was initialized and is now out of range.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.ptr.as_ptr().add(len),
                    tail,
                ));
            }
        }
    }

    /// Resizes to `new_len`, filling new slots with `f()`.
    ///
    /// Growth reserves exactly the missing room before any element is written.
    pub fn try_resize_with<F: FnMut() -> T>(
        &mut self,
        new_len: usize,
        mut f: F,
    ) -> Result<(), TryReserveError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.try_reserve_exact(new_len - self.len)?;
        while self.len < new_len {
            // SAFETY: len < new_len <= cap.
            unsafe {
                ptr::write(self.ptr.as_ptr().add(self.len), f());
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Infallible form of [`try_resize_with`](HeapBuf::try_resize_with).
    #[inline]
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        if let Err(e) = self.try_resize_with(new_len, f) {
            e.handle();
        }
    }

    /// Reallocates to exactly `len` slots, or frees the block when empty.
    pub fn shrink_to_fit(&mut self) {
        if Self::IS_ZST || self.cap == self.len {
            return;
        }
        if self.len == 0 {
            // SAFETY: nothing is initialized.
            unsafe { self.release() };
            self.ptr = NonNull::dangling();
            self.cap = 0;
            return;
        }
        let Ok(layout) = Self::layout_for(self.len) else {
            return;
        };
        // A smaller block is an optimization only; keep the old one if none is available.
        let Ok(new_ptr) = self.alloc.allocate(layout) else {
            return;
        };
        let new_ptr = new_ptr.cast::<T>();
        // SAFETY: distinct blocks, `len` slots in both.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
            self.release();
        }
        self.ptr = new_ptr;
        self.cap = self.len;
    }

    /// Keeps the first `keep` elements, moving them to `dst`, and drops the rest.
    ///
    /// The buffer is empty afterwards; its block is kept.
    ///
    /// # Safety
    /// `keep <= len`; `dst` is valid for `keep` writes and does not overlap this buffer.
    #[inline]
    pub(crate) unsafe fn move_prefix_to(&mut self, dst: *mut T, keep: usize) {
        debug_assert!(keep <= self.len);
        self.truncate(keep);
        self.len = 0;
        // SAFETY: see function doc.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), dst, keep) };
    }
}

impl<T, A: Alignment, M: AlignedAlloc + Default> Default for HeapBuf<T, A, M> {
    #[inline]
    fn default() -> Self {
        Self::new_in(M::default())
    }
}

impl<T: Clone, A: Alignment, M: AlignedAlloc> Clone for HeapBuf<T, A, M> {
    fn clone(&self) -> Self {
        let mut buf = match Self::try_with_capacity_in(self.len, self.alloc.clone()) {
            Ok(buf) => buf,
            Err(e) => e.handle(),
        };
        for item in self.as_slice() {
            buf.push(item.clone());
        }
        buf
    }
}

crate::utils::impl_slice_traits!({A: Alignment, M: AlignedAlloc} HeapBuf<T, A, M>);

impl<T, U, A: Alignment, B: Alignment, M: AlignedAlloc, N: AlignedAlloc>
    core::cmp::PartialEq<HeapBuf<U, B, N>> for HeapBuf<T, A, M>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &HeapBuf<U, B, N>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
