//! The small storage: a fixed-capacity, aligned, inline buffer.

use core::{
    mem::{ManuallyDrop, MaybeUninit},
    ptr, slice,
};

use crate::align::{A16, Alignment};
use crate::utils::cold_path;

/// A buffer of at most `K` elements stored inline, aligned to `A` bytes.
///
/// Slots `0..len` are initialized; the rest are uninitialized and never read
/// or dropped. This is the storage [`SvoVec`](crate::SvoVec) uses while its length
/// is at most `K`.
///
/// # Panics
/// Any operation that causes `len > K`.
///
/// # Examples
///
/// ```
/// # use svovec::{InlineBuf, align::A32};
/// let mut buf: InlineBuf<f32, 8, A32> = InlineBuf::new();
/// buf.push(1.0);
/// buf.push(2.0);
///
/// assert_eq!(buf, [1.0, 2.0]);
/// assert_eq!(buf.as_ptr() as usize % 32, 0);
/// ```
#[repr(C)]
pub struct InlineBuf<T, const K: usize, A: Alignment = A16> {
    _align: [A; 0],
    data: [MaybeUninit<T>; K],
    len: usize,
}

unsafe impl<T: Send, const K: usize, A: Alignment> Send for InlineBuf<T, K, A> {}
unsafe impl<T: Sync, const K: usize, A: Alignment> Sync for InlineBuf<T, K, A> {}

impl<T, const K: usize, A: Alignment> Drop for InlineBuf<T, K, A> {
    // Internal data using `MaybeUninit`, we need to call `drop` manually.
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: slots `0..len` are initialized.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
            }
        }
    }
}

impl<T, const K: usize, A: Alignment> InlineBuf<T, K, A> {
    /// Creates an empty buffer. Nothing is written to the slots.
    #[inline]
    pub const fn new() -> Self {
        Self {
            _align: [],
            // SAFETY: an array of `MaybeUninit` needs no initialization.
            data: unsafe { MaybeUninit::<[MaybeUninit<T>; K]>::uninit().assume_init() },
            len: 0,
        }
    }

    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        &raw const self.data as *const T
    }

    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        &raw mut self.data as *mut T
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
    pub const fn is_full(&self) -> bool {
        self.len >= K
    }

    /// Always `K`.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        K
    }

    /// Forces the length of the buffer to `new_len`.
    ///
    /// # Safety
    /// - `new_len <= K`.
    /// - Slots `0..new_len` are initialized.
    /// - Slots dropped out of range are either dropped or moved out by the caller.
    #[inline(always)]
    pub const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= K);
        self.len = new_len;
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: slots `0..len` are initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `0..len` are initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Appends an element.
    ///
    /// # Panics
    /// Panics if the buffer is full.
    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(self.len < K, "inline buffer is full");
        // SAFETY: len < K.
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
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
            Some(unsafe { ptr::read(self.as_ptr().add(self.len)) })
        }
    }

    /// Drops the elements at `len..`, if any.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if self.len > len {
            let tail = self.len - len;
            // Shorten first so a panicking destructor cannot cause a double drop.
            self.len = len;
            // SAFETY: the tail was initialized and is now out of range.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.as_mut_ptr().add(len),
                    tail,
                ));
            }
        }
    }

    /// Resizes in place, filling new slots with `f()`.
    ///
    /// # Panics
    /// Panics if `new_len > K`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
        assert!(new_len <= K, "length overflow during `resize_with`");

        if new_len < self.len {
            self.truncate(new_len);
        } else {
            while self.len < new_len {
                // SAFETY: len < new_len <= K.
                unsafe {
                    ptr::write(self.as_mut_ptr().add(self.len), f());
                }
                self.len += 1;
            }
        }
    }

    /// Moves all elements out, leaving the buffer empty.
    ///
    /// The elements are written to `dst`, which must have room for `len` elements.
    ///
    /// # Safety
    /// `dst` is valid for `len` writes and does not overlap this buffer.
    #[inline]
    pub(crate) unsafe fn move_to(&mut self, dst: *mut T) -> usize {
        let len = self.len;
        self.len = 0;
        // SAFETY: see function doc.
        unsafe { ptr::copy_nonoverlapping(self.as_ptr(), dst, len) };
        len
    }

    /// Builds a buffer from an array with at most `K` elements.
    ///
    /// # Panics
    /// Panics if `P > K`.
    #[inline]
    pub fn from_buf<const P: usize>(arr: [T; P]) -> Self {
        assert!(P <= K, "length overflow during `from_buf`");
        let arr = ManuallyDrop::new(arr);
        let mut buf = Self::new();
        // SAFETY: P <= K and `arr` is never dropped.
        unsafe {
            ptr::copy_nonoverlapping(arr.as_ptr(), buf.as_mut_ptr(), P);
            buf.set_len(P);
        }
        buf
    }
}

impl<T, const K: usize, A: Alignment> Default for InlineBuf<T, K, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const K: usize, A: Alignment> Clone for InlineBuf<T, K, A> {
    fn clone(&self) -> Self {
        let mut buf = Self::new();
        for item in self.as_slice() {
            buf.push(item.clone());
        }
        buf
    }

    fn clone_from(&mut self, source: &Self) {
        self.truncate(0);
        for item in source.as_slice() {
            self.push(item.clone());
        }
    }
}

crate::utils::impl_slice_traits!({const K: usize, A: Alignment} InlineBuf<T, K, A>);

impl<T, U, const K: usize, const P: usize, A: Alignment, B: Alignment>
    core::cmp::PartialEq<InlineBuf<U, P, B>> for InlineBuf<T, K, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &InlineBuf<U, P, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{A1, A64};
    use alloc::{rc::Rc, string::String, vec};
    use core::cell::Cell;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn aligned_to_marker() {
        let a: InlineBuf<u8, 3, A64> = InlineBuf::new();
        assert_eq!(a.as_ptr() as usize % 64, 0);
        assert_eq!(core::mem::align_of::<InlineBuf<u8, 3, A64>>(), 64);

        let b: InlineBuf<u64, 3, A1> = InlineBuf::new();
        assert_eq!(b.as_ptr() as usize % core::mem::align_of::<u64>(), 0);
    }

    #[test]
    fn push_pop_truncate() {
        let mut buf: InlineBuf<String, 4> = InlineBuf::new();
        buf.push("a".into());
        buf.push("b".into());
        buf.push("c".into());
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.pop().as_deref(), Some("c"));
        buf.truncate(1);
        assert_eq!(buf, ["a"]);
        buf.truncate(5);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    #[should_panic(expected = "inline buffer is full")]
    fn push_past_capacity_panics() {
        let mut buf: InlineBuf<i32, 2> = InlineBuf::from_buf([1, 2]);
        buf.push(3);
    }

    #[test]
    fn resize_with_fills_and_drops() {
        let drops = Rc::new(Cell::new(0));
        let mut buf: InlineBuf<DropCounter, 4> = InlineBuf::new();
        buf.resize_with(4, || DropCounter(drops.clone()));
        assert_eq!(buf.len(), 4);
        buf.resize_with(1, || unreachable!());
        assert_eq!(drops.get(), 3);
        drop(buf);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn move_to_empties_without_dropping() {
        let drops = Rc::new(Cell::new(0));
        let mut buf: InlineBuf<DropCounter, 4> = InlineBuf::new();
        buf.push(DropCounter(drops.clone()));
        buf.push(DropCounter(drops.clone()));

        let mut dst: alloc::vec::Vec<DropCounter> = alloc::vec::Vec::with_capacity(2);
        unsafe {
            let n = buf.move_to(dst.as_mut_ptr());
            dst.set_len(n);
        }
        drop(buf);
        assert_eq!(drops.get(), 0);
        drop(dst);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn clone_and_compare() {
        let buf: InlineBuf<i32, 4> = InlineBuf::from_buf([1, 2, 3]);
        let other = buf.clone();
        assert_eq!(buf, other);
        assert_eq!(other, vec![1, 2, 3]);
    }
}
