//! Random-access cursors over the active storage of a [`SvoVec`](crate::SvoVec).
//!
//! A [`Cursor`] is a position inside a borrowed slice. The same type serves the
//! read-only (`Cursor<&[T]>`) and mutable (`Cursor<&mut [T]>`) variants.
//!
//! A cursor borrows the container it came from, so it cannot outlive a
//! `resize` or a swap: the borrow checker rejects that use instead of leaving a
//! dangling position behind. Obtain new cursors after any length change.
//!
//! ```compile_fail
//! # use svovec::SvoVec;
//! let mut v: SvoVec<i32, 4> = SvoVec::new();
//! v.resize(2);
//! let it = v.begin();
//! v.resize(8); // error: `v` is borrowed by `it`
//! let _ = *it;
//! ```
//!
//! Positions may move outside `0..=len` while being offset; only dereferencing
//! requires `position() < len()`, and panics otherwise.

use core::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Deref, DerefMut, Sub, SubAssign},
};

/// A random-access position inside `S`, which is `&[T]` or `&mut [T]`.
///
/// # Examples
///
/// ```
/// # use svovec::{SvoVec, svovec};
/// let v: SvoVec<i32, 4> = svovec![10, 20, 30];
///
/// let mut it = v.begin();
/// let end = v.end();
/// assert_eq!(end - it, 3);
///
/// assert_eq!(*it, 10);
/// it.inc();
/// assert_eq!(*it, 20);
/// assert_eq!(*(it + 1), 30);
///
/// let before = it.post_inc();
/// assert_eq!(*before, 20);
/// assert_eq!(*it, 30);
///
/// it += 1;
/// assert!(it == end);
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<S> {
    buf: S,
    pos: usize,
}

impl<S, T> Cursor<S>
where
    S: Deref<Target = [T]>,
{
    #[inline(always)]
    pub(crate) fn new(buf: S, pos: usize) -> Self {
        Self { buf, pos }
    }

    /// The index this cursor points at.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The length of the sequence being traversed.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` if the cursor is one past the last element.
    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Prefix increment: moves forward by one and returns the moved cursor.
    #[inline(always)]
    pub fn inc(&mut self) -> &mut Self {
        self.pos = self.pos.wrapping_add(1);
        self
    }

    /// Prefix decrement: moves back by one and returns the moved cursor.
    #[inline(always)]
    pub fn dec(&mut self) -> &mut Self {
        self.pos = self.pos.wrapping_sub(1);
        self
    }

    /// The element under the cursor, or `None` outside `0..len`.
    #[inline]
    pub fn element(&self) -> Option<&T> {
        self.buf.get(self.pos)
    }

    /// The address the cursor designates. Used for comparisons; may be out of bounds.
    #[inline]
    pub fn addr(&self) -> *const T {
        self.buf.as_ptr().wrapping_add(self.pos)
    }

    /// Signed number of steps from `origin` to `self`.
    ///
    /// Both cursors must traverse the same sequence.
    #[inline]
    pub fn distance_from<R>(&self, origin: &Cursor<R>) -> isize
    where
        R: Deref<Target = [T]>,
    {
        debug_assert!(
            core::ptr::eq(self.buf.as_ptr(), origin.buf.as_ptr()),
            "cursors from different sequences"
        );
        (self.pos as isize).wrapping_sub(origin.pos as isize)
    }
}

impl<'a, T> Cursor<&'a [T]> {
    /// Postfix increment: moves forward and returns the position held *before* the move.
    #[inline(always)]
    pub fn post_inc(&mut self) -> Self {
        let old = *self;
        self.inc();
        old
    }

    /// Postfix decrement: moves back and returns the position held *before* the move.
    #[inline(always)]
    pub fn post_dec(&mut self) -> Self {
        let old = *self;
        self.dec();
        old
    }

    /// Like [`element`](Cursor::element), but borrows from the sequence instead of the cursor.
    #[inline]
    pub fn element_ref(&self) -> Option<&'a T> {
        self.buf.get(self.pos)
    }
}

impl<'a, T> Cursor<&'a mut [T]> {
    #[inline]
    pub fn element_mut(&mut self) -> Option<&mut T> {
        self.buf.get_mut(self.pos)
    }

    /// A read-only cursor at the same position, borrowing from this one.
    #[inline]
    pub fn as_const(&self) -> Cursor<&[T]> {
        Cursor {
            buf: &*self.buf,
            pos: self.pos,
        }
    }
}

impl<S, T> Deref for Cursor<S>
where
    S: Deref<Target = [T]>,
{
    type Target = T;

    /// # Panics
    /// Panics if the cursor is outside `0..len`.
    #[inline]
    fn deref(&self) -> &T {
        &self.buf[self.pos]
    }
}

impl<S, T> DerefMut for Cursor<S>
where
    S: DerefMut<Target = [T]>,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.buf[self.pos]
    }
}

impl<S> Add<isize> for Cursor<S> {
    type Output = Self;
    #[inline]
    fn add(mut self, n: isize) -> Self {
        self.pos = self.pos.wrapping_add_signed(n);
        self
    }
}

impl<S> Sub<isize> for Cursor<S> {
    type Output = Self;
    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self.pos = self.pos.wrapping_add_signed(n.wrapping_neg());
        self
    }
}

impl<S> AddAssign<isize> for Cursor<S> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.pos = self.pos.wrapping_add_signed(n);
    }
}

impl<S> SubAssign<isize> for Cursor<S> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.pos = self.pos.wrapping_add_signed(n.wrapping_neg());
    }
}

impl<S, R, T> Sub<Cursor<R>> for Cursor<S>
where
    S: Deref<Target = [T]>,
    R: Deref<Target = [T]>,
{
    type Output = isize;
    #[inline]
    fn sub(self, origin: Cursor<R>) -> isize {
        self.distance_from(&origin)
    }
}

impl<S, R, T> PartialEq<Cursor<R>> for Cursor<S>
where
    S: Deref<Target = [T]>,
    R: Deref<Target = [T]>,
{
    #[inline]
    fn eq(&self, other: &Cursor<R>) -> bool {
        core::ptr::eq(self.buf.as_ptr(), other.buf.as_ptr()) && self.pos == other.pos
    }
}

impl<S, T> Eq for Cursor<S> where S: Deref<Target = [T]> {}

impl<S, R, T> PartialOrd<Cursor<R>> for Cursor<S>
where
    S: Deref<Target = [T]>,
    R: Deref<Target = [T]>,
{
    /// Cursors over different sequences are unordered.
    #[inline]
    fn partial_cmp(&self, other: &Cursor<R>) -> Option<Ordering> {
        if core::ptr::eq(self.buf.as_ptr(), other.buf.as_ptr()) {
            Some(self.pos.cmp(&other.pos))
        } else {
            None
        }
    }
}

impl<S, T> fmt::Debug for Cursor<S>
where
    S: Deref<Target = [T]>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("len", &self.buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn walk_forward_and_back() {
        let data = [1, 2, 3, 4];
        let begin = Cursor::new(&data[..], 0);
        let end = Cursor::new(&data[..], data.len());

        let mut seen = Vec::new();
        let mut it = begin;
        while it != end {
            seen.push(*it);
            it.inc();
        }
        assert_eq!(seen, data);

        let mut back = Vec::new();
        let mut it = end;
        while it != begin {
            it.dec();
            back.push(*it);
        }
        assert_eq!(back, [4, 3, 2, 1]);
    }

    #[test]
    fn postfix_returns_previous_position() {
        let data = [5, 6, 7];
        let mut it = Cursor::new(&data[..], 1);

        let old = it.post_inc();
        assert_eq!(old.position(), 1);
        assert_eq!(it.position(), 2);

        let old = it.post_dec();
        assert_eq!(old.position(), 2);
        assert_eq!(it.position(), 1);
    }

    #[test]
    fn offsets_and_distance() {
        let data = [0u8; 10];
        let a = Cursor::new(&data[..], 2);
        let b = a + 5;
        assert_eq!(b.position(), 7);
        assert_eq!(b - a, 5);
        assert_eq!(a - b, -5);
        assert_eq!((b - 3isize).position(), 4);
        assert!(a < b);

        let mut c = b;
        c -= 7;
        assert_eq!(c.position(), 0);
        c += -1;
        c += 1;
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn equality_needs_same_sequence() {
        let x = [1, 2];
        let y = [1, 2];
        let a = Cursor::new(&x[..], 0);
        let b = Cursor::new(&y[..], 0);
        assert!(a != b);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn mutable_cursor_writes_through() {
        let mut data = [1, 2, 3];
        let mut it = Cursor::new(&mut data[..], 0);
        *it = 10;
        it.inc();
        *it.element_mut().unwrap() += 10;
        assert_eq!(*it.as_const(), 12);
        it.inc().inc();
        assert!(it.is_end());
        assert!(it.element().is_none());
        assert_eq!(data, [10, 12, 3]);
    }

    #[test]
    #[should_panic]
    fn deref_past_end_panics() {
        let data = [1];
        let it = Cursor::new(&data[..], 1);
        let _value: i32 = *it;
    }
}
