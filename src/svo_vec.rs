use alloc::vec::Vec;
use core::{fmt, mem, ptr};

use crate::BoolSlot;
use crate::align::{A16, Alignment, effective_align};
use crate::allocator::{AlignedAlloc, Global, TryReserveError};
use crate::cursor::Cursor;
use crate::heap_buf::HeapBuf;
use crate::inline_buf::InlineBuf;
use crate::utils::cold_path;

/// Which storage currently holds the elements of a [`SvoVec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The inline buffer; `len() <= K`.
    Small,
    /// The heap buffer; `len() > K`.
    Large,
}

/// The active storage of a [`SvoVec`]. The discriminant is the [`Mode`].
#[derive(Clone)]
pub enum Storage<T, const K: usize, A: Alignment = A16, M: AlignedAlloc = Global> {
    Small(InlineBuf<T, K, A>),
    Large(HeapBuf<T, A, M>),
}

impl<T: fmt::Debug, const K: usize, A: Alignment, M: AlignedAlloc> fmt::Debug
    for Storage<T, K, A, M>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Small(buf) => f.debug_tuple("Small").field(buf).finish(),
            Storage::Large(buf) => f.debug_tuple("Large").field(buf).finish(),
        }
    }
}

/// A vector that keeps up to `K` elements in an aligned inline buffer and
/// moves them to an aligned heap buffer when it grows past `K`.
///
/// - `K`: the small-capacity threshold.
/// - `A`: the byte alignment of both buffers, one of the [`align`](crate::align) markers.
/// - `M`: the [`AlignedAlloc`] that provides heap blocks.
///
/// The vector is in [`Mode::Small`] exactly when `len() <= K`. Every length change
/// keeps this true: crossing the threshold moves the live elements once, in
/// either direction. Growing past `K` moves all current elements to the heap;
/// shrinking to `n <= K` moves only the first `n` (the rest are dropped) and
/// releases the heap block.
///
/// Indexing, slicing and iteration go through `Deref<Target = [T]>` and always
/// address the active storage. Out-of-range indexing panics.
///
/// # Examples
///
/// ```
/// use svovec::{Mode, SvoVec};
///
/// let mut v: SvoVec<char, 4> = SvoVec::new();
/// v.resize(3);
/// v[0] = 'a';
/// v[1] = 'b';
/// v[2] = 'c';
/// assert_eq!(v.mode(), Mode::Small);
///
/// // Crosses to the heap, keeps `a b c`, appends defaults.
/// v.resize(6);
/// assert_eq!(v.mode(), Mode::Large);
/// assert_eq!(v, ['a', 'b', 'c', '\0', '\0', '\0']);
///
/// // Crosses back inline, keeps only the first two.
/// v.resize(2);
/// assert_eq!(v.mode(), Mode::Small);
/// assert_eq!(v, ['a', 'b']);
/// ```
pub struct SvoVec<T, const K: usize, A: Alignment = A16, M: AlignedAlloc = Global> {
    storage: Storage<T, K, A, M>,
    alloc: M,
}

/// A [`SvoVec`] of addressable booleans.
pub type SvoBoolVec<const K: usize, A = A16> = SvoVec<BoolSlot, K, A>;

/// Creates a [`SvoVec`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
/// If there are more than `K` elements, heap storage is used directly.
///
/// # Examples
///
/// ```
/// # use svovec::{svovec, SvoVec};
/// let v: SvoVec<String, 4> = svovec![];
/// let v: SvoVec<i64, 4> = svovec![1; 6]; // Needs `Clone`.
/// let v: SvoVec<_, 4> = svovec![1, 2, 3];
/// assert!(v.is_small());
/// ```
#[macro_export]
macro_rules! svovec {
    [] => { $crate::SvoVec::new() };
    [$elem:expr; $n:expr] => { $crate::SvoVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::SvoVec::from_buf([ $($item),+ ]) };
}

impl<T, const K: usize, A: Alignment> SvoVec<T, K, A, Global> {
    /// Constructs a new, empty vector in [`Mode::Small`]. Does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::SvoVec;
    /// let v: SvoVec<u32, 8> = SvoVec::new();
    /// assert!(v.is_empty());
    /// assert!(v.is_small());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc> SvoVec<T, K, A, M> {
    /// The small-capacity threshold `K`.
    pub const SMALL_CAPACITY: usize = K;

    /// The alignment in bytes of both buffers: `max(A::ALIGN, align_of::<T>())`.
    pub const ALIGN: usize = effective_align::<T, A>();

    /// Constructs a new, empty vector that will take heap blocks from `alloc`.
    #[inline]
    pub const fn new_in(alloc: M) -> Self {
        Self {
            storage: Storage::Small(InlineBuf::new()),
            alloc,
        }
    }

    #[inline(always)]
    pub const fn mode(&self) -> Mode {
        match &self.storage {
            Storage::Small(_) => Mode::Small,
            Storage::Large(_) => Mode::Large,
        }
    }

    /// Returns `true` if the elements live in the inline buffer.
    #[inline(always)]
    pub const fn is_small(&self) -> bool {
        matches!(self.storage, Storage::Small(_))
    }

    #[inline]
    pub const fn len(&self) -> usize {
        match &self.storage {
            Storage::Small(buf) => buf.len(),
            Storage::Large(buf) => buf.len(),
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `K` in [`Mode::Small`], the heap buffer's capacity in [`Mode::Large`].
    #[inline]
    pub const fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Small(_) => K,
            Storage::Large(buf) => buf.capacity(),
        }
    }

    #[inline(always)]
    pub const fn allocator(&self) -> &M {
        &self.alloc
    }

    /// A read-only view of the active storage.
    #[inline(always)]
    pub const fn storage(&self) -> &Storage<T, K, A, M> {
        &self.storage
    }

    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        match &self.storage {
            Storage::Small(buf) => buf.as_ptr(),
            Storage::Large(buf) => buf.as_ptr(),
        }
    }

    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.storage {
            Storage::Small(buf) => buf.as_mut_ptr(),
            Storage::Large(buf) => buf.as_mut_ptr(),
        }
    }

    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Small(buf) => buf.as_slice(),
            Storage::Large(buf) => buf.as_slice(),
        }
    }

    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Small(buf) => buf.as_mut_slice(),
            Storage::Large(buf) => buf.as_mut_slice(),
        }
    }

    /// Moves the inline elements into a new heap block with room for `capacity` elements.
    ///
    /// The block is obtained before anything moves, so on error nothing changes.
    fn spill(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let Storage::Small(buf) = &mut self.storage else {
            return Ok(());
        };
        let mut heap = HeapBuf::try_with_capacity_in(capacity.max(buf.len()), self.alloc.clone())?;
        // SAFETY: the block holds at least `buf.len()` slots and is not the inline buffer.
        unsafe {
            let moved = buf.move_to(heap.as_mut_ptr());
            heap.set_len(moved);
        }
        self.storage = Storage::Large(heap);
        Ok(())
    }

    /// Drops the heap elements past `new_len` and moves the first `new_len` inline.
    ///
    /// The heap block is released.
    fn unspill(&mut self, new_len: usize) {
        let Storage::Large(heap) = &mut self.storage else {
            return;
        };
        debug_assert!(new_len <= K);
        let keep = new_len.min(heap.len());
        let mut buf = InlineBuf::new();
        // SAFETY: keep <= K, and the inline buffer is a fresh local.
        unsafe {
            heap.move_prefix_to(buf.as_mut_ptr(), keep);
            buf.set_len(keep);
        }
        self.storage = Storage::Small(buf);
    }

    /// Returns to [`Mode::Small`] if a removal left `len() <= K` on the heap.
    #[inline]
    fn settle(&mut self) {
        if let Storage::Large(heap) = &self.storage {
            let len = heap.len();
            if len <= K {
                self.unspill(len);
            }
        }
    }

    /// Takes over a filled heap buffer, moving it inline if it holds at most `K` elements.
    pub(crate) fn from_heap(heap: HeapBuf<T, A, M>, alloc: M) -> Self {
        let mut vec = Self {
            storage: Storage::Large(heap),
            alloc,
        };
        vec.settle();
        vec
    }

    /// Resizes to `new_len`, filling new slots with `f()`.
    ///
    /// - Small to Large (`new_len > K`): all current elements move to a new heap block.
    /// - Large to Small (`new_len <= K`): the first `new_len` elements move inline.
    /// - Otherwise the active storage is resized in place.
    ///
    /// On error the vector is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{SvoVec, svovec};
    /// let mut v: SvoVec<u8, 2> = svovec![1];
    /// v.try_resize_with(4, || 9).unwrap();
    /// assert_eq!(v, [1, 9, 9, 9]);
    /// assert!(!v.is_small());
    /// ```
    pub fn try_resize_with<F: FnMut() -> T>(
        &mut self,
        new_len: usize,
        f: F,
    ) -> Result<(), TryReserveError> {
        match self.mode() {
            Mode::Small if new_len > K => self.spill(new_len)?,
            Mode::Large if new_len <= K => {
                self.unspill(new_len);
                return Ok(());
            }
            _ => {}
        }
        match &mut self.storage {
            Storage::Small(buf) => buf.resize_with(new_len, f),
            Storage::Large(buf) => buf.try_resize_with(new_len, f)?,
        }
        Ok(())
    }

    /// Resizes to `new_len`, filling new slots with `f()`.
    ///
    /// See [`try_resize_with`](SvoVec::try_resize_with).
    ///
    /// # Panics
    /// Panics on capacity overflow; aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the allocator fails.
    #[inline]
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        if let Err(e) = self.try_resize_with(new_len, f) {
            e.handle();
        }
    }

    /// Reserves room for `additional` more elements on the heap.
    ///
    /// In [`Mode::Small`] this does nothing: the vector only moves to the heap when
    /// its length exceeds `K`, and it allocates for the new length at that point.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        match &mut self.storage {
            Storage::Small(_) => Ok(()),
            Storage::Large(buf) => buf.try_reserve(additional),
        }
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            e.handle();
        }
    }

    /// Shrinks the heap block to the length. Inline storage is left alone.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        if let Storage::Large(buf) = &mut self.storage {
            buf.shrink_to_fit();
        }
    }

    /// Appends an element, moving to the heap when the inline buffer is full.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{SvoVec, svovec};
    /// let mut v: SvoVec<_, 2> = svovec![1, 2];
    /// v.push(3);
    /// assert_eq!(v, [1, 2, 3]);
    /// assert!(!v.is_small());
    /// ```
    pub fn push(&mut self, value: T) {
        if let Storage::Small(buf) = &mut self.storage {
            if !buf.is_full() {
                buf.push(value);
                return;
            }
            cold_path();
            let capacity = K.saturating_mul(2).max(K.saturating_add(1));
            if let Err(e) = self.spill(capacity) {
                e.handle();
            }
        }
        match &mut self.storage {
            Storage::Large(buf) => buf.push(value),
            Storage::Small(_) => unreachable!(),
        }
    }

    /// Removes the last element and returns it.
    ///
    /// Returns to [`Mode::Small`] when the length drops to `K`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{SvoVec, svovec};
    /// let mut v: SvoVec<_, 2> = svovec![1, 2, 3];
    /// assert_eq!(v.pop(), Some(3));
    /// assert!(v.is_small());
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        let value = match &mut self.storage {
            Storage::Small(buf) => return buf.pop(),
            Storage::Large(buf) => buf.pop(),
        };
        self.settle();
        value
    }

    /// Shortens the vector to `len`, dropping the rest. Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        match &mut self.storage {
            Storage::Small(buf) => buf.truncate(len),
            Storage::Large(buf) => {
                buf.truncate(len);
                self.settle();
            }
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Keeps only the elements for which `f` returns `true`, in their original order.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
        let slice = self.as_mut_slice();
        let mut kept = 0;
        for index in 0..slice.len() {
            if f(&slice[index]) {
                slice.swap(kept, index);
                kept += 1;
            }
        }
        self.truncate(kept);
    }

    /// The first element.
    ///
    /// # Panics
    /// Panics if the vector is empty.
    #[inline]
    pub fn front(&self) -> &T {
        &self.as_slice()[0]
    }

    /// # Panics
    /// Panics if the vector is empty.
    #[inline]
    pub fn front_mut(&mut self) -> &mut T {
        &mut self.as_mut_slice()[0]
    }

    /// The last element.
    ///
    /// # Panics
    /// Panics if the vector is empty.
    #[inline]
    pub fn back(&self) -> &T {
        let slice = self.as_slice();
        &slice[slice.len().wrapping_sub(1)]
    }

    /// # Panics
    /// Panics if the vector is empty.
    #[inline]
    pub fn back_mut(&mut self) -> &mut T {
        let slice = self.as_mut_slice();
        let last = slice.len().wrapping_sub(1);
        &mut slice[last]
    }

    /// Exchanges the entire state of two vectors: elements, length, mode and allocator.
    ///
    /// | `self` | `other` | what moves | cost |
    /// |--------|---------|------------|------|
    /// | Small  | Small   | the two inline buffers | O(K) |
    /// | Large  | Large   | the two heap handles, no elements | O(1) |
    /// | Small  | Large   | inline buffer one way, heap handle the other | O(K) |
    /// | Large  | Small   | as above | O(K) |
    ///
    /// Length and mode travel with the storage, so each vector ends in the mode
    /// matching its new contents.
    ///
    /// The slice method `swap(a, b)` exchanges two elements; this one exchanges vectors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{Mode, SvoVec, svovec};
    /// let mut x: SvoVec<i32, 4> = svovec![1, 2];
    /// let mut y: SvoVec<i32, 4> = (0..10).collect();
    ///
    /// x.swap_with(&mut y);
    /// assert_eq!(x.mode(), Mode::Large);
    /// assert_eq!(x.len(), 10);
    /// assert_eq!(y, [1, 2]);
    /// assert_eq!(y.mode(), Mode::Small);
    /// ```
    pub fn swap_with(&mut self, other: &mut Self) {
        match (&mut self.storage, &mut other.storage) {
            (Storage::Small(a), Storage::Small(b)) => mem::swap(a, b),
            (Storage::Large(a), Storage::Large(b)) => mem::swap(a, b),
            (a, b) => mem::swap(a, b),
        }
        mem::swap(&mut self.alloc, &mut other.alloc);
    }

    /// A cursor at the first element.
    ///
    /// The cursor borrows the vector; take a new one after any length change.
    #[inline]
    pub fn begin(&self) -> Cursor<&[T]> {
        Cursor::new(self.as_slice(), 0)
    }

    /// A cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<&[T]> {
        let slice = self.as_slice();
        Cursor::new(slice, slice.len())
    }

    /// A mutable cursor at the first element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{SvoVec, svovec};
    /// let mut v: SvoVec<i32, 4> = svovec![1, 2, 3];
    /// let mut it = v.begin_mut();
    /// while !it.is_end() {
    ///     *it *= 10;
    ///     it.inc();
    /// }
    /// assert_eq!(v, [10, 20, 30]);
    /// ```
    #[inline]
    pub fn begin_mut(&mut self) -> Cursor<&mut [T]> {
        Cursor::new(self.as_mut_slice(), 0)
    }

    /// A mutable cursor one past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> Cursor<&mut [T]> {
        let slice = self.as_mut_slice();
        let len = slice.len();
        Cursor::new(slice, len)
    }

    /// Moves the elements into a [`Vec`]. The heap block, if any, is released.
    pub fn into_vec(mut self) -> Vec<T> {
        let len = self.len();
        let mut vec = Vec::with_capacity(len);
        // SAFETY: the elements are moved and then forgotten by the source.
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), vec.as_mut_ptr(), len);
            vec.set_len(len);
            match &mut self.storage {
                Storage::Small(buf) => buf.set_len(0),
                Storage::Large(buf) => buf.set_len(0),
            }
        }
        vec
    }
}

impl<T: Default, const K: usize, A: Alignment, M: AlignedAlloc> SvoVec<T, K, A, M> {
    /// Resizes to `n`, default-constructing new slots.
    ///
    /// Calling it again with the same `n` changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::{Mode, SvoVec};
    /// let mut v: SvoVec<u64, 4> = SvoVec::new();
    /// for n in [0, 3, 4, 5, 9, 4, 1, 0] {
    ///     v.resize(n);
    ///     assert_eq!(v.len(), n);
    ///     assert_eq!(v.mode() == Mode::Small, n <= 4);
    /// }
    /// ```
    #[inline]
    pub fn resize(&mut self, n: usize) {
        self.resize_with(n, T::default);
    }

    #[inline]
    pub fn try_resize(&mut self, n: usize) -> Result<(), TryReserveError> {
        self.try_resize_with(n, T::default)
    }
}

impl<T: Clone, const K: usize, A: Alignment, M: AlignedAlloc> SvoVec<T, K, A, M> {
    /// Clones and appends all elements of `other`. On error the vector is unchanged.
    pub fn try_extend_from_slice(&mut self, other: &[T]) -> Result<(), TryReserveError> {
        let new_len = self
            .len()
            .checked_add(other.len())
            .ok_or(TryReserveError::CapacityOverflow)?;
        if self.is_small() && new_len > K {
            self.spill(new_len)?;
        }
        match &mut self.storage {
            Storage::Small(buf) => {
                for item in other {
                    buf.push(item.clone());
                }
            }
            Storage::Large(buf) => {
                buf.try_reserve(other.len())?;
                for item in other {
                    buf.push(item.clone());
                }
            }
        }
        Ok(())
    }

    /// # Examples
    ///
    /// ```
    /// # use svovec::{SvoVec, svovec};
    /// let mut v: SvoVec<_, 3> = svovec![1];
    /// v.extend_from_slice(&[2, 3, 4]);
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    #[inline]
    pub fn extend_from_slice(&mut self, other: &[T]) {
        if let Err(e) = self.try_extend_from_slice(other) {
            e.handle();
        }
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc + Default> SvoVec<T, K, A, M> {
    /// A vector of `n` default values.
    #[inline]
    pub fn with_len(n: usize) -> Self
    where
        T: Default,
    {
        let mut vec = Self::new_in(M::default());
        vec.resize(n);
        vec
    }

    /// A vector of `n` clones of `elem`.
    #[inline]
    pub fn from_elem(elem: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new_in(M::default());
        vec.resize_with(n, || elem.clone());
        vec
    }

    /// Creates a vector from an array, inline if `P <= K`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svovec::SvoVec;
    /// let v: SvoVec<i32, 5> = SvoVec::from_buf([1, 2, 3]);
    /// assert!(v.is_small());
    /// let v: SvoVec<i32, 2> = SvoVec::from_buf([1, 2, 3]);
    /// assert!(!v.is_small());
    /// ```
    pub fn from_buf<const P: usize>(arr: [T; P]) -> Self {
        let alloc = M::default();
        if P <= K {
            return Self {
                storage: Storage::Small(InlineBuf::from_buf(arr)),
                alloc,
            };
        }
        let mut heap = match HeapBuf::try_with_capacity_in(P, alloc.clone()) {
            Ok(heap) => heap,
            Err(e) => e.handle(),
        };
        for item in arr {
            heap.push(item);
        }
        Self::from_heap(heap, alloc)
    }
}

impl<const K: usize, A: Alignment, M: AlignedAlloc> SvoVec<BoolSlot, K, A, M> {
    /// The boolean at `index`, or `None` if out of range.
    #[inline]
    pub fn get_bool(&self, index: usize) -> Option<bool> {
        self.as_slice().get(index).map(|slot| slot.value)
    }

    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set_bool(&mut self, index: usize, value: bool) {
        self.as_mut_slice()[index].value = value;
    }

    /// Iterates over the values as plain `bool`s.
    #[inline]
    pub fn bools(&self) -> impl Iterator<Item = bool> + '_ {
        self.as_slice().iter().map(|slot| slot.value)
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc + Default> Default for SvoVec<T, K, A, M> {
    #[inline]
    fn default() -> Self {
        Self::new_in(M::default())
    }
}

impl<T: Clone, const K: usize, A: Alignment, M: AlignedAlloc> Clone for SvoVec<T, K, A, M> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            alloc: self.alloc.clone(),
        }
    }
}

crate::utils::impl_slice_traits!({const K: usize, A: Alignment, M: AlignedAlloc} SvoVec<T, K, A, M>);

impl<T, U, const K: usize, const P: usize, A: Alignment, B: Alignment, M: AlignedAlloc, N: AlignedAlloc>
    core::cmp::PartialEq<SvoVec<U, P, B, N>> for SvoVec<T, K, A, M>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &SvoVec<U, P, B, N>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc> Extend<T> for SvoVec<T, K, A, M> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (hint, _) = iter.size_hint();
        self.reserve(hint);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: 'a + Clone, const K: usize, A: Alignment, M: AlignedAlloc> Extend<&'a T>
    for SvoVec<T, K, A, M>
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item.clone());
        }
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc + Default> FromIterator<T>
    for SvoVec<T, K, A, M>
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::default();
        vec.extend(iter);
        vec
    }
}

impl<T, const K: usize, const P: usize, A: Alignment, M: AlignedAlloc + Default> From<[T; P]>
    for SvoVec<T, K, A, M>
{
    #[inline]
    fn from(value: [T; P]) -> Self {
        Self::from_buf(value)
    }
}

impl<T: Clone, const K: usize, A: Alignment, M: AlignedAlloc + Default> From<&[T]>
    for SvoVec<T, K, A, M>
{
    fn from(value: &[T]) -> Self {
        let mut vec = Self::default();
        vec.extend_from_slice(value);
        vec
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc + Default> From<Vec<T>>
    for SvoVec<T, K, A, M>
{
    fn from(value: Vec<T>) -> Self {
        value.into_iter().collect()
    }
}

impl<T, const K: usize, A: Alignment, M: AlignedAlloc> From<SvoVec<T, K, A, M>> for Vec<T> {
    #[inline]
    fn from(value: SvoVec<T, K, A, M>) -> Self {
        value.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{A32, A64};
    use crate::allocator::testing::CountingAlloc;
    use alloc::{format, rc::Rc, string::String, vec};
    use core::cell::Cell;

    type Counted<T, const K: usize> = SvoVec<T, K, A16, CountingAlloc>;

    #[derive(Clone)]
    struct Tracked {
        id: usize,
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn resize_sets_len_and_mode() {
        let mut v: SvoVec<u32, 4> = SvoVec::new();
        for n in [0, 1, 4, 5, 17, 5, 4, 3, 0, 4, 100] {
            v.resize(n);
            assert_eq!(v.len(), n);
            assert_eq!(v.is_small(), n <= 4, "n = {n}");
        }
    }

    #[test]
    fn grow_then_shrink_round_trip() {
        let mut v: SvoVec<String, 4> = SvoVec::new();
        v.resize(3);
        v[0] = "a".into();
        v[1] = "b".into();
        v[2] = "c".into();

        v.resize(6);
        assert_eq!(v.mode(), Mode::Large);
        assert_eq!(v, ["a", "b", "c", "", "", ""]);

        v.resize(2);
        assert_eq!(v.mode(), Mode::Small);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0], "a");
        assert_eq!(v[1], "b");
    }

    #[test]
    fn resize_is_idempotent() {
        let mut v: SvoVec<i32, 4> = (0..9).collect();
        let before = v.clone();
        v.resize(9);
        v.resize(9);
        assert_eq!(v, before);
        assert_eq!(v.mode(), Mode::Large);

        v.resize(3);
        let before = v.clone();
        v.resize(3);
        assert_eq!(v, before);
        assert_eq!(v.mode(), Mode::Small);
    }

    #[test]
    fn resize_from_empty_crosses_without_moving() {
        let mut v: SvoVec<i32, 2> = SvoVec::new();
        v.resize(5);
        assert_eq!(v, [0; 5]);
        v.clear();
        assert!(v.is_small());
        assert!(v.is_empty());
    }

    #[test]
    fn swap_small_with_large() {
        let mut x: SvoVec<char, 4> = svovec!['p', 'q'];
        let values: Vec<char> = ('a'..='j').collect();
        let mut y: SvoVec<char, 4> = SvoVec::from(values.clone());
        assert_eq!(y.mode(), Mode::Large);

        x.swap_with(&mut y);
        assert_eq!(x.len(), 10);
        assert_eq!(x.mode(), Mode::Large);
        assert_eq!(x, values);
        assert_eq!(y.len(), 2);
        assert_eq!(y.mode(), Mode::Small);
        assert_eq!(y, ['p', 'q']);

        // and back again, large with small
        x.swap_with(&mut y);
        assert_eq!(x, ['p', 'q']);
        assert_eq!(y, values);
    }

    #[test]
    fn swap_small_with_small() {
        let mut x: SvoVec<i32, 4> = svovec![1];
        let mut y: SvoVec<i32, 4> = svovec![2, 3, 4];
        x.swap_with(&mut y);
        assert_eq!(x, [2, 3, 4]);
        assert_eq!(y, [1]);
        assert!(x.is_small() && y.is_small());
    }

    #[test]
    fn swap_large_with_large_moves_handles() {
        let mut x: SvoVec<i32, 2> = (0..5).collect();
        let mut y: SvoVec<i32, 2> = (10..20).collect();
        let (px, py) = (x.as_ptr(), y.as_ptr());

        x.swap_with(&mut y);
        assert_eq!(x.as_ptr(), py);
        assert_eq!(y.as_ptr(), px);
        assert_eq!(x.len(), 10);
        assert_eq!(y, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn cursor_walk_matches_indexing() {
        for n in [0usize, 3, 4, 5, 12] {
            let v: SvoVec<usize, 4> = (0..n).map(|i| i * 7).collect();
            let mut seen = Vec::new();
            let mut it = v.begin();
            let end = v.end();
            while it != end {
                seen.push(*it);
                it.inc();
            }
            assert_eq!(seen.len(), n);
            assert_eq!(v.end() - v.begin(), n as isize);
            for (i, x) in seen.iter().enumerate() {
                assert_eq!(*x, v[i]);
            }
        }
    }

    #[test]
    fn cursor_tracks_active_storage() {
        let mut v: SvoVec<u8, 2> = svovec![1, 2];
        assert_eq!(v.begin().addr(), v.as_ptr());
        v.push(3);
        assert_eq!(v.begin().addr(), v.as_ptr());
        assert_eq!(*(v.end() - 1isize), 3);
    }

    #[test]
    fn bool_elements_are_addressable() {
        let mut flags = SvoBoolVec::<2>::new();
        flags.resize(2);
        flags[0] = true.into();
        flags.set_bool(1, false);
        assert_eq!(flags.get_bool(0), Some(true));
        assert_eq!(*flags.begin(), true);

        let a: *const bool = &*flags[0];
        let b: *const bool = &*flags[1];
        assert_ne!(a, b);

        // Large mode too.
        flags.resize(5);
        *flags[4] = true;
        let mut it = flags.begin_mut();
        it += 2;
        **it = true;
        assert_eq!(flags.bools().collect::<Vec<_>>(), [true, false, true, false, true]);
    }

    #[test]
    fn push_pop_cross_threshold() {
        let mut v: SvoVec<i32, 3> = SvoVec::new();
        for i in 0..3 {
            v.push(i);
        }
        assert!(v.is_small());
        v.push(3);
        assert!(!v.is_small());
        assert_eq!(v.pop(), Some(3));
        assert!(v.is_small());
        assert_eq!(v, [0, 1, 2]);
    }

    #[test]
    fn truncate_and_retain_keep_invariant() {
        let mut v: SvoVec<i32, 4> = (0..10).collect();
        v.retain(|x| x % 3 == 0);
        assert_eq!(v, [0, 3, 6, 9]);
        assert!(v.is_small());

        let mut v: SvoVec<i32, 4> = (0..10).collect();
        v.truncate(6);
        assert!(!v.is_small());
        v.truncate(1);
        assert!(v.is_small());
        assert_eq!(v, [0]);
    }

    #[test]
    fn front_and_back() {
        let mut v: SvoVec<i32, 2> = svovec![1, 2, 3];
        assert_eq!(*v.front(), 1);
        assert_eq!(*v.back(), 3);
        *v.front_mut() = 10;
        *v.back_mut() = 30;
        assert_eq!(v, [10, 2, 30]);
        v.resize(1);
        assert_eq!(v.front(), v.back());
    }

    #[test]
    #[should_panic]
    fn back_on_empty_panics() {
        let v: SvoVec<i32, 2> = SvoVec::new();
        let _ = v.back();
    }

    #[test]
    fn no_leaks_or_double_drops_across_crossings() {
        let drops = Rc::new(Cell::new(0));
        let make = |id| Tracked {
            id,
            drops: drops.clone(),
        };
        {
            let mut v: SvoVec<Tracked, 3> = SvoVec::new();
            for i in 0..8 {
                v.push(make(i));
            }
            // 8 -> 2 drops six, moves two inline
            v.truncate(2);
            assert_eq!(drops.get(), 6);
            assert_eq!(v.iter().map(|t| t.id).collect::<Vec<_>>(), [0, 1]);

            let mut other: SvoVec<Tracked, 3> = (10..15).map(make).collect();
            v.swap_with(&mut other);
            assert_eq!(drops.get(), 6);
            assert_eq!(v.len(), 5);
            assert_eq!(other.len(), 2);
        }
        assert_eq!(drops.get(), 6 + 7);
    }

    #[test]
    fn heap_blocks_are_aligned_and_released() {
        let alloc = CountingAlloc::default();
        let mut v: SvoVec<u8, 4, A64, CountingAlloc> = SvoVec::new_in(alloc.clone());
        assert_eq!(v.as_ptr() as usize % 64, 0);

        v.resize(100);
        assert_eq!(v.as_ptr() as usize % 64, 0);
        assert_eq!(alloc.live.get(), 1);

        v.resize(4);
        assert_eq!(alloc.live.get(), 0);
        assert_eq!(v.as_ptr() as usize % 64, 0);
        assert!(alloc.layouts.borrow().iter().all(|l| l.align() == 64));
    }

    #[test]
    fn failed_crossing_leaves_state_intact() {
        let alloc = CountingAlloc::default();
        let mut v: Counted<i32, 4> = SvoVec::new_in(alloc.clone());
        v.extend([1, 2, 3]);

        alloc.fail.set(true);
        assert!(v.try_resize(10).is_err());
        assert_eq!(v, [1, 2, 3]);
        assert_eq!(v.mode(), Mode::Small);

        alloc.fail.set(false);
        v.try_resize(10).unwrap();
        alloc.fail.set(true);
        assert!(v.try_resize(1000).is_err());
        assert_eq!(v.len(), 10);
        assert_eq!(v[..3], [1, 2, 3]);
        assert!(v.try_extend_from_slice(&[0; 1000]).is_err());
        assert_eq!(v.len(), 10);
    }

    #[test]
    fn allocator_is_used_for_every_spill() {
        let alloc = CountingAlloc::default();
        let mut v: Counted<u16, 2> = SvoVec::new_in(alloc.clone());
        for round in 1..=3 {
            v.resize(10);
            v.resize(0);
            assert_eq!(alloc.total.get(), round);
            assert_eq!(alloc.live.get(), 0);
        }
    }

    #[test]
    fn alignment_constant() {
        assert_eq!(SvoVec::<u8, 4>::ALIGN, 16);
        assert_eq!(SvoVec::<u8, 4, A32>::ALIGN, 32);
        assert_eq!(SvoVec::<u8, 4>::SMALL_CAPACITY, 4);
    }

    #[test]
    fn conversions() {
        let v: SvoVec<i32, 2> = SvoVec::from(&[1, 2, 3][..]);
        let w: Vec<i32> = v.clone().into();
        assert_eq!(w, vec![1, 2, 3]);
        assert_eq!(v, w);
        let x: SvoVec<i32, 8> = SvoVec::from([1, 2, 3]);
        assert_eq!(v, x);
        assert_eq!(format!("{v:?}"), "[1, 2, 3]");
        assert_eq!(format!("{:?}", x.storage()), "Small([1, 2, 3])");
    }

    #[test]
    fn zero_sized_elements() {
        let mut v: SvoVec<(), 2> = SvoVec::new();
        v.resize(1000);
        assert_eq!(v.len(), 1000);
        assert!(!v.is_small());
        v.resize(1);
        assert!(v.is_small());
    }
}
