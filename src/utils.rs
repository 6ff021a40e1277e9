/// Marks the calling branch as unlikely.
#[cold]
#[inline(always)]
pub(crate) const fn cold_path() {}

/// Implements the slice-backed trait surface for a buffer type.
///
/// The type must provide `as_slice` and `as_mut_slice`; every trait below goes
/// through one of the two. Generic parameters other than `T` are passed in braces:
///
/// ```ignore
/// impl_slice_traits!({const K: usize, A: Alignment} InlineBuf<T, K, A>);
/// ```
macro_rules! impl_slice_traits {
    ({ $($gen:tt)* } $name:ty) => {
        impl<T, $($gen)*> core::ops::Deref for $name {
            type Target = [T];
            #[inline]
            fn deref(&self) -> &[T] {
                self.as_slice()
            }
        }

        impl<T, $($gen)*> core::ops::DerefMut for $name {
            #[inline]
            fn deref_mut(&mut self) -> &mut [T] {
                self.as_mut_slice()
            }
        }

        $crate::utils::impl_slice_traits!(@view { $($gen)* } $name;
            core::convert::AsRef.as_ref / core::convert::AsMut.as_mut,
            core::borrow::Borrow.borrow / core::borrow::BorrowMut.borrow_mut,
        );

        impl<T, I: core::slice::SliceIndex<[T]>, $($gen)*> core::ops::Index<I> for $name {
            type Output = I::Output;
            #[inline]
            fn index(&self, index: I) -> &I::Output {
                &self.as_slice()[index]
            }
        }

        impl<T, I: core::slice::SliceIndex<[T]>, $($gen)*> core::ops::IndexMut<I> for $name {
            #[inline]
            fn index_mut(&mut self, index: I) -> &mut I::Output {
                &mut self.as_mut_slice()[index]
            }
        }

        impl<'a, T, $($gen)*> IntoIterator for &'a $name {
            type Item = &'a T;
            type IntoIter = core::slice::Iter<'a, T>;
            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.as_slice().iter()
            }
        }

        impl<'a, T, $($gen)*> IntoIterator for &'a mut $name {
            type Item = &'a mut T;
            type IntoIter = core::slice::IterMut<'a, T>;
            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.as_mut_slice().iter_mut()
            }
        }

        impl<T: core::fmt::Debug, $($gen)*> core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_list().entries(self.as_slice()).finish()
            }
        }

        impl<T: core::hash::Hash, $($gen)*> core::hash::Hash for $name {
            #[inline]
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash(self.as_slice(), state);
            }
        }

        impl<T: Eq, $($gen)*> Eq for $name {}

        impl<T: Ord, $($gen)*> Ord for $name {
            #[inline]
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                self.as_slice().cmp(other.as_slice())
            }
        }

        impl<T: PartialOrd, $($gen)*> PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                self.as_slice().partial_cmp(other.as_slice())
            }
        }

        // Element-wise equality against the usual slice-like right-hand sides.
        $crate::utils::impl_slice_traits!(@eq { $($gen)* } $name;
            {} [U],
            {} &[U],
            {} &mut [U],
            {const P: usize,} [U; P],
            {const P: usize,} &[U; P],
            {} alloc::vec::Vec<U>,
        );
    };

    (@view { $($gen:tt)* } $name:ty;) => {};
    (@view { $($gen:tt)* } $name:ty;
        $($shared:ident)::+ . $by_ref:ident / $($unique:ident)::+ . $by_mut:ident,
        $($rest:tt)*
    ) => {
        impl<T, $($gen)*> $($shared)::+<[T]> for $name {
            #[inline]
            fn $by_ref(&self) -> &[T] {
                self.as_slice()
            }
        }

        impl<T, $($gen)*> $($unique)::+<[T]> for $name {
            #[inline]
            fn $by_mut(&mut self) -> &mut [T] {
                self.as_mut_slice()
            }
        }

        $crate::utils::impl_slice_traits!(@view { $($gen)* } $name; $($rest)*);
    };

    (@eq { $($gen:tt)* } $name:ty;) => {};
    (@eq { $($gen:tt)* } $name:ty; { $($extra:tt)* } $rhs:ty, $($rest:tt)*) => {
        impl<T, U, $($extra)* $($gen)*> PartialEq<$rhs> for $name
        where
            T: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool {
                self.as_slice() == &other[..]
            }
        }

        $crate::utils::impl_slice_traits!(@eq { $($gen)* } $name; $($rest)*);
    };
}

pub(crate) use impl_slice_traits;
