//! ## Intro
//!
//! A vector with small-size optimization that keeps up to `K` elements in an
//! aligned inline buffer and moves them to an aligned heap block when it grows
//! past `K`.
//!
//! Similar to [`SmallVec`], but the alignment of both buffers is part of the type,
//! heap blocks come from a pluggable [`AlignedAlloc`], and the vector moves back
//! inline as soon as its length drops to `K` again.
//!
//! ```
//! # use svovec::{Mode, SvoVec, svovec};
//! let mut v: SvoVec<i32, 4> = svovec![1, 2, 3];
//! assert_eq!(v.mode(), Mode::Small);
//!
//! v.resize(8);
//! assert_eq!(v.mode(), Mode::Large);
//! assert_eq!(v, [1, 2, 3, 0, 0, 0, 0, 0]);
//!
//! v.resize(2);
//! assert_eq!(v.mode(), Mode::Small);
//! assert_eq!(v, [1, 2]);
//! ```
//!
//! ## Containers
//!
//! | Type | Storage | Capacity |
//! |------|---------|----------|
//! | [`InlineBuf<T, K, A>`] | inline, aligned to `A` | fixed, `K` (panics past it) |
//! | [`HeapBuf<T, A, M>`] | heap block from `M`, aligned to `A` | grows |
//! | [`SvoVec<T, K, A, M>`] | one of the two, chosen by length | grows |
//!
//! The [`SvoVec`] is in [`Mode::Small`] exactly when `len() <= K`.
//! A length change that crosses `K` moves the live elements once:
//!
//! - growing moves all current elements to the heap, then fills the new slots;
//! - shrinking drops the tail, moves the first `n` elements inline and releases the heap block.
//!
//! ## Alignment
//!
//! The alignment is chosen with a marker type from [`align`], `A16` by default.
//! The effective alignment is `max(A::ALIGN, align_of::<T>())`.
//!
//! ```
//! # use svovec::{SvoVec, align::A64};
//! let mut v: SvoVec<u8, 16, A64> = SvoVec::new();
//! v.resize(3);
//! assert_eq!(v.as_ptr() as usize % 64, 0);
//! v.resize(300);
//! assert_eq!(v.as_ptr() as usize % 64, 0);
//! ```
//!
//! ## Cursors
//!
//! [`SvoVec::begin`] and [`SvoVec::end`] return random-access [`Cursor`]s over the
//! active storage. Slice iteration through `Deref<Target = [T]>` works as well.
//!
//! ## Booleans
//!
//! [`SvoBoolVec`] stores [`BoolSlot`]s, so every element is an addressable `bool`.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`. The `std` feature (default) adds
//! `std::io::Write` for byte vectors.
//!
//! ## Optional features
//!
//! ### `serde`
//!
//! When this optional dependency is enabled,
//! [`SvoVec`] and [`BoolSlot`] implement the [`serde::Serialize`] and [`serde::Deserialize`] traits.
//!
//! [`serde::Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`serde::Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html
//! [`SmallVec`]: https://docs.rs/smallvec/latest/smallvec
#![no_std]

extern crate alloc;

mod utils;

pub mod align;
pub mod allocator;
pub mod bool_slot;
pub mod cursor;
pub mod heap_buf;
pub mod inline_buf;
pub mod svo_vec;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

#[doc(inline)]
pub use allocator::{AlignedAlloc, Global, TryReserveError};
#[doc(inline)]
pub use bool_slot::BoolSlot;
#[doc(inline)]
pub use cursor::Cursor;
#[doc(inline)]
pub use heap_buf::HeapBuf;
#[doc(inline)]
pub use inline_buf::InlineBuf;
#[doc(inline)]
pub use svo_vec::{Mode, Storage, SvoBoolVec, SvoVec};
