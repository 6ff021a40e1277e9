use core::{
    fmt,
    ops::{Deref, DerefMut, Not},
};

/// An addressable boolean element.
///
/// A sequence of booleans stored as `BoolSlot` always hands out real references
/// from indexing and cursors; nothing is packed into bits. Use it through
/// [`SvoBoolVec`](crate::SvoBoolVec).
///
/// `BoolSlot` converts to and from `bool`, derefs to `bool` and compares equal to `bool`.
///
/// # Examples
///
/// ```
/// # use svovec::{BoolSlot, SvoBoolVec};
/// let mut flags = SvoBoolVec::<4>::new();
/// flags.resize(3);
///
/// flags[1] = true.into();
/// *flags[2] = true;
///
/// assert_eq!(flags[0], false);
/// assert_eq!(flags[1], true);
/// assert!(bool::from(flags[2]));
///
/// let r: &mut bool = &mut flags[0];
/// *r = true;
/// assert_eq!(flags.bools().collect::<Vec<_>>(), [true, true, true]);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BoolSlot {
    pub value: bool,
}

impl BoolSlot {
    #[inline(always)]
    pub const fn new(value: bool) -> Self {
        Self { value }
    }

    #[inline(always)]
    pub const fn get(self) -> bool {
        self.value
    }

    #[inline(always)]
    pub const fn set(&mut self, value: bool) {
        self.value = value;
    }
}

impl From<bool> for BoolSlot {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self { value }
    }
}

impl From<BoolSlot> for bool {
    #[inline(always)]
    fn from(slot: BoolSlot) -> Self {
        slot.value
    }
}

impl Deref for BoolSlot {
    type Target = bool;
    #[inline(always)]
    fn deref(&self) -> &bool {
        &self.value
    }
}

impl DerefMut for BoolSlot {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut bool {
        &mut self.value
    }
}

impl AsRef<bool> for BoolSlot {
    #[inline(always)]
    fn as_ref(&self) -> &bool {
        &self.value
    }
}

impl AsMut<bool> for BoolSlot {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut bool {
        &mut self.value
    }
}

impl PartialEq<bool> for BoolSlot {
    #[inline(always)]
    fn eq(&self, other: &bool) -> bool {
        self.value == *other
    }
}

impl PartialEq<BoolSlot> for bool {
    #[inline(always)]
    fn eq(&self, other: &BoolSlot) -> bool {
        *self == other.value
    }
}

impl Not for BoolSlot {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self { value: !self.value }
    }
}

impl fmt::Debug for BoolSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl fmt::Display for BoolSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn converts_both_ways() {
        let slot: BoolSlot = true.into();
        assert!(slot.get());
        assert!(bool::from(slot));
        assert_eq!(!slot, false);
        assert_eq!(BoolSlot::default(), false);
    }

    #[test]
    fn reference_is_a_real_bool() {
        let mut slot = BoolSlot::new(false);
        let r: &mut bool = &mut slot;
        *r = true;
        assert_eq!(slot, true);
        assert_eq!(core::mem::size_of::<BoolSlot>(), 1);
    }

    #[test]
    fn formats_like_bool() {
        assert_eq!(format!("{:?}", BoolSlot::new(true)), "true");
        assert_eq!(format!("{}", BoolSlot::new(false)), "false");
    }
}
