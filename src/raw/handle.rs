use core::num::NonZero;

// `u16` under test so arena capacity exhaustion is reachable in a test run.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable index into an [`Arena`](super::arena::Arena).
///
/// Stored as `NonZero` of the index plus one so that `Option<Handle>` has no
/// size penalty. Node links in the tree are all `Option<Handle>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest index a `Handle` can represent.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` cannot be zero and cannot overflow `RawHandle` after the assert.
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        Self(NonZero::new(raw).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
