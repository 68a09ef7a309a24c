//! Unique-by-construction numeric IDs.
//!
//! Type variables and incomplete types carry no distinguishing payload: two
//! variables named `n` are different variables unless one is a copy of the
//! other. A [`Uid`] makes that notion of identity explicit on the value
//! level. If a pair of [`Uid`] values are equal, then they are guaranteed to
//! be copies of each other: one must have been created by [`Uid::fresh`],
//! and the other must be a copy of that original [`Uid`]. Identity therefore
//! survives cloning, sharing, and substitution rebuilds without any reliance
//! on allocation addresses.
//!
//! Ids are drawn from a process-global atomic counter. With `2^32` ids
//! emitted sequentially, exhaustion is not a practical concern for any
//! single checking pass.

use std::{
    num::NonZeroU32,
    sync::atomic::{AtomicU32, Ordering},
};

static COUNTER: AtomicU32 = AtomicU32::new(1);

/// A unique-by-construction numeric identifier.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Uid(NonZeroU32);

impl std::fmt::Debug for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "⟨{}⟩", self.0)
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "⟨{}⟩", self.0)
    }
}

impl From<Uid> for u32 {
    fn from(value: Uid) -> Self {
        value.0.into()
    }
}

impl Uid {
    /// Returns a new unique [`Uid`].
    pub fn fresh() -> Uid {
        let raw_id = COUNTER.fetch_add(1, Ordering::Relaxed);

        // SAFETY: COUNTER is initialized to 1, and will monotonically increase
        // for the (practical) lifetime of the program; hence raw_id is never 0
        let uid = unsafe { NonZeroU32::new_unchecked(raw_id) };
        Uid(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::Uid;

    #[test]
    fn id_uniqueness() {
        let a = Uid::fresh();
        let b = Uid::fresh();
        let c = Uid::fresh();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn copies_compare_equal() {
        let a = Uid::fresh();
        let b = a;
        assert_eq!(a, b);
    }
}
