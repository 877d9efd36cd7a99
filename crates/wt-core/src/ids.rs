//! Typed arena indices for components and pipes.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::num::NonZeroU32;

/// Names the arena an [`Idx`] points into.
pub trait Arena {
    const NAME: &'static str;
}

/// `Network::components`
#[derive(Debug)]
pub enum Components {}

/// `Network::pipes`
#[derive(Debug)]
pub enum Pipes {}

impl Arena for Components {
    const NAME: &'static str = "comp";
}

impl Arena for Pipes {
    const NAME: &'static str = "pipe";
}

/// Position in one network arena, stored as `index + 1` so `Option<Idx<_>>`
/// stays four bytes. The arena tag keeps component and pipe positions from
/// being swapped.
pub struct Idx<A> {
    raw: NonZeroU32,
    _arena: PhantomData<fn() -> A>,
}

pub type CompId = Idx<Components>;
pub type PipeId = Idx<Pipes>;

impl<A> Idx<A> {
    pub fn from_index(index: u32) -> Self {
        Self {
            raw: NonZeroU32::MIN.saturating_add(index),
            _arena: PhantomData,
        }
    }

    pub fn index(self) -> u32 {
        self.raw.get() - 1
    }

    /// Index as `usize`, for slice access.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl<A> Clone for Idx<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Idx<A> {}

impl<A> PartialEq for Idx<A> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<A> Eq for Idx<A> {}

impl<A> PartialOrd for Idx<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Idx<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<A> Hash for Idx<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<A: Arena> fmt::Debug for Idx<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", A::NAME, self.index())
    }
}

impl<A> fmt::Display for Idx<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
