use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

mod sealed {
    pub trait Sealed {}
}

/// Marks what a [`Handle`] may do with the element it denotes.
pub trait Access: sealed::Sealed {}

/// Handles of this kind can be passed to [`ForwardList::get_mut`](crate::ForwardList::get_mut).
#[derive(Debug)]
pub enum Mutable {}

/// Handles of this kind only give shared access to elements.
#[derive(Debug)]
pub enum ReadOnly {}

impl sealed::Sealed for Mutable {}
impl sealed::Sealed for ReadOnly {}
impl Access for Mutable {}
impl Access for ReadOnly {}

pub type MutHandle = Handle<Mutable>;
pub type ConstHandle = Handle<ReadOnly>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Slot {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// A forward position in a [`ForwardList`](crate::ForwardList).
///
/// A handle denotes the before-begin sentinel, an element, or the end
/// position (also the `Default`). It carries no borrow of the list, so it can
/// be held across mutations; the list checks it on every use and reports
/// [`ListError::StaleHandle`](crate::ListError::StaleHandle) once the element
/// it denoted has been removed.
///
/// Handles of both access kinds compare equal when they denote the same
/// position.
pub struct Handle<A: Access> {
    pub(crate) slot: Option<Slot>,
    _access: PhantomData<fn() -> A>,
}

impl<A: Access> Handle<A> {
    pub(crate) const fn at(index: usize, generation: u32) -> Self {
        Self {
            slot: Some(Slot { index, generation }),
            _access: PhantomData,
        }
    }

    pub(crate) const fn end() -> Self {
        Self {
            slot: None,
            _access: PhantomData,
        }
    }

    pub(crate) fn cast<B: Access>(self) -> Handle<B> {
        Handle {
            slot: self.slot,
            _access: PhantomData,
        }
    }

    /// Is this the end (or default) position?
    pub fn is_end(&self) -> bool {
        self.slot.is_none()
    }

    /// Returns the raw arena index for debugging or external maps.
    pub fn as_raw(&self) -> Option<usize> {
        self.slot.map(|s| s.index)
    }
}

impl From<MutHandle> for ConstHandle {
    fn from(h: MutHandle) -> Self {
        h.cast()
    }
}

impl<A: Access> Clone for Handle<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Access> Copy for Handle<A> {}

impl<A: Access> Default for Handle<A> {
    fn default() -> Self {
        Self::end()
    }
}

impl<A: Access, B: Access> PartialEq<Handle<B>> for Handle<A> {
    fn eq(&self, other: &Handle<B>) -> bool {
        self.slot == other.slot
    }
}

impl<A: Access> Eq for Handle<A> {}

impl<A: Access> Hash for Handle<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
    }
}

impl<A: Access> fmt::Debug for Handle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(Slot { index, generation }) => f
                .debug_struct("Handle")
                .field("index", &index)
                .field("generation", &generation)
                .finish(),
            None => f.write_str("Handle(end)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_end_and_equal() {
        let a = MutHandle::default();
        let b = ConstHandle::default();
        assert!(a.is_end());
        assert_eq!(a, b);
        assert_eq!(a.as_raw(), None);
    }

    #[test]
    fn cross_kind_equality_follows_slot() {
        let m = MutHandle::at(3, 1);
        let c: ConstHandle = m.into();
        assert_eq!(m, c);
        assert_eq!(c, m);
        assert_ne!(m, ConstHandle::at(3, 2));
        assert_ne!(m, ConstHandle::end());
    }
}
