use crate::{
    errors::ListError,
    handle::{Access, ConstHandle, Handle, MutHandle},
    iter::{Handles, IntoIter, Iter, IterMut},
    node::Node,
};
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;
use tracing::trace;

/// Arena index of the before-begin sentinel.
const SENTINEL: usize = 0;

/// A singly-linked list with a permanent sentinel head.
///
/// Nodes live in an arena owned by the list and link to their successor by
/// index, so dropping a long list never recurses. Freed slots are recycled.
/// Positions are [`Handle`]s: plain values the list validates on each use.
pub struct ForwardList<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
    /// Generation given to freshly pushed slots. Raised whenever the arena is
    /// rebuilt so handles from before the rebuild stay stale.
    base_generation: u32,
}

impl<T> Default for ForwardList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ForwardList<T> {
    /// Create an empty list: just the sentinel, no successor.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    fn starting_at(base_generation: u32) -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            len: 0,
            base_generation,
        }
    }

    /// Build a list in input order, stopping at the first error.
    ///
    /// The list under construction is only returned on full success, so a
    /// failure partway leaves nothing half-built behind.
    pub fn try_from_iter<I, E>(iter: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        Self::build(0, iter)
    }

    fn build<I, E>(base_generation: u32, iter: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut tmp = Self::starting_at(base_generation);
        let mut pos = SENTINEL;
        for value in iter {
            pos = tmp.link_after(pos, value?);
        }
        Ok(tmp)
    }

    /// Replace the contents with `iter`, or leave them untouched if any item
    /// fails.
    pub fn try_assign<I, E>(&mut self, iter: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut tmp = Self::build(self.fresh_generation(), iter)?;
        self.swap(&mut tmp);
        Ok(())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The sentinel position, usable as an anchor for front insertion/removal.
    pub fn before_begin(&self) -> MutHandle {
        Handle::at(SENTINEL, self.nodes[SENTINEL].generation)
    }

    pub fn cbefore_begin(&self) -> ConstHandle {
        self.before_begin().into()
    }

    /// First element, or end if the list is empty.
    pub fn begin(&self) -> MutHandle {
        self.handle_for(self.nodes[SENTINEL].next)
    }

    pub fn cbegin(&self) -> ConstHandle {
        self.begin().into()
    }

    pub fn end(&self) -> MutHandle {
        Handle::end()
    }

    pub fn cend(&self) -> ConstHandle {
        Handle::end()
    }

    /// Step a handle to the next position.
    ///
    /// The sentinel advances to `begin()`, the last element to end.
    pub fn advance<A: Access>(&self, pos: Handle<A>) -> Result<Handle<A>, ListError> {
        let idx = self.resolve(pos)?;
        Ok(self.handle_for(self.nodes[idx].next))
    }

    /// Element at `pos`; `None` for the sentinel, end, or a stale handle.
    pub fn get<A: Access>(&self, pos: Handle<A>) -> Option<&T> {
        let idx = self.resolve(pos).ok()?;
        self.nodes[idx].value.as_ref()
    }

    pub fn get_mut(&mut self, pos: MutHandle) -> Option<&mut T> {
        let idx = self.resolve(pos).ok()?;
        self.nodes[idx].value.as_mut()
    }

    pub fn front(&self) -> Option<&T> {
        self.get(self.cbegin())
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.begin())
    }

    /// Link `value` as the new first element.
    pub fn push_front(&mut self, value: T) -> MutHandle {
        let id = self.link_after(SENTINEL, value);
        self.handle_for(Some(id))
    }

    /// Splice `value` in right after `pos` and return its handle.
    ///
    /// `pos` must be the sentinel or an element of this list.
    pub fn insert_after<A: Access>(
        &mut self,
        pos: Handle<A>,
        value: T,
    ) -> Result<MutHandle, ListError> {
        let before = self.resolve(pos)?;
        let id = self.link_after(before, value);
        Ok(self.handle_for(Some(id)))
    }

    /// Like [`insert_after`](Self::insert_after), with a fallible value
    /// constructor.
    ///
    /// `pos` is checked before `make` runs. If `make` fails, the list is
    /// exactly as it was.
    pub fn try_insert_after_with<A, E, F>(
        &mut self,
        pos: Handle<A>,
        make: F,
    ) -> Result<MutHandle, E>
    where
        A: Access,
        E: From<ListError>,
        F: FnOnce() -> Result<T, E>,
    {
        let before = self.resolve(pos)?;
        let value = make()?;
        let id = self.link_after(before, value);
        Ok(self.handle_for(Some(id)))
    }

    /// Drop the element after `pos` and return the position now following
    /// `pos` (end if none).
    pub fn erase_after<A: Access>(&mut self, pos: Handle<A>) -> Result<MutHandle, ListError> {
        let before = self.resolve(pos)?;
        drop(self.unlink_after(before)?);
        Ok(self.handle_for(self.nodes[before].next))
    }

    /// Unlink the element after `pos` and hand it back.
    pub fn remove_after<A: Access>(&mut self, pos: Handle<A>) -> Result<T, ListError> {
        let before = self.resolve(pos)?;
        self.unlink_after(before)
    }

    /// Remove the first element. Returns `None` on an empty list.
    pub fn pop_front(&mut self) -> Option<T> {
        self.unlink_after(SENTINEL).ok()
    }

    /// Remove every element, first to last, one node per step.
    ///
    /// Outstanding element handles go stale.
    pub fn clear(&mut self) {
        let released = self.len;
        while self.pop_front().is_some() {}
        self.base_generation = self.fresh_generation();
        self.nodes.truncate(1);
        self.free.clear();
        trace!(released, "cleared forward list");
    }

    /// Rebuild the arena in list order, dropping recycled slots.
    ///
    /// Outstanding element handles go stale; the sentinel handle stays valid.
    pub fn compact(&mut self) {
        let generation = self.fresh_generation();
        let order: Vec<usize> = self.chain().collect();
        let mut values: Vec<Option<T>> = mem::take(&mut self.nodes)
            .into_iter()
            .map(|n| n.value)
            .collect();
        let reclaimed = values.len() - 1 - order.len();

        self.nodes = Vec::with_capacity(order.len() + 1);
        self.nodes.push(Node::sentinel());
        for (pos, idx) in order.into_iter().enumerate() {
            self.nodes[pos].next = Some(pos + 1);
            self.nodes.push(Node {
                value: values[idx].take(),
                next: None,
                generation,
            });
        }
        self.free.clear();
        self.base_generation = generation;
        trace!(len = self.len, reclaimed, "compacted forward list");
    }

    /// Exchange contents with `other` without touching any element.
    ///
    /// Element handles follow their elements into the other list.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.nodes, &mut other.nodes);
        mem::swap(&mut self.free, &mut other.free);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.base_generation, &mut other.base_generation);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.nodes[SENTINEL].next, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let head = self.nodes[SENTINEL].next;
        IterMut::new(&mut self.nodes, head, self.len)
    }

    /// Iterate `(ConstHandle, &T)` in list order.
    pub fn handles(&self) -> Handles<'_, T> {
        Handles::new(&self.nodes, self.nodes[SENTINEL].next, self.len)
    }

    fn handle_for<A: Access>(&self, idx: Option<usize>) -> Handle<A> {
        match idx {
            Some(i) => Handle::at(i, self.nodes[i].generation),
            None => Handle::end(),
        }
    }

    fn resolve<A: Access>(&self, pos: Handle<A>) -> Result<usize, ListError> {
        let slot = pos.slot.ok_or(ListError::PastEnd)?;
        match self.nodes.get(slot.index) {
            Some(n)
                if n.generation == slot.generation && (slot.index == SENTINEL || n.is_live()) =>
            {
                Ok(slot.index)
            }
            _ => Err(ListError::StaleHandle),
        }
    }

    fn chain(&self) -> impl Iterator<Item = usize> + '_ {
        core::iter::successors(self.nodes[SENTINEL].next, move |&i| self.nodes[i].next)
    }

    fn fresh_generation(&self) -> u32 {
        self.nodes
            .iter()
            .map(|n| n.generation)
            .fold(self.base_generation, u32::max)
            .wrapping_add(1)
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        match self.free.pop() {
            Some(id) => {
                let node = &mut self.nodes[id];
                debug_assert!(!node.is_live(), "free list holds a live slot");
                node.value = Some(value);
                node.next = next;
                id
            }
            None => {
                self.nodes.push(Node {
                    value: Some(value),
                    next,
                    generation: self.base_generation,
                });
                self.nodes.len() - 1
            }
        }
    }

    fn link_after(&mut self, before: usize, value: T) -> usize {
        let next = self.nodes[before].next;
        let id = self.alloc(value, next);
        self.nodes[before].next = Some(id);
        self.len += 1;
        id
    }

    fn unlink_after(&mut self, before: usize) -> Result<T, ListError> {
        let target = self.nodes[before].next.ok_or(ListError::NothingAfter)?;
        debug_assert!(self.len > 0);
        let node = &mut self.nodes[target];
        let next = node.next;
        let value = node.release();
        self.nodes[before].next = next;
        self.free.push(target);
        self.len -= 1;
        Ok(value.expect("linked node holds a value"))
    }
}

/// Free-function form of [`ForwardList::swap`].
pub fn swap<T>(lhs: &mut ForwardList<T>, rhs: &mut ForwardList<T>) {
    lhs.swap(rhs);
}

impl<T: Clone> Clone for ForwardList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    /// Copy-then-swap: a panicking element `clone` leaves `self` intact.
    fn clone_from(&mut self, source: &Self) {
        let copied = Self::build(
            self.fresh_generation(),
            source.iter().cloned().map(Ok::<T, Infallible>),
        );
        let mut tmp = match copied {
            Ok(list) => list,
            Err(never) => match never {},
        };
        self.swap(&mut tmp);
    }
}

impl<T> FromIterator<T> for ForwardList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        match Self::build(0, iter.into_iter().map(Ok::<T, Infallible>)) {
            Ok(list) => list,
            Err(never) => match never {},
        }
    }
}

impl<T, const N: usize> From<[T; N]> for ForwardList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> IntoIterator for ForwardList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a ForwardList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ForwardList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for ForwardList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ForwardList<T> {}

impl<T: PartialOrd> PartialOrd for ForwardList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for ForwardList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for ForwardList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ForwardList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    #[derive(Debug, Clone)]
    enum Op {
        PushFront(u8),
        InsertAfter(Index, u8),
        EraseAfter(Index),
        PopFront,
        Clear,
        Compact,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::PushFront),
            3 => (any::<Index>(), any::<u8>()).prop_map(|(i, v)| Op::InsertAfter(i, v)),
            2 => any::<Index>().prop_map(Op::EraseAfter),
            1 => Just(Op::PopFront),
            1 => Just(Op::Clear),
            1 => Just(Op::Compact),
        ]
    }

    /// Position `steps` forward from before-begin.
    fn anchor(list: &ForwardList<u8>, steps: usize) -> ConstHandle {
        let mut pos = list.cbefore_begin();
        for _ in 0..steps {
            pos = list.advance(pos).unwrap();
        }
        pos
    }

    proptest! {
        #[test]
        fn matches_vec_model(ops in prop::collection::vec(op(), 0..64)) {
            let mut list = ForwardList::new();
            let mut model: Vec<u8> = Vec::new();

            for op in ops {
                match op {
                    Op::PushFront(v) => {
                        list.push_front(v);
                        model.insert(0, v);
                    }
                    Op::InsertAfter(i, v) => {
                        let at = i.index(model.len() + 1);
                        let pos = list.insert_after(anchor(&list, at), v).unwrap();
                        prop_assert_eq!(list.get(pos), Some(&v));
                        model.insert(at, v);
                    }
                    Op::EraseAfter(i) if !model.is_empty() => {
                        let at = i.index(model.len());
                        let next = list.erase_after(anchor(&list, at)).unwrap();
                        model.remove(at);
                        prop_assert_eq!(list.get(next), model.get(at));
                    }
                    Op::EraseAfter(_) => {
                        let res = list.erase_after(list.cbefore_begin());
                        prop_assert_eq!(res, Err(ListError::NothingAfter));
                    }
                    Op::PopFront => {
                        let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                        prop_assert_eq!(list.pop_front(), expected);
                    }
                    Op::Clear => {
                        list.clear();
                        model.clear();
                    }
                    Op::Compact => list.compact(),
                }

                prop_assert_eq!(list.len(), model.len());
                prop_assert_eq!(list.iter().count(), list.len());
                prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
            }
        }

        #[test]
        fn copy_then_mutate_is_independent(
            values in prop::collection::vec(any::<i32>(), 0..32),
            extra in any::<i32>(),
        ) {
            let original: ForwardList<i32> = values.iter().copied().collect();
            let mut copy = original.clone();
            copy.push_front(extra);
            prop_assert_eq!(original.iter().copied().collect::<Vec<_>>(), values);
            prop_assert_eq!(copy.len(), original.len() + 1);
        }
    }
}
