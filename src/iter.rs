use crate::{
    handle::{ConstHandle, Handle},
    list::ForwardList,
    node::Node,
};
use core::iter::FusedIterator;
use core::marker::PhantomData;

/// Iterator over `&T` in list order.
#[derive(Debug)]
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    next: Option<usize>,
    remaining: usize,
}

/// Iterator over `&mut T` in list order.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    nodes: *mut Node<T>,
    arena_len: usize,
    next: Option<usize>,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

/// Iterator over `(ConstHandle, &T)` in list order.
#[derive(Debug)]
pub struct Handles<'a, T> {
    nodes: &'a [Node<T>],
    next: Option<usize>,
    remaining: usize,
}

/// Owning iterator; pops from the front.
#[derive(Debug)]
pub struct IntoIter<T> {
    list: ForwardList<T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a [Node<T>], head: Option<usize>, len: usize) -> Self {
        Self {
            nodes,
            next: head,
            remaining: len,
        }
    }
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(nodes: &'a mut [Node<T>], head: Option<usize>, len: usize) -> Self {
        Self {
            nodes: nodes.as_mut_ptr(),
            arena_len: nodes.len(),
            next: head,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Handles<'a, T> {
    pub(crate) fn new(nodes: &'a [Node<T>], head: Option<usize>, len: usize) -> Self {
        Self {
            nodes,
            next: head,
            remaining: len,
        }
    }
}

impl<T> IntoIter<T> {
    pub(crate) fn new(list: ForwardList<T>) -> Self {
        Self { list }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        assert!(idx < self.arena_len, "link out of arena bounds");
        // SAFETY: `nodes` comes from a slice borrowed mutably for 'a and `idx`
        // is in bounds. The chain is acyclic, so every index is visited at
        // most once and the references handed out never alias.
        let node = unsafe { &mut *self.nodes.add(idx) };
        self.next = node.next;
        self.remaining -= 1;
        node.value.as_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> Iterator for Handles<'a, T> {
    type Item = (ConstHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let nodes = self.nodes;
        let node = &nodes[idx];
        self.next = node.next;
        self.remaining -= 1;
        let value = node.value.as_ref()?;
        Some((Handle::at(idx, node.generation), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> ExactSizeIterator for Handles<'_, T> {}
impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for Iter<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}
impl<T> FusedIterator for Handles<'_, T> {}
impl<T> FusedIterator for IntoIter<T> {}

// SAFETY: `IterMut` behaves like `&'a mut [Node<T>]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}
