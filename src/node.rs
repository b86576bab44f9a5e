/// Arena slot. Slot 0 of every list is the sentinel and never holds a value.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) next: Option<usize>,
    pub(crate) generation: u32,
}

impl<T> Node<T> {
    pub(crate) fn sentinel() -> Self {
        Self {
            value: None,
            next: None,
            generation: 0,
        }
    }

    /// Is this slot holding an element (not the sentinel, not freed)?
    pub(crate) fn is_live(&self) -> bool {
        self.value.is_some()
    }

    /// Empties the slot and bumps its generation so old handles go stale.
    pub(crate) fn release(&mut self) -> Option<T> {
        self.next = None;
        self.generation = self.generation.wrapping_add(1);
        self.value.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_bumps_generation() {
        let mut node = Node {
            value: Some(7),
            next: Some(3),
            generation: 4,
        };
        assert!(node.is_live());
        assert_eq!(node.release(), Some(7));
        assert!(!node.is_live());
        assert_eq!(node.next, None);
        assert_eq!(node.generation, 5);
    }

    #[test]
    fn sentinel_is_not_live() {
        assert!(!Node::<u8>::sentinel().is_live());
    }
}
