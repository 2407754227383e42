use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed, generational handle to a GPU resource.
///
/// Handles are plain identifiers; the render graph never allocates or frees
/// the objects behind them, it only tracks access history keyed by them.
pub struct Handle<T> {
    pub slot: u16,
    pub generation: u16,
    phantom: PhantomData<T>,
}

impl<T> Handle<T> {
    pub fn new(slot: u16, generation: u16) -> Self {
        Self { slot, generation, phantom: PhantomData }
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({}:{})", self.slot, self.generation)
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Slot pool producing [`Handle`]s.
///
/// Releasing a slot bumps its generation so stale handles can be detected.
pub struct Pool<T> {
    items: Vec<Option<T>>,
    empty: Vec<usize>,
    generation: Vec<u16>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new(64)
    }
}

impl<T> Pool<T> {
    pub fn new(initial_size: usize) -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(initial_size),
            empty: (0..initial_size).rev().collect(),
            generation: vec![0; initial_size],
        };
        pool.items.resize_with(initial_size, || None);
        pool
    }

    pub fn insert(&mut self, item: T) -> Handle<T> {
        let slot = match self.empty.pop() {
            Some(slot) => slot,
            None => {
                let slot = self.items.len();
                self.items.push(None);
                self.generation.push(0);
                slot
            }
        };
        self.items[slot] = Some(item);
        Handle::new(slot as u16, self.generation[slot])
    }

    pub fn release(&mut self, handle: Handle<T>) {
        let slot = handle.slot as usize;
        if self.generation[slot] == handle.generation {
            self.items[slot] = None;
            self.generation[slot] = self.generation[slot].wrapping_add(1);
            self.empty.push(slot);
        }
    }

    pub fn get_ref(&self, handle: Handle<T>) -> Option<&T> {
        let slot = handle.slot as usize;
        if self.generation.get(slot) == Some(&handle.generation) {
            self.items[slot].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut_ref(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = handle.slot as usize;
        if self.generation.get(slot) == Some(&handle.generation) {
            self.items[slot].as_mut()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handles_are_rejected() {
        let mut pool = Pool::new(4);
        let a = pool.insert(10u32);
        assert_eq!(pool.get_ref(a), Some(&10));
        pool.release(a);
        assert_eq!(pool.get_ref(a), None);
        let b = pool.insert(20u32);
        assert_eq!(pool.get_ref(b), Some(&20));
        assert_ne!(a, b);
    }

    #[test]
    fn pool_grows_past_initial_size() {
        let mut pool = Pool::new(1);
        let a = pool.insert(1u32);
        let b = pool.insert(2u32);
        assert_eq!(pool.get_ref(a), Some(&1));
        assert_eq!(pool.get_ref(b), Some(&2));
    }
}
