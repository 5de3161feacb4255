use alloc::vec::Vec;

use super::handle::Handle;

/// A slot either holds an element or threads the free list.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    /// Vacant slot holding the next free slot, if any.
    Vacant(Option<Handle>),
}

#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Head of the intrusive free list threaded through vacant slots.
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        self.len += 1;
        if let Some(handle) = self.free_head {
            // Reuse the most recently freed slot.
            match core::mem::replace(&mut self.slots[handle.to_index()], Slot::Occupied(element)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("`Arena::alloc()` - occupied slot on the free list!"),
            }
            handle
        } else {
            // Use strict less-than so the final element count never exceeds
            // Handle::MAX, keeping every index representable.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot::Occupied(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant(_) => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant(_) => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns a reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    #[inline]
    pub(crate) unsafe fn get_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Caller guarantees `ptr` is valid. Only the slots are read.
        match unsafe { &(&(*ptr).slots)[handle.to_index()] } {
            Slot::Occupied(element) => element,
            Slot::Vacant(_) => panic!("`Arena::get_ptr()` - `handle` is invalid!"),
        }
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    /// - The caller must have logical exclusive access to the element at
    ///   `handle`. The slot pointer is derived with raw pointer arithmetic so
    ///   borrows of other slots stay untouched.
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        let index = handle.to_index();
        // SAFETY: Caller guarantees `ptr` is valid. The transient borrows below
        // touch only the `Vec` header, never the element buffer.
        unsafe {
            let slots: *mut Vec<Slot<T>> = &raw mut (*ptr).slots;
            assert!(index < (*slots).len(), "`Arena::get_mut_ptr()` - `handle` is invalid!");
            match &mut *(*slots).as_mut_ptr().add(index) {
                Slot::Occupied(element) => element,
                Slot::Vacant(_) => panic!("`Arena::get_mut_ptr()` - `handle` is invalid!"),
            }
        }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let index = handle.to_index();
        match core::mem::replace(&mut self.slots[index], Slot::Vacant(self.free_head)) {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant(next) => {
                // Restore the original link so the free list stays intact.
                self.slots[index] = Slot::Vacant(next);
                panic!("`Arena::take()` - `handle` is invalid!")
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let _c = arena.alloc(3);

        arena.take(a);
        arena.take(b);

        // LIFO reuse: the most recently freed slot comes back first.
        assert_eq!(arena.alloc(4), b);
        assert_eq!(arena.alloc(5), a);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let handle = arena.alloc(1);
        arena.take(handle);
        arena.take(handle);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::Get(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        prop_assert_eq!(*arena.get(handle), model[index].1);
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Get(usize),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => any::<usize>().prop_map(Operation::Get),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
