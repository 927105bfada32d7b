//! Fixed-capacity object pool
//!
//! Every pooled entity kind (enemies, XP orbs, projectiles, particles,
//! floating text) lives in one of these. Slots are allocated once at
//! construction and reused forever; the pool never grows. When every slot is
//! active, new requests are dropped silently and callers carry on.

/// Index of a slot inside a [`Pool`]
///
/// Only meaningful for the frame it was obtained in: once the slot is released
/// the same index may hand out a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle(usize);

impl SlotHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    active: bool,
    value: T,
}

/// A fixed-size set of reusable slots, each tagged active or free
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    live: usize,
}

impl<T: Default> Pool<T> {
    /// Allocate `capacity` inactive slots
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                active: false,
                value: T::default(),
            })
            .collect();
        Self { slots, live: 0 }
    }
}

impl<T> Pool<T> {
    /// Claim the first free slot (linear scan)
    ///
    /// The slot is marked active but still holds whatever its previous
    /// occupant left behind; the caller must reset it. Returns `None` when the
    /// pool is full.
    pub fn acquire(&mut self) -> Option<SlotHandle> {
        let index = self.slots.iter().position(|s| !s.active)?;
        self.slots[index].active = true;
        self.live += 1;
        Some(SlotHandle(index))
    }

    /// Claim a slot and initialise it in place
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<SlotHandle> {
        let handle = self.acquire()?;
        init(&mut self.slots[handle.0].value);
        Some(handle)
    }

    /// Mark a slot free. Returns false if it was already free.
    pub fn release(&mut self, handle: SlotHandle) -> bool {
        match self.slots.get_mut(handle.0) {
            Some(slot) if slot.active => {
                slot.active = false;
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, handle: SlotHandle) -> bool {
        self.slots.get(handle.0).is_some_and(|s| s.active)
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .filter(|s| s.active)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .filter(|s| s.active)
            .map(|s| &mut s.value)
    }

    /// Active slots in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotHandle(i), &s.value))
    }

    /// Active slots in ascending slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotHandle(i), &mut s.value))
    }

    /// Run `keep` on every active slot, releasing those it rejects
    pub fn retain_mut(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            if !keep(&mut slot.value) {
                slot.active = false;
                self.live -= 1;
            }
        }
    }

    /// Release every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.live = 0;
    }

    pub fn active_count(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_reuses_lowest_free_slot() {
        let mut pool: Pool<u32> = Pool::new(3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let _c = pool.acquire().unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));

        assert!(pool.release(b));
        assert_eq!(pool.acquire().unwrap().index(), 1);
    }

    #[test]
    fn test_exhaustion_drops_silently() {
        let mut pool: Pool<u32> = Pool::new(2);
        assert!(pool.spawn(|v| *v = 1).is_some());
        assert!(pool.spawn(|v| *v = 2).is_some());
        assert!(pool.is_full());
        assert!(pool.spawn(|v| *v = 3).is_none());
        let values: Vec<u32> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_release_twice_is_harmless() {
        let mut pool: Pool<u32> = Pool::new(1);
        let h = pool.acquire().unwrap();
        assert!(pool.release(h));
        assert!(!pool.release(h));
        assert_eq!(pool.active_count(), 0);
        assert!(pool.get(h).is_none());
    }

    #[test]
    fn test_retain_mut_releases_rejected() {
        let mut pool: Pool<u32> = Pool::new(4);
        for n in 0..4 {
            pool.spawn(|v| *v = n);
        }
        pool.retain_mut(|v| *v % 2 == 0);
        assert_eq!(pool.active_count(), 2);
        let kept: Vec<usize> = pool.iter().map(|(h, _)| h.index()).collect();
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut pool: Pool<u32> = Pool::new(0);
        assert!(pool.acquire().is_none());
        assert!(pool.is_full());
        assert!(pool.is_empty());
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            capacity in 0usize..16,
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..200),
        ) {
            let mut pool: Pool<u8> = Pool::new(capacity);
            for (is_acquire, index) in ops {
                if is_acquire {
                    let _ = pool.acquire();
                } else {
                    let _ = pool.release(SlotHandle(index));
                }
                prop_assert!(pool.active_count() <= pool.capacity());
                prop_assert_eq!(pool.iter().count(), pool.active_count());
            }
        }
    }
}
