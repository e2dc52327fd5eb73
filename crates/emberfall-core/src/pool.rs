//! Fixed-capacity object pool for reusable simulation entities.
//!
//! Enemies, projectiles, particles and hit texts are recycled rather than
//! allocated per activation. The pool provides:
//! - Pre-allocated slots with a free list
//! - Generational [`Handle`]s so stale handles never alias a reused slot
//! - Exactly-once release semantics
//! - A single [`Reset`] routine shared by construction and reactivation
//!
//! # Iteration Under Mutation
//!
//! Updating an entity may release other entities in the same pool (or the
//! entity itself). Use [`Pool::handles()`] to take a snapshot of live handles
//! before the pass, then look each one up with [`Pool::get_mut()`]. Handles
//! released mid-pass simply fail the lookup.
//!
//! # Example
//!
//! ```
//! use emberfall_core::pool::{Pool, Reset};
//!
//! #[derive(Debug, Default)]
//! struct Spark {
//!     life: f32,
//! }
//!
//! impl Reset for Spark {
//!     fn reset(&mut self) {
//!         self.life = 0.0;
//!     }
//! }
//!
//! let mut pool: Pool<Spark> = Pool::with_capacity(2);
//! let (handle, spark) = pool.acquire().unwrap();
//! spark.life = 0.5;
//!
//! assert_eq!(pool.len(), 1);
//! assert!(pool.release(handle));
//! assert!(!pool.release(handle)); // second release is rejected
//! assert!(pool.is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Restores an entity to its inert state.
///
/// Implementations must clear every mutable field, including timers, flags
/// and transient links, so nothing leaks from a previous activation.
pub trait Reset {
    /// Restores all fields to their inert defaults.
    fn reset(&mut self);
}

// =============================================================================
// Handle
// =============================================================================

/// Generational handle to a pooled slot.
///
/// A handle is only valid for the activation it was issued for. Once the
/// slot is released its generation advances and the old handle is stale.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Returns the slot index of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Pool
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    item: T,
    generation: u32,
    live: bool,
}

/// Fixed-capacity pool of reusable entities.
///
/// Slots are allocated once in [`Pool::with_capacity`] and never grow.
/// When every slot is live, [`Pool::acquire`] returns `None` and the caller
/// degrades gracefully (skips the spawn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    /// Free slot indices. Popped from the back, so the lowest index is
    /// handed out first on a fresh pool.
    free: Vec<u32>,
}

impl<T: Reset + Default> Pool<T> {
    /// Creates a pool with `capacity` pre-allocated inert slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                item: T::default(),
                generation: 0,
                live: false,
            })
            .collect();
        #[allow(clippy::cast_possible_truncation)]
        let free = (0..capacity as u32).rev().collect();
        Self { slots, free }
    }

    /// Acquires an empty slot, resetting it before handing it out.
    ///
    /// Returns `None` when the pool is exhausted.
    pub fn acquire(&mut self) -> Option<(Handle, &mut T)> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.item.reset();
        slot.live = true;
        let handle = Handle {
            index,
            generation: slot.generation,
        };
        Some((handle, &mut slot.item))
    }

    /// Returns a slot to the free list.
    ///
    /// Returns `false` if the handle is stale or already released, in which
    /// case nothing changes.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if !slot.live || slot.generation != handle.generation {
            return false;
        }
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.item.reset();
        self.free.push(handle.index);
        true
    }
}

impl<T> Pool<T> {
    /// Returns a reference to a live item.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.live && slot.generation == handle.generation)
            .map(|slot| &slot.item)
    }

    /// Returns a mutable reference to a live item.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.live && slot.generation == handle.generation)
            .map(|slot| &mut slot.item)
    }

    /// Snapshot of live handles in slot order.
    ///
    /// This is the primary way to drive an update pass that may release
    /// entries while it runs.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(index, slot)| {
                #[allow(clippy::cast_possible_truncation)]
                Handle {
                    index: index as u32,
                    generation: slot.generation,
                }
            })
            .collect()
    }

    /// Iterates over live items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(index, slot)| {
                #[allow(clippy::cast_possible_truncation)]
                let handle = Handle {
                    index: index as u32,
                    generation: slot.generation,
                };
                (handle, &slot.item)
            })
    }

    /// Iterates mutably over live items in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(index, slot)| {
                #[allow(clippy::cast_possible_truncation)]
                let handle = Handle {
                    index: index as u32,
                    generation: slot.generation,
                };
                (handle, &mut slot.item)
            })
    }

    /// Returns the number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns true if no slot is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if every slot is live.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        value: u32,
        armed: bool,
    }

    impl Reset for Counter {
        fn reset(&mut self) {
            self.value = 0;
            self.armed = false;
        }
    }

    mod acquire_tests {
        use super::*;

        #[test]
        fn acquire_hands_out_lowest_index_first() {
            let mut pool: Pool<Counter> = Pool::with_capacity(3);
            let (a, _) = pool.acquire().unwrap();
            let (b, _) = pool.acquire().unwrap();
            assert_eq!(a.index(), 0);
            assert_eq!(b.index(), 1);
            assert_eq!(pool.len(), 2);
        }

        #[test]
        fn acquire_returns_none_when_exhausted() {
            let mut pool: Pool<Counter> = Pool::with_capacity(1);
            assert!(pool.acquire().is_some());
            assert!(pool.acquire().is_none());
            assert!(pool.is_full());
        }

        #[test]
        fn zero_capacity_pool_never_acquires() {
            let mut pool: Pool<Counter> = Pool::with_capacity(0);
            assert!(pool.acquire().is_none());
            assert!(pool.is_empty());
        }

        #[test]
        fn reacquired_slot_is_reset() {
            let mut pool: Pool<Counter> = Pool::with_capacity(1);
            let (handle, item) = pool.acquire().unwrap();
            item.value = 42;
            item.armed = true;
            pool.release(handle);

            let (_, item) = pool.acquire().unwrap();
            assert_eq!(*item, Counter::default());
        }
    }

    mod release_tests {
        use super::*;

        #[test]
        fn release_is_exactly_once() {
            let mut pool: Pool<Counter> = Pool::with_capacity(2);
            let (handle, _) = pool.acquire().unwrap();
            assert!(pool.release(handle));
            assert!(!pool.release(handle));
            assert_eq!(pool.len(), 0);
            assert_eq!(pool.capacity(), 2);
        }

        #[test]
        fn stale_handle_does_not_alias_reused_slot() {
            let mut pool: Pool<Counter> = Pool::with_capacity(1);
            let (old, _) = pool.acquire().unwrap();
            pool.release(old);
            let (new, item) = pool.acquire().unwrap();
            item.value = 7;

            assert_eq!(old.index(), new.index());
            assert_ne!(old.generation(), new.generation());
            assert!(pool.get(old).is_none());
            assert!(!pool.release(old));
            assert_eq!(pool.get(new).map(|c| c.value), Some(7));
        }

        #[test]
        fn release_out_of_range_handle_is_rejected() {
            let mut pool: Pool<Counter> = Pool::with_capacity(1);
            let (handle, _) = pool.acquire().unwrap();
            let mut other: Pool<Counter> = Pool::with_capacity(0);
            assert!(!other.release(handle));
        }
    }

    mod iteration_tests {
        use super::*;

        #[test]
        fn handles_snapshot_survives_release_during_pass() {
            let mut pool: Pool<Counter> = Pool::with_capacity(4);
            for value in 0..4 {
                let (_, item) = pool.acquire().unwrap();
                item.value = value;
            }

            let mut visited = Vec::new();
            for handle in pool.handles() {
                if let Some(item) = pool.get(handle) {
                    visited.push(item.value);
                }
                // Releasing the next slot mid-pass must not cause a skip or a double visit.
                if handle.index() == 1 {
                    let next = pool.handles()[2];
                    pool.release(next);
                }
            }

            assert_eq!(visited, vec![0, 1, 3]);
        }

        #[test]
        fn iter_skips_free_slots() {
            let mut pool: Pool<Counter> = Pool::with_capacity(3);
            let (a, _) = pool.acquire().unwrap();
            let (_, b) = pool.acquire().unwrap();
            b.value = 9;
            pool.release(a);

            let values: Vec<u32> = pool.iter().map(|(_, c)| c.value).collect();
            assert_eq!(values, vec![9]);
        }
    }
}
