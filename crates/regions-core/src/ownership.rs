//! Non-owning back-references from children to their parent
//!
//! A parent that strongly owns its children hands each child an
//! [`OwnershipReference`] to itself. The reference wraps a [`Weak`] pointer,
//! so a child never keeps its parent alive and the parent/child pair never
//! forms an `Rc` cycle.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::{RegionsError, Result};

/// Weak back-pointer from a child to the parent that owns it.
pub struct OwnershipReference<T> {
    parent: Weak<T>,
}

impl<T> OwnershipReference<T> {
    /// Create a reference from a strong parent handle.
    pub fn new(parent: &Rc<T>) -> Self {
        Self {
            parent: Rc::downgrade(parent),
        }
    }

    /// Create a reference from an existing weak handle.
    ///
    /// Used while the parent itself is still being built through
    /// [`Rc::new_cyclic`].
    pub fn from_weak(parent: Weak<T>) -> Self {
        Self { parent }
    }

    /// Strong handle to the parent.
    ///
    /// # Panics
    ///
    /// Panics if the parent has been dropped. A child outliving its parent
    /// is a broken ownership invariant, not a recoverable condition.
    pub fn get(&self) -> Rc<T> {
        match self.parent.upgrade() {
            Some(parent) => parent,
            None => panic!(
                "parent {} was dropped while a child still references it",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Strong handle to the parent, or `IllegalState` if it has been dropped.
    pub fn try_get(&self) -> Result<Rc<T>> {
        self.parent
            .upgrade()
            .ok_or_else(|| RegionsError::illegal_state("parent has been dropped"))
    }

    /// Check if the parent is still alive
    pub fn is_alive(&self) -> bool {
        self.parent.strong_count() > 0
    }
}

impl<T> Clone for OwnershipReference<T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
        }
    }
}

impl<T> fmt::Debug for OwnershipReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipReference")
            .field("alive", &self.is_alive())
            .finish()
    }
}
