//! Named permission holders scoped to an area
//!
//! A [`Role`] is created and owned by its [`Area`]. It reaches the area
//! through a weak [`OwnershipReference`], so the area is never kept alive by
//! its roles.
//!
//! # Lifecycle
//!
//! A role starts valid and becomes invalid when its area removes it (or is
//! itself dropped). Invalidation is terminal. Stale holders can keep the
//! `Rc<Role>` and still read its last-known permissions, but every mutating
//! operation fails with [`RegionsError::IllegalState`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use regions_core::{
    codec, CapabilitySet, CapabilitySnapshot, ConfigSection, OwnershipReference, RegionsError,
    Result,
};

use crate::{Area, Permission};

const CFG_PERMISSIONS: &str = "permissions";

/// Named set of permissions inside one area.
#[derive(Debug)]
pub struct Role {
    parent: OwnershipReference<Area>,
    name: String,
    public: bool,
    permissions: RefCell<CapabilitySet<Permission>>,
    valid: Cell<bool>,
}

impl Role {
    pub(crate) fn new(
        parent: OwnershipReference<Area>,
        name: impl Into<String>,
        public: bool,
    ) -> Self {
        Self {
            parent,
            name: name.into(),
            public,
            permissions: RefCell::new(CapabilitySet::new()),
            valid: Cell::new(true),
        }
    }

    /// Role name, unique within its area.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the area's public role, which can never be deleted.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Whether the role is still registered with its area.
    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }

    /// The area owning this role.
    ///
    /// # Panics
    ///
    /// Panics if the area has been dropped.
    pub fn parent(&self) -> Rc<Area> {
        self.parent.get()
    }

    /// Snapshot of the current permissions.
    pub fn permissions(&self) -> CapabilitySnapshot<Permission> {
        self.permissions.borrow().snapshot()
    }

    /// Check a single permission. Valid on invalidated roles too.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.borrow().contains(permission)
    }

    /// Check that every given permission is granted. Empty input is `true`.
    pub fn has_permissions<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.borrow().contains_all(permissions)
    }

    pub(crate) fn add_permissions<I>(&self, permissions: I) -> Result<bool>
    where
        I: IntoIterator<Item = Permission>,
    {
        self.check_state()?;
        Ok(self.permissions.borrow_mut().add(permissions))
    }

    pub(crate) fn remove_permissions<I>(&self, permissions: I) -> Result<bool>
    where
        I: IntoIterator<Item = Permission>,
    {
        self.check_state()?;
        Ok(self.permissions.borrow_mut().remove(permissions))
    }

    /// Remove this role from its area.
    ///
    /// Fails with `IllegalState` if the role is already invalid and with
    /// `NotPermitted` if it is the public role.
    pub fn delete(&self) -> Result<()> {
        self.check_state()?;
        if self.public {
            return Err(RegionsError::not_permitted("Cannot delete public role"));
        }
        self.parent().remove_role(&self.name)
    }

    /// Mark the role invalid. Called by the owning area only.
    pub(crate) fn destroy(&self) {
        self.valid.set(false);
    }

    pub(crate) fn save<C>(&self, config: &mut C, section: &str) -> Result<()>
    where
        C: ConfigSection + ?Sized,
    {
        let path = format!("{section}.{CFG_PERMISSIONS}");
        let permissions = self.permissions.borrow();
        codec::save(&*permissions, config, &path)
    }

    pub(crate) fn load<C>(&self, config: &C, section: &str) -> Result<()>
    where
        C: ConfigSection + ?Sized,
    {
        self.check_state()?;
        let area = self.parent.try_get()?;
        let path = format!("{section}.{CFG_PERMISSIONS}");
        let mut permissions = self.permissions.borrow_mut();
        codec::load(&mut *permissions, config, &path, |key| {
            tracing::warn!(
                key,
                role = %self.name,
                area_kind = %area.kind(),
                area = %area.name(),
                "Unknown permission in role"
            );
        });
        Ok(())
    }

    fn check_state(&self) -> Result<()> {
        if self.valid.get() {
            Ok(())
        } else {
            Err(RegionsError::illegal_state(format!(
                "Role `{}` is no longer valid",
                self.name
            )))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.permissions.borrow())
    }
}
