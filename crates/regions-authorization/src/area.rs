//! Areas: owners of protection flags and roles
//!
//! An [`Area`] is always handled through `Rc<Area>` and is built with
//! [`Rc::new_cyclic`] so that it can hand its roles a weak reference to
//! itself. The area strongly owns its roles; roles only point back weakly.
//!
//! The area is the single mutator of its roles' permissions. Administrative
//! edits go through [`Area::add_role_permissions`] and
//! [`Area::remove_role_permissions`]; everyone else only reads.
//!
//! # Configuration layout
//!
//! ```text
//! protections = ["fire", "explosion"]
//! roles.public.permissions = ["entrance", "exit"]
//! roles.builder.permissions = ["blockBreak", "blockPlace"]
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use regions_core::{
    codec, CapabilitySet, CapabilitySnapshot, ConfigSection, OwnershipReference, RegionsError,
    Result,
};
use serde::{Deserialize, Serialize};

use crate::{Permission, Protection, Role};

/// Name of the role every area owns and can never delete.
pub const PUBLIC_ROLE_NAME: &str = "public";

const CFG_PROTECTIONS: &str = "protections";
const CFG_ROLES: &str = "roles";

/// What kind of space an area covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    /// A whole world
    World,
    /// A bounded region inside a world
    Region,
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaKind::World => f.write_str("world"),
            AreaKind::Region => f.write_str("region"),
        }
    }
}

/// Region or world owning protection flags and named roles.
#[derive(Debug)]
pub struct Area {
    kind: AreaKind,
    name: String,
    protections: RefCell<CapabilitySet<Protection>>,
    roles: RefCell<IndexMap<String, Rc<Role>>>,
    public_role: Rc<Role>,
    me: Weak<Area>,
}

impl Area {
    /// Create an area holding only its public role and no protections.
    pub fn new(kind: AreaKind, name: impl Into<String>) -> Rc<Self> {
        let name = name.into();
        Rc::new_cyclic(|me| {
            let public_role = Rc::new(Role::new(
                OwnershipReference::from_weak(me.clone()),
                PUBLIC_ROLE_NAME,
                true,
            ));
            let mut roles = IndexMap::new();
            roles.insert(PUBLIC_ROLE_NAME.to_string(), Rc::clone(&public_role));

            Self {
                kind,
                name,
                protections: RefCell::new(CapabilitySet::new()),
                roles: RefCell::new(roles),
                public_role,
                me: me.clone(),
            }
        })
    }

    /// Kind of this area.
    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    /// Name of this area.
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Roles ===

    /// The public role.
    pub fn public_role(&self) -> Rc<Role> {
        Rc::clone(&self.public_role)
    }

    /// Role registered under `name`, matched case-sensitively.
    pub fn role(&self, name: &str) -> Option<Rc<Role>> {
        self.roles.borrow().get(name).cloned()
    }

    /// All roles in creation order, public role first.
    pub fn roles(&self) -> Vec<Rc<Role>> {
        self.roles.borrow().values().cloned().collect()
    }

    /// Register a new, empty role.
    ///
    /// Fails with `Invalid` if the name is empty, contains `.`, or is taken.
    pub fn create_role(&self, name: impl Into<String>) -> Result<Rc<Role>> {
        let name = name.into();
        validate_role_name(&name)?;

        let mut roles = self.roles.borrow_mut();
        if roles.contains_key(&name) {
            return Err(RegionsError::invalid(format!(
                "Role `{name}` already exists in {self}"
            )));
        }

        let role = Rc::new(Role::new(
            OwnershipReference::from_weak(self.me.clone()),
            name.clone(),
            false,
        ));
        roles.insert(name, Rc::clone(&role));

        tracing::debug!(
            role = %role.name(),
            area_kind = %self.kind,
            area = %self.name,
            "Role created"
        );
        Ok(role)
    }

    /// Unregister `name` and invalidate the role.
    ///
    /// Fails with `NotFound` if no such role exists and with `NotPermitted`
    /// for the public role.
    pub fn remove_role(&self, name: &str) -> Result<()> {
        let role = self.require_role(name)?;
        if role.is_public() {
            return Err(RegionsError::not_permitted("Cannot delete public role"));
        }

        self.roles.borrow_mut().shift_remove(name);
        role.destroy();

        tracing::debug!(
            role = %name,
            area_kind = %self.kind,
            area = %self.name,
            "Role removed"
        );
        Ok(())
    }

    /// Grant permissions to the role `name`. Returns `true` if it changed.
    pub fn add_role_permissions<I>(&self, name: &str, permissions: I) -> Result<bool>
    where
        I: IntoIterator<Item = Permission>,
    {
        self.require_role(name)?.add_permissions(permissions)
    }

    /// Revoke permissions from the role `name`. Returns `true` if it changed.
    pub fn remove_role_permissions<I>(&self, name: &str, permissions: I) -> Result<bool>
    where
        I: IntoIterator<Item = Permission>,
    {
        self.require_role(name)?.remove_permissions(permissions)
    }

    fn require_role(&self, name: &str) -> Result<Rc<Role>> {
        self.role(name)
            .ok_or_else(|| RegionsError::not_found(format!("Role `{name}` in {self}")))
    }

    // === Protections ===

    /// Snapshot of the current protections.
    pub fn protections(&self) -> CapabilitySnapshot<Protection> {
        self.protections.borrow().snapshot()
    }

    /// Check a single protection.
    pub fn has_protection(&self, protection: Protection) -> bool {
        self.protections.borrow().contains(protection)
    }

    /// Check that every given protection is set. Empty input is `true`.
    pub fn has_protections<I>(&self, protections: I) -> bool
    where
        I: IntoIterator<Item = Protection>,
    {
        self.protections.borrow().contains_all(protections)
    }

    /// Set protections. Returns `true` if any was newly set.
    pub fn add_protections<I>(&self, protections: I) -> bool
    where
        I: IntoIterator<Item = Protection>,
    {
        self.protections.borrow_mut().add(protections)
    }

    /// Clear protections. Returns `true` if any was actually cleared.
    pub fn remove_protections<I>(&self, protections: I) -> bool
    where
        I: IntoIterator<Item = Protection>,
    {
        self.protections.borrow_mut().remove(protections)
    }

    // === Persistence ===

    /// Write protections and every role's permissions to `config`.
    ///
    /// The `roles` section is rewritten from scratch, so sections of roles
    /// removed since the last save do not survive.
    pub fn save<C>(&self, config: &mut C) -> Result<()>
    where
        C: ConfigSection + ?Sized,
    {
        codec::save(&*self.protections.borrow(), config, CFG_PROTECTIONS)?;
        config.remove_section(CFG_ROLES)?;
        for role in self.roles.borrow().values() {
            role.save(config, &format!("{CFG_ROLES}.{}", role.name()))?;
        }
        tracing::debug!(area_kind = %self.kind, area = %self.name, "Area saved");
        Ok(())
    }

    /// Build an area from `config`.
    ///
    /// Unknown protection or permission keys and unusable role names are
    /// logged and skipped; they never abort the load.
    pub fn load<C>(kind: AreaKind, name: impl Into<String>, config: &C) -> Result<Rc<Self>>
    where
        C: ConfigSection + ?Sized,
    {
        let area = Self::new(kind, name);

        codec::load(
            &mut *area.protections.borrow_mut(),
            config,
            CFG_PROTECTIONS,
            |key| {
                tracing::warn!(
                    key,
                    area_kind = %area.kind,
                    area = %area.name,
                    "Unknown protection in area"
                );
            },
        );

        for role_name in config.child_keys(CFG_ROLES) {
            let role = match area.role(&role_name) {
                Some(role) => role,
                None => match area.create_role(role_name.as_str()) {
                    Ok(role) => role,
                    Err(err) => {
                        tracing::warn!(
                            role = %role_name,
                            area_kind = %area.kind,
                            area = %area.name,
                            error = %err,
                            "Skipping role"
                        );
                        continue;
                    }
                },
            };
            role.load(config, &format!("{CFG_ROLES}.{role_name}"))?;
        }

        tracing::debug!(area_kind = %area.kind, area = %area.name, "Area loaded");
        Ok(area)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.kind, self.name)
    }
}

impl Drop for Area {
    fn drop(&mut self) {
        for role in self.roles.get_mut().values() {
            role.destroy();
        }
    }
}

fn validate_role_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegionsError::invalid("Role name must not be empty"));
    }
    if name.contains('.') {
        return Err(RegionsError::invalid(format!(
            "Role name `{name}` must not contain `.`"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_new_area_has_public_role() {
        let area = Area::new(AreaKind::Region, "spawn");
        let roles = area.roles();
        assert_eq!(roles.len(), 1);
        assert!(roles[0].is_public());
        assert_eq!(roles[0].name(), PUBLIC_ROLE_NAME);
        assert!(Rc::ptr_eq(&roles[0].parent(), &area));
        assert_eq!(area.to_string(), "region [spawn]");
    }

    #[test]
    fn test_create_role_validates_names() {
        let area = Area::new(AreaKind::Region, "spawn");
        area.create_role("builder").unwrap();

        assert_matches!(area.create_role("builder"), Err(RegionsError::Invalid { .. }));
        assert_matches!(area.create_role("public"), Err(RegionsError::Invalid { .. }));
        assert_matches!(area.create_role(""), Err(RegionsError::Invalid { .. }));
        assert_matches!(area.create_role("a.b"), Err(RegionsError::Invalid { .. }));

        // Names are case-sensitive
        assert!(area.create_role("Builder").is_ok());
        assert!(area.role("BUILDER").is_none());
    }

    #[test]
    fn test_remove_role_guards() {
        let area = Area::new(AreaKind::Region, "spawn");
        assert_matches!(area.remove_role("ghost"), Err(RegionsError::NotFound { .. }));
        assert_matches!(
            area.remove_role(PUBLIC_ROLE_NAME),
            Err(RegionsError::NotPermitted { .. })
        );
        assert!(area.public_role().is_valid());
    }

    #[test]
    fn test_role_permissions_are_administered_by_name() {
        let area = Area::new(AreaKind::Region, "spawn");
        area.create_role("member").unwrap();

        assert!(area
            .add_role_permissions("member", [Permission::Entrance, Permission::Exit])
            .unwrap());
        assert!(!area
            .add_role_permissions("member", [Permission::Entrance])
            .unwrap());
        assert!(area
            .remove_role_permissions("member", [Permission::Exit])
            .unwrap());
        assert_matches!(
            area.add_role_permissions("ghost", [Permission::Chat]),
            Err(RegionsError::NotFound { .. })
        );

        let member = area.role("member").unwrap();
        assert!(member.has_permission(Permission::Entrance));
        assert!(!member.has_permission(Permission::Exit));
    }

    #[test]
    fn test_protections() {
        let area = Area::new(AreaKind::World, "world");
        assert!(area.has_protections([]));
        assert!(area.add_protections([Protection::Fire, Protection::Explosion]));
        assert!(!area.add_protections([Protection::Fire]));
        assert!(area.has_protection(Protection::Fire));
        assert!(!area.has_protection(Protection::Damage));

        let snapshot = area.protections();
        assert!(area.remove_protections([Protection::Fire]));
        assert!(!area.remove_protections([]));
        assert!(snapshot.contains(Protection::Fire));
        assert!(!area.has_protection(Protection::Fire));
    }

    #[test]
    fn test_dropping_area_invalidates_roles() {
        let area = Area::new(AreaKind::Region, "spawn");
        let builder = area.create_role("builder").unwrap();
        area.add_role_permissions("builder", [Permission::BlockPlace]).unwrap();
        let public = area.public_role();

        drop(area);

        assert!(!builder.is_valid());
        assert!(!public.is_valid());
        assert!(builder.has_permission(Permission::BlockPlace));
        assert_matches!(builder.delete(), Err(RegionsError::IllegalState { .. }));
    }
}
