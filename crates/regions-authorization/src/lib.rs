//! Regions Authorization - area protections, roles and permissions
//!
//! This crate applies the `regions-core` primitives to the two flag families
//! of a region: environmental [`Protection`]s set on an [`Area`], and
//! [`Permission`]s granted to named [`Role`]s inside it.
//!
//! ```rust
//! use regions_authorization::{Area, AreaKind, Permission, Protection};
//!
//! let area = Area::new(AreaKind::Region, "spawn");
//! area.add_protections([Protection::Fire, Protection::Explosion]);
//!
//! let builder = area.create_role("builder")?;
//! area.add_role_permissions("builder", [Permission::BlockBreak, Permission::BlockPlace])?;
//! assert!(builder.has_permission(Permission::BlockPlace));
//!
//! builder.delete()?;
//! assert!(!builder.is_valid());
//! # Ok::<(), regions_core::RegionsError>(())
//! ```

#![forbid(unsafe_code)]

/// Areas owning protections and roles
pub mod area;

/// Permission flags
pub mod permission;

/// Protection flags
pub mod protection;

/// Roles and their lifecycle
pub mod role;

pub use area::{Area, AreaKind, PUBLIC_ROLE_NAME};
pub use permission::Permission;
pub use protection::Protection;
pub use role::Role;
