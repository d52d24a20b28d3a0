//! Closed enumerations with dense offsets and case-insensitive keys
//!
//! Every flag family in Regions (protections, permissions) is a closed
//! enumeration whose members carry two stable identities:
//!
//! - an **offset**, the zero-based declaration index, used as a bit index by
//!   [`CapabilitySet`](crate::CapabilitySet);
//! - a **key**, the configuration name, matched case-insensitively.
//!
//! Enumerations are declared with [`indexed_enum!`](crate::indexed_enum), which
//! derives `strum`'s `EnumCount`, `EnumIter` and `IntoStaticStr` and builds
//! both identities on top of them. The key lookup table is a [`KeyRegistry`]
//! built once, on first use, and never mutated.
//!
//! ```rust
//! use regions_core::{indexed_enum, IndexedEnum};
//!
//! indexed_enum! {
//!     /// Hazards an area can be shielded from.
//!     pub enum Hazard {
//!         Damage => "damage",
//!         Fire => "fire",
//!         Explosion => "explosion",
//!     }
//! }
//!
//! assert_eq!(Hazard::Fire.offset(), 1);
//! assert_eq!(Hazard::by_key("EXPLOSION"), Some(Hazard::Explosion));
//! assert_eq!(Hazard::by_offset(3), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use strum::IntoEnumIterator;

/// A member of a closed enumeration addressable by offset and by key.
///
/// Implement through [`indexed_enum!`](crate::indexed_enum); hand-written
/// impls must iterate variants in offset order and keep keys unique under
/// case folding, which the registry asserts on construction.
pub trait IndexedEnum:
    Copy + Eq + Hash + fmt::Debug + Send + Sync + IntoEnumIterator + 'static
{
    /// Cardinality of the enumeration.
    const COUNT: usize;

    /// Dense zero-based offset of this variant.
    fn offset(self) -> usize;

    /// Configuration key of this variant.
    fn key(self) -> &'static str;

    /// Variant at `offset`, or `None` when out of range.
    fn by_offset(offset: usize) -> Option<Self> {
        Self::iter().nth(offset)
    }

    /// Variant whose key equals `key` ignoring case. No partial matching.
    fn by_key(key: &str) -> Option<Self>;
}

/// Case-insensitive key table for one enumeration.
#[derive(Debug)]
pub struct KeyRegistry<E> {
    by_key: HashMap<String, E>,
}

impl<E: IndexedEnum> KeyRegistry<E> {
    /// Build the table from every variant of `E`.
    ///
    /// # Panics
    ///
    /// Panics if offsets are not dense in declaration order or two keys
    /// collide after case folding. Both are declaration bugs.
    pub fn build() -> Self {
        let mut by_key = HashMap::with_capacity(E::COUNT);
        for (offset, variant) in E::iter().enumerate() {
            assert_eq!(
                variant.offset(),
                offset,
                "{variant:?} is declared at {offset} but reports offset {}",
                variant.offset()
            );
            let previous = by_key.insert(fold_key(variant.key()), variant);
            assert!(
                previous.is_none(),
                "duplicate key {:?} in {}",
                variant.key(),
                short_type_name::<E>()
            );
        }
        assert_eq!(
            by_key.len(),
            E::COUNT,
            "{} iterates {} variants but declares {}",
            short_type_name::<E>(),
            by_key.len(),
            E::COUNT
        );
        Self { by_key }
    }

    /// Resolve `key` ignoring case.
    pub fn get(&self, key: &str) -> Option<E> {
        self.by_key.get(&fold_key(key)).copied()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the enumeration has no variants.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// Last path segment of `E`'s type name, for diagnostics.
pub fn short_type_name<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Serialize a variant as its key.
pub fn serialize_key<E: IndexedEnum, S: Serializer>(
    value: &E,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.key())
}

/// Deserialize a variant from its key, ignoring case.
pub fn deserialize_key<'de, E: IndexedEnum, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<E, D::Error> {
    let raw = String::deserialize(deserializer)?;
    E::by_key(&raw).ok_or_else(|| {
        D::Error::custom(format!(
            "unknown {} key `{raw}`",
            short_type_name::<E>()
        ))
    })
}

/// Declare a closed enumeration implementing [`IndexedEnum`].
///
/// Each variant is written `Name => "key"`. Offsets follow declaration order.
/// The key becomes the variant's `strum` serialization, so `COUNT`, `key()`
/// and iteration all come from the `strum` derives. The generated type also
/// implements `Display` (its key), `FromStr` (case-insensitive, `NotFound`
/// on miss) and serde as its key.
#[macro_export]
macro_rules! indexed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $key:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            $crate::__private::strum::EnumCount,
            $crate::__private::strum::EnumIter,
            $crate::__private::strum::IntoStaticStr,
        )]
        #[strum(crate = "regions_core::__private::strum")]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[strum(serialize = $key)]
                $variant,
            )+
        }

        impl $crate::IndexedEnum for $name {
            const COUNT: usize = <Self as $crate::__private::strum::EnumCount>::COUNT;

            fn offset(self) -> usize {
                self as usize
            }

            fn key(self) -> &'static str {
                self.into()
            }

            fn by_key(key: &str) -> ::std::option::Option<Self> {
                static REGISTRY: $crate::__private::Lazy<$crate::KeyRegistry<$name>> =
                    $crate::__private::Lazy::new($crate::KeyRegistry::build);
                REGISTRY.get(key)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::IndexedEnum::key(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::RegionsError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::IndexedEnum>::by_key(s).ok_or_else(|| {
                    $crate::RegionsError::not_found(format!(
                        concat!("unknown ", stringify!($name), " key `{}`"),
                        s
                    ))
                })
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::indexed::serialize_key(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::indexed::deserialize_key(deserializer)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegionsError;

    crate::indexed_enum! {
        enum Hazard {
            Damage => "damage",
            Fire => "fire",
            Explosion => "explosion",
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
    enum Clashing {
        Lower,
        Upper,
    }

    impl IndexedEnum for Clashing {
        const COUNT: usize = 2;

        fn offset(self) -> usize {
            self as usize
        }

        fn key(self) -> &'static str {
            match self {
                Self::Lower => "spread",
                Self::Upper => "SPREAD",
            }
        }

        fn by_key(key: &str) -> Option<Self> {
            KeyRegistry::<Self>::build().get(key)
        }
    }

    #[test]
    fn test_offsets_follow_declaration_order() {
        assert_eq!(Hazard::COUNT, 3);
        assert_eq!(Hazard::Damage.offset(), 0);
        assert_eq!(Hazard::Fire.offset(), 1);
        assert_eq!(Hazard::Explosion.offset(), 2);
        assert_eq!(
            Hazard::iter().collect::<Vec<_>>(),
            vec![Hazard::Damage, Hazard::Fire, Hazard::Explosion]
        );

        let registry = KeyRegistry::<Hazard>::build();
        assert_eq!(registry.len(), Hazard::COUNT);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_by_offset_is_total() {
        for variant in Hazard::iter() {
            assert_eq!(Hazard::by_offset(variant.offset()), Some(variant));
        }
        assert_eq!(Hazard::by_offset(3), None);
        assert_eq!(Hazard::by_offset(usize::MAX), None);
    }

    #[test]
    fn test_by_key_ignores_case_only() {
        assert_eq!(Hazard::by_key("fire"), Some(Hazard::Fire));
        assert_eq!(Hazard::by_key("FiRe"), Some(Hazard::Fire));
        assert_eq!(Hazard::by_key("fir"), None);
        assert_eq!(Hazard::by_key(" fire"), None);
        assert_eq!(Hazard::by_key(""), None);
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(Hazard::Explosion.to_string(), "explosion");
        let key: &'static str = Hazard::Fire.into();
        assert_eq!(key, "fire");
        assert_eq!("DAMAGE".parse::<Hazard>(), Ok(Hazard::Damage));
        assert!(matches!(
            "lava".parse::<Hazard>(),
            Err(RegionsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_serde_uses_keys() {
        assert_eq!(serde_json::to_string(&Hazard::Fire).unwrap(), "\"fire\"");
        let decoded: Vec<Hazard> = serde_json::from_str("[\"Explosion\", \"damage\"]").unwrap();
        assert_eq!(decoded, vec![Hazard::Explosion, Hazard::Damage]);

        let err = serde_json::from_str::<Hazard>("\"lava\"").unwrap_err();
        assert!(err.to_string().contains("unknown Hazard key `lava`"));
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn test_registry_rejects_case_folded_duplicates() {
        let _ = Clashing::by_key("spread");
    }
}
