//! Persistence codec between [`CapabilitySet`]s and key lists
//!
//! Sets are stored as ordered lists of variant keys, ascending by offset.
//! Loading resolves each key through the enumeration's registry; keys that no
//! longer resolve are reported to a caller-supplied callback and skipped, so
//! a stale or hand-edited configuration never aborts the rest of the load.

use crate::{CapabilitySet, ConfigSection, IndexedEnum, Result};

/// Keys of `set` in ascending offset order.
pub fn to_key_list<E: IndexedEnum>(set: &CapabilitySet<E>) -> Vec<String> {
    set.keys().map(str::to_string).collect()
}

/// Build a set from raw keys.
///
/// Every key that does not resolve is passed to `on_unknown` and skipped.
pub fn from_key_list<E, I, S, F>(keys: I, mut on_unknown: F) -> CapabilitySet<E>
where
    E: IndexedEnum,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str),
{
    let mut set = CapabilitySet::new();
    for raw in keys {
        let raw = raw.as_ref();
        match E::by_key(raw) {
            Some(variant) => {
                set.insert(variant);
            }
            None => on_unknown(raw),
        }
    }
    set
}

/// Write the members of `set` to `path` as a list of keys.
pub fn save<E, C>(set: &CapabilitySet<E>, config: &mut C, path: &str) -> Result<()>
where
    E: IndexedEnum,
    C: ConfigSection + ?Sized,
{
    config.set_string_list(path, to_key_list(set))
}

/// Add the variants listed at `path` to `set`.
///
/// Unknown keys go to `on_unknown`. Returns `true` if `set` changed.
pub fn load<E, C, F>(set: &mut CapabilitySet<E>, config: &C, path: &str, on_unknown: F) -> bool
where
    E: IndexedEnum,
    C: ConfigSection + ?Sized,
    F: FnMut(&str),
{
    let loaded = from_key_list::<E, _, _, _>(config.get_string_list(path), on_unknown);
    set.union_with(&loaded)
}
