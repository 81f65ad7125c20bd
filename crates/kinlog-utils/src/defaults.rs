//! Map lookups with a reported fallback.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Look up `key`, falling back to `default`.
///
/// Returns the value and whether the default was used. With `verbose`, a
/// fallback is logged so missing settings show up in the function's logs.
pub fn get_or_default<K, Q, V>(map: &HashMap<K, V>, key: &Q, default: V, verbose: bool) -> (V, bool)
where
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + Debug + ?Sized,
    V: Clone + Debug,
{
    match map.get(key) {
        Some(value) => (value.clone(), false),
        None => {
            if verbose {
                tracing::info!(key = ?key, default = ?default, "key not found, using default");
            }
            (default, true)
        }
    }
}
