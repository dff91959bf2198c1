//! Hash containers with a fixed seed, re-exports *hashbrown* and *foldhash*.
//!
//! Iteration order only depends on the inserted keys, so anything written
//! out of these maps is reproducible between runs.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x5AFE_D0C5_0B1E_C7A5);

/// Fixed hash state based upon a random but fixed seed.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FixedHashState, HashMap};
    use core::hash::BuildHasher;

    #[test]
    fn fixed_state_is_stable() {
        let a = FixedHashState.hash_one("Level1/Actor_3");
        let b = FixedHashState.hash_one("Level1/Actor_3");
        assert_eq!(a, b);

        let mut map: HashMap<&str, i32> = HashMap::default();
        map.insert("a", 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
