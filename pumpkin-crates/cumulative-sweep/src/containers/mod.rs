//! Containers which are used throughout the crate.
mod keyed_vec;

pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;

pub(crate) type HashSet<K, Hasher = fnv::FnvBuildHasher> = std::collections::HashSet<K, Hasher>;
