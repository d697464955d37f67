mod entry;
mod image;
mod post;

pub use entry::*;
pub use image::*;
pub use post::*;

use serde::{Deserialize, Deserializer};

/// Helper to deserialize a string that may be null or absent
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Helper to deserialize a list that may be null or absent
pub(crate) fn deserialize_nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}
