//! Payload fields that tell an explicit `null` apart from a missing key

use serde::{Deserialize, Deserializer};

/// For `#[serde(default, deserialize_with = "...")]` fields: a missing key
/// stays `None` through `default`, while a present key becomes `Some`, so an
/// `Option<Option<T>>` field reads `null` as `Some(None)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
