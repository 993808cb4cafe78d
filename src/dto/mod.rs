pub mod developer_dto;
pub mod skill_dto;

use serde::{de, Deserialize, Deserializer};

/// Keeps "field sent as null" apart from "field omitted" in update payloads.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Text(String),
}

impl IntLike {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            IntLike::Int(value) => Ok(value),
            IntLike::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("A valid integer is required, got \"{}\".", text))),
        }
    }
}

/// Integer field that also accepts numeric strings, as form bodies carry them.
/// An explicit `null` is kept apart from an omitted field.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IntLike>::deserialize(deserializer)?
        .map(IntLike::into_i64)
        .transpose()
        .map(Some)
}

pub(crate) fn lenient_ids<'de, D>(deserializer: D) -> Result<Option<Option<Vec<i64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<IntLike>>::deserialize(deserializer)?
        .map(|values| {
            values
                .into_iter()
                .map(IntLike::into_i64)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map(Some)
}
