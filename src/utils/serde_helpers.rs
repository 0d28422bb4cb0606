//! Helpers de serde para los DTOs de entrada

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Distingue un campo ausente (`None`) de un `null` explícito (`Some(None)`).
///
/// Se usa con `#[serde(default, deserialize_with = "double_option")]`
/// en los DTOs de PATCH.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Acepta RFC 3339 o una fecha `YYYY-MM-DD` (medianoche UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_from_str<E: serde::de::Error>(raw: &str) -> Result<DateTime<Utc>, E> {
    parse_timestamp(raw).ok_or_else(|| {
        E::custom(format!(
            "invalid timestamp `{}`, expected RFC 3339 or YYYY-MM-DD",
            raw
        ))
    })
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    timestamp_from_str(&raw)
}

pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => timestamp_from_str(&raw).map(Some),
        None => Ok(None),
    }
}

pub fn patch_timestamp<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_timestamp(deserializer).map(Some)
}

/// Texto opcional donde `""` (o solo espacios) equivale a ausente
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|v| !v.trim().is_empty()))
}

/// Versión PATCH de `blank_as_none`: `""` borra el valor igual que `null`
pub fn patch_blank_as_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(Some)
}
