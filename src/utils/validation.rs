//! Utilidades de validación
//!
//! Este módulo contiene los validadores custom usados por los DTOs
//! (`#[validate(custom = "...")]`) y helpers de conversión de parámetros.

use chrono::{FixedOffset, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use validator::ValidationError;

/// Máximo de fotos adjuntas por reporte
pub const MAX_PHOTOS_PER_REPORT: usize = 20;
const MAX_PHOTO_REF_LEN: usize = 2048;

lazy_static! {
    /// Hora del día en formato HH:MM (24h)
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^\+?[0-9 ()\-]{3,20}$").unwrap();
    static ref UTC_OFFSET: Regex = Regex::new(r"^([+-])([01][0-9]|2[0-3]):([0-5][0-9])$").unwrap();
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error.message = Some("Expected a date formatted as YYYY-MM-DD".into());
        error
    })
}

/// Validar hora del día (HH:MM)
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if !TIME_OF_DAY.is_match(value) {
        let mut error = ValidationError::new("time_of_day");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("Expected a time formatted as HH:MM".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("Must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE.is_match(value) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("Phone may only contain digits, spaces, parentheses, dashes and a leading +".into());
        return Err(error);
    }
    Ok(())
}

/// Validar la lista de referencias de fotos de un reporte
pub fn validate_photos(photos: &[String]) -> Result<(), ValidationError> {
    if photos.len() > MAX_PHOTOS_PER_REPORT {
        let mut error = ValidationError::new("too_many_photos");
        error.add_param("max".into(), &MAX_PHOTOS_PER_REPORT);
        error.message = Some(format!("At most {} photos per report", MAX_PHOTOS_PER_REPORT).into());
        return Err(error);
    }
    if photos
        .iter()
        .any(|p| p.trim().is_empty() || p.len() > MAX_PHOTO_REF_LEN)
    {
        let mut error = ValidationError::new("photo_reference");
        error.message = Some("Photo references must be non-empty and reasonably short".into());
        return Err(error);
    }
    Ok(())
}

/// Parsear un offset UTC `±HH:MM`
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let caps = UTC_OFFSET.captures(value.trim())?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps[3].parse().ok()?;
    let seconds = hours * 3600 + minutes * 60;
    if &caps[1] == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

/// Normaliza un parámetro de query: los valores vacíos equivalen a "sin filtro"
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
