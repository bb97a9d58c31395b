//! Input transforms applied before a value is stored, and date (de)serialization

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::sync::Arc;

/// Function applied to raw text input before it reaches the store
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Turn free text into a URL slug: lowercase ASCII words joined by dashes
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Keep a trailing separator while the user is still typing, so "acme " can
/// become "acme-corp" one keystroke at a time.
pub fn slugify_typing(input: &str) -> String {
    let slug = slugify(input);
    let trailing_separator = input
        .chars()
        .last()
        .is_some_and(|c| c == ' ' || c == '-' || c == '_');
    if trailing_separator && !slug.is_empty() {
        format!("{slug}-")
    } else {
        slug
    }
}

pub fn lowercase(input: &str) -> String {
    input.to_lowercase()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// Serialize a date as an RFC 3339 timestamp at midnight UTC, with milliseconds
pub fn to_iso_date(date: NaiveDate) -> String {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN);
    DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored date, accepting a full timestamp or a bare `YYYY-MM-DD`
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}
