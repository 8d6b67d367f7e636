//! Funding record model and field cleaning
//!
//! One `FundingRecord` per row of the source CSV. The raw export is messy:
//! funding amounts arrive as `"$1,500,000"` strings, founding dates in a mix
//! of formats, and region is frequently blank where city is not. Cleaning
//! happens once at load time so the aggregate queries can stay simple.

use serde::Serialize;

/// A single startup-funding observation (one CSV row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRecord {
    /// Company name. Rows without a name are skipped at load time.
    pub name: String,
    /// Market segment (industry/vertical label).
    pub market: Option<String>,
    /// Total funding in USD, cleaned from the `$1,234,567` source format.
    pub funding_total_usd: Option<f64>,
    /// Operating status, lowercased (`operating`, `closed`, `acquired`, ...).
    pub status: Option<String>,
    /// ISO-3166 alpha-3 country code.
    pub country_code: Option<String>,
    /// Region, falling back to city when the source region is blank.
    pub region: Option<String>,
    /// City as given in the source.
    pub city: Option<String>,
    /// Number of funding rounds.
    pub funding_rounds: Option<u32>,
    /// Year the company was founded, extracted from the `founded_at` date.
    pub founded_year: Option<i32>,
}

/// Parses a USD amount from the source format.
///
/// Strips `$` and thousands separators before parsing. Anything that does
/// not survive as a finite number (blank cells, the `-` placeholder the
/// export uses for unknown amounts) becomes `None`.
pub fn parse_usd(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Extracts the founding year from a `founded_at` date string.
///
/// The export mixes `2012-05-01`, `01/05/2012`, and `2012/05/01` style
/// dates. Tries the known formats in order, then falls back to a leading
/// four-digit year. Years outside 1800..=2100 are treated as data errors
/// and dropped.
pub fn parse_founded_year(raw: &str) -> Option<i32> {
    use chrono::{Datelike, NaiveDate};

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return sanity_check_year(date.year());
        }
    }

    // Fall back to a bare leading year ("2012" or "2012-??")
    if let Some(prefix) = raw.get(..4) {
        if let Ok(year) = prefix.parse::<i32>() {
            return sanity_check_year(year);
        }
    }
    None
}

fn sanity_check_year(year: i32) -> Option<i32> {
    if (1800..=2100).contains(&year) {
        Some(year)
    } else {
        None
    }
}

/// Cleans the region field, falling back to city when region is blank.
///
/// Internal runs of whitespace are collapsed to a single space, matching
/// how the source data is normalized before grouping.
pub fn clean_region(region: &str, city: &str) -> Option<String> {
    let picked = if region.trim().is_empty() {
        city
    } else {
        region
    };
    let collapsed = picked.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Trims a cell and maps blank cells to `None`.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lowercased, trimmed status label.
pub fn normalize_status(raw: &str) -> Option<String> {
    non_empty(raw).map(|s| s.to_lowercase())
}
