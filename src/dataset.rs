//! Dataset loading and indexing
//!
//! Loads the funding CSV once at startup into an immutable `FundingDataset`.
//! The export this dashboard was built around (`investments_VC.csv`) is
//! ISO-8859-1 encoded and pads its header names with whitespace, so loading
//! tolerates both. Unique filter values and the founded-year bounds are
//! precomputed here so the filter sidebar can be populated with a single
//! request.

use std::collections::BTreeSet;
use std::path::Path;

use crate::record::{
    clean_region, non_empty, normalize_status, parse_founded_year, parse_usd, FundingRecord,
};

/// Errors that can occur while loading the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// Could not read the source file
    Io(String),
    /// CSV-level parse failure
    Csv(String),
    /// A column the loader cannot work without is absent
    MissingColumn(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(msg) => write!(f, "I/O error: {}", msg),
            DatasetError::Csv(msg) => write!(f, "CSV error: {}", msg),
            DatasetError::MissingColumn(col) => write!(f, "Missing required column: {}", col),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        DatasetError::Io(err.to_string())
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err.to_string())
    }
}

/// The complete loaded dataset plus precomputed filter metadata.
///
/// Immutable for the lifetime of the process: every request borrows the
/// records, filters them, and recomputes aggregates from scratch.
#[derive(Debug, Clone)]
pub struct FundingDataset {
    /// All funding records, in source order.
    pub records: Vec<FundingRecord>,
    /// Sorted unique country codes present in the data.
    pub countries: Vec<String>,
    /// Sorted unique market segments present in the data.
    pub markets: Vec<String>,
    /// Min and max founded year across records that have one.
    pub year_bounds: Option<(i32, i32)>,
}

impl FundingDataset {
    /// Loads the dataset from a CSV file on disk.
    ///
    /// # Errors
    /// Returns `DatasetError` if the file cannot be read, the CSV is
    /// malformed, or the `name` column is missing.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path)?;
        let dataset = Self::from_csv_bytes(&bytes)?;
        tracing::info!(
            records = dataset.records.len(),
            countries = dataset.countries.len(),
            markets = dataset.markets.len(),
            "dataset loaded from {}",
            path.display()
        );
        Ok(dataset)
    }

    /// Parses a dataset from raw CSV bytes.
    ///
    /// Bytes are decoded as UTF-8 when valid and as ISO-8859-1 otherwise,
    /// so a Latin-1 export never fails to load. Header names are trimmed
    /// before lookup. Rows without a company name are skipped.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        let text = decode_utf8_or_latin1(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let columns = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (row_no, result) in reader.records().enumerate() {
            let row = result?;
            match columns.record_from_row(&row) {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    tracing::debug!(row = row_no, "skipping row without a company name");
                }
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "rows skipped during load");
        }

        Ok(Self::from_records(records))
    }

    /// Builds the dataset and its filter metadata from parsed records.
    pub fn from_records(records: Vec<FundingRecord>) -> Self {
        let mut countries: BTreeSet<String> = BTreeSet::new();
        let mut markets: BTreeSet<String> = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for record in &records {
            if let Some(country) = &record.country_code {
                countries.insert(country.clone());
            }
            if let Some(market) = &record.market {
                markets.insert(market.clone());
            }
            if let Some(year) = record.founded_year {
                year_bounds = Some(match year_bounds {
                    None => (year, year),
                    Some((min, max)) => (min.min(year), max.max(year)),
                });
            }
        }

        FundingDataset {
            records,
            countries: countries.into_iter().collect(),
            markets: markets.into_iter().collect(),
            year_bounds,
        }
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decodes bytes as UTF-8 when valid, otherwise as ISO-8859-1.
///
/// Latin-1 maps each byte to the Unicode code point of the same value, so
/// the fallback is a direct byte-to-char widening.
fn decode_utf8_or_latin1(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Resolved positions of the source columns after header trimming.
struct ColumnIndex {
    name: usize,
    market: Option<usize>,
    funding_total_usd: Option<usize>,
    status: Option<usize>,
    country_code: Option<usize>,
    region: Option<usize>,
    city: Option<usize>,
    funding_rounds: Option<usize>,
    founded_at: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let name = find("name").ok_or_else(|| DatasetError::MissingColumn("name".to_string()))?;

        Ok(ColumnIndex {
            name,
            market: find("market"),
            funding_total_usd: find("funding_total_usd"),
            status: find("status"),
            country_code: find("country_code"),
            region: find("region"),
            city: find("city"),
            funding_rounds: find("funding_rounds"),
            founded_at: find("founded_at"),
        })
    }

    fn record_from_row(&self, row: &csv::StringRecord) -> Option<FundingRecord> {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

        let name = row.get(self.name)?.trim();
        if name.is_empty() {
            return None;
        }

        let region_raw = cell(self.region);
        let city_raw = cell(self.city);

        Some(FundingRecord {
            name: name.to_string(),
            market: non_empty(cell(self.market)),
            funding_total_usd: parse_usd(cell(self.funding_total_usd)),
            status: normalize_status(cell(self.status)),
            country_code: non_empty(cell(self.country_code)),
            region: clean_region(region_raw, city_raw),
            city: non_empty(city_raw),
            funding_rounds: cell(self.funding_rounds).trim().parse().ok(),
            founded_year: parse_founded_year(cell(self.founded_at)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name, market ,funding_total_usd,status,country_code,region,city,funding_rounds,founded_at
Waywire,News,\"$1,750,000\",acquired,USA,New York City,New York,1,2012-06-01
Kickback,Games,-,operating,DEU,,Berlin,2,2009-03-15
Plotly,Analytics,\"$5,500,000\",operating,CAN,Montreal,Montreal,3,2012-01-01
,Ghost,\"$9,000\",operating,USA,SF Bay,San Francisco,1,2010-01-01
Curisto,Health,\"$120,000\",closed,USA,SF  Bay   Area,San Francisco,1,badly-dated
";

    #[test]
    fn test_load_from_bytes_trims_padded_headers() {
        let ds = FundingDataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        // Nameless row is skipped
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records[0].market.as_deref(), Some("News"));
    }

    #[test]
    fn test_load_cleans_funding_amounts() {
        let ds = FundingDataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.records[0].funding_total_usd, Some(1_750_000.0));
        assert_eq!(ds.records[1].funding_total_usd, None);
    }

    #[test]
    fn test_load_region_fallback_and_collapse() {
        let ds = FundingDataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        // Blank region falls back to city
        assert_eq!(ds.records[1].region.as_deref(), Some("Berlin"));
        // Whitespace runs collapse
        assert_eq!(ds.records[3].region.as_deref(), Some("SF Bay Area"));
    }

    #[test]
    fn test_load_founded_year_extraction() {
        let ds = FundingDataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.records[0].founded_year, Some(2012));
        assert_eq!(ds.records[3].founded_year, None);
    }

    #[test]
    fn test_filter_metadata_precomputed() {
        let ds = FundingDataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.countries, vec!["CAN", "DEU", "USA"]);
        assert!(ds.markets.contains(&"Games".to_string()));
        assert_eq!(ds.year_bounds, Some((2009, 2012)));
    }

    #[test]
    fn test_latin1_bytes_load_without_error() {
        // "Zürich" with a Latin-1 encoded ü (0xFC), invalid as UTF-8
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"name,market,city\nAlpen,Fintech,Z");
        bytes.push(0xFC);
        bytes.extend_from_slice(b"rich\n");

        let ds = FundingDataset::from_csv_bytes(&bytes).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].city.as_deref(), Some("Z\u{fc}rich"));
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let csv = "market,funding_total_usd\nGames,$100\n";
        let err = FundingDataset::from_csv_bytes(csv.as_bytes()).unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("name".to_string()));
    }

    #[test]
    fn test_empty_dataset_has_no_metadata() {
        let csv = "name,market\n";
        let ds = FundingDataset::from_csv_bytes(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert!(ds.countries.is_empty());
        assert_eq!(ds.year_bounds, None);
    }
}
