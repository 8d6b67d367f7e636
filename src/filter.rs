//! Filter predicates over the loaded dataset
//!
//! Each dashboard interaction reduces the full record set with a founded-year
//! range plus country and market multi-selects. Filtering produces a borrowed
//! view; nothing is mutated and nothing is cached between requests.

use std::collections::BTreeSet;

use crate::dataset::FundingDataset;
use crate::record::FundingRecord;

/// Filter values chosen in the dashboard sidebar.
///
/// `None` for any field means "no restriction". When a restriction is set,
/// records missing the corresponding field are excluded: an unknown founded
/// year cannot satisfy a year range, and an unknown country cannot satisfy
/// a country selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// Inclusive founded-year range.
    pub year_range: Option<(i32, i32)>,
    /// Selected country codes.
    pub countries: Option<BTreeSet<String>>,
    /// Selected market segments.
    pub markets: Option<BTreeSet<String>>,
}

/// Errors produced by filter validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Start year is after end year
    InvalidYearRange(i32, i32),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::InvalidYearRange(start, end) => {
                write!(f, "Invalid year range: {} > {}", start, end)
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl FilterParams {
    /// Validates the filter values.
    ///
    /// An inverted year range is a caller error surfaced up front, not an
    /// empty result.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let Some((start, end)) = self.year_range {
            if start > end {
                return Err(FilterError::InvalidYearRange(start, end));
            }
        }
        Ok(())
    }

    /// Whether a record satisfies every set predicate.
    pub fn matches(&self, record: &FundingRecord) -> bool {
        if let Some((start, end)) = self.year_range {
            match record.founded_year {
                Some(year) if year >= start && year <= end => {}
                _ => return false,
            }
        }
        if let Some(countries) = &self.countries {
            match &record.country_code {
                Some(code) if countries.contains(code) => {}
                _ => return false,
            }
        }
        if let Some(markets) = &self.markets {
            match &record.market {
                Some(market) if markets.contains(market) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Applies the filters to the dataset, returning a borrowed view.
///
/// # Errors
/// Returns `FilterError::InvalidYearRange` when the range is inverted.
pub fn filter_records<'a>(
    dataset: &'a FundingDataset,
    params: &FilterParams,
) -> Result<Vec<&'a FundingRecord>, FilterError> {
    params.validate()?;
    Ok(dataset
        .records
        .iter()
        .filter(|record| params.matches(record))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, country: Option<&str>, market: Option<&str>, year: Option<i32>) -> FundingRecord {
        FundingRecord {
            name: name.to_string(),
            market: market.map(String::from),
            funding_total_usd: Some(1_000_000.0),
            status: Some("operating".to_string()),
            country_code: country.map(String::from),
            region: None,
            city: None,
            funding_rounds: Some(1),
            founded_year: year,
        }
    }

    fn dataset() -> FundingDataset {
        FundingDataset::from_records(vec![
            record("Alpha", Some("USA"), Some("Software"), Some(2010)),
            record("Beta", Some("GBR"), Some("Biotech"), Some(2015)),
            record("Gamma", Some("USA"), Some("Biotech"), Some(2018)),
            record("Delta", None, Some("Software"), None),
        ])
    }

    fn selection(values: &[&str]) -> Option<BTreeSet<String>> {
        Some(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let ds = dataset();
        let out = filter_records(&ds, &FilterParams::default()).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_country_filter_matches_only_selected() {
        let ds = dataset();
        let params = FilterParams {
            countries: selection(&["USA"]),
            ..Default::default()
        };
        let out = filter_records(&ds, &params).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|r| r.country_code.as_deref() == Some("USA")));
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let ds = dataset();
        let params = FilterParams {
            year_range: Some((2010, 2015)),
            ..Default::default()
        };
        let out = filter_records(&ds, &params).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_records_missing_fields_are_excluded_when_filtered() {
        let ds = dataset();
        // Delta has no founded year and no country
        let params = FilterParams {
            year_range: Some((1990, 2030)),
            ..Default::default()
        };
        let out = filter_records(&ds, &params).unwrap();
        assert!(out.iter().all(|r| r.name != "Delta"));

        let params = FilterParams {
            countries: selection(&["USA", "GBR"]),
            ..Default::default()
        };
        let out = filter_records(&ds, &params).unwrap();
        assert!(out.iter().all(|r| r.name != "Delta"));
    }

    #[test]
    fn test_predicates_combine_conjunctively() {
        let ds = dataset();
        let params = FilterParams {
            year_range: Some((2015, 2020)),
            countries: selection(&["USA"]),
            markets: selection(&["Biotech"]),
        };
        let out = filter_records(&ds, &params).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Gamma");
    }

    #[test]
    fn test_inverted_year_range_is_an_error() {
        let ds = dataset();
        let params = FilterParams {
            year_range: Some((2020, 2010)),
            ..Default::default()
        };
        let err = filter_records(&ds, &params).unwrap_err();
        assert_eq!(err, FilterError::InvalidYearRange(2020, 2010));
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let ds = dataset();
        let params = FilterParams {
            markets: Some(BTreeSet::new()),
            ..Default::default()
        };
        let out = filter_records(&ds, &params).unwrap();
        assert!(out.is_empty());
    }
}
