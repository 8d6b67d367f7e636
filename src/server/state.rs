//! Shared application state for the dashboard server

use crate::dataset::FundingDataset;

/// Shared application state.
///
/// The dataset is loaded once at startup and never mutated, so handlers
/// borrow it directly through the `Arc` without any locking. Each request
/// filters and aggregates fresh from these records.
pub struct AppState {
    /// The loaded funding dataset.
    pub dataset: FundingDataset,
}

impl AppState {
    /// Creates application state around a loaded dataset.
    pub fn new(dataset: FundingDataset) -> Self {
        AppState { dataset }
    }
}
