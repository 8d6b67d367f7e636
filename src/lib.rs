pub mod record;
pub mod dataset;
pub mod filter;
pub mod metrics;
pub mod format;
pub mod server;

#[cfg(test)]
mod integration_tests;

pub use record::FundingRecord;
pub use dataset::{DatasetError, FundingDataset};
pub use filter::{filter_records, FilterError, FilterParams};
pub use metrics::{
    emerging_markets, funding_by_year, market_distribution, market_funding_by_year,
    market_word_frequencies, status_breakdown, summarize, top_companies, top_countries,
    top_markets, CompanyFunding, CountryFunding, KpiSummary, MarketFunding, MarketShare,
    StatusCount, WordCount, YearlyFunding, DEFAULT_EMERGING_SINCE,
};
pub use format::{grouped_count, human_usd};
pub use server::{run_server, ApiError, AppState, DashboardQuery, ServerConfig};
