//! HTTP request handlers for the dashboard endpoints
//!
//! Every data endpoint accepts the same filter query parameters
//! (`start_year`, `end_year`, `countries`, `markets`) and recomputes its
//! aggregate over a freshly filtered view of the dataset. There is no
//! cross-request state: changing a filter in the page simply re-issues the
//! requests with different parameters.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::filter::{filter_records, FilterParams};
use crate::format::{grouped_count, human_usd};
use crate::metrics::{self, DEFAULT_EMERGING_SINCE};
use crate::record::FundingRecord;

const DEFAULT_COMPANY_LIMIT: usize = 10;
const DEFAULT_COUNTRY_LIMIT: usize = 5;
const DEFAULT_MARKET_LIMIT: usize = 10;
const DEFAULT_EMERGING_LIMIT: usize = 5;
const DEFAULT_WORDCLOUD_LIMIT: usize = 50;

/// Common query parameters shared by every data endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    /// Inclusive lower bound on founded year.
    pub start_year: Option<i32>,
    /// Inclusive upper bound on founded year.
    pub end_year: Option<i32>,
    /// Comma-separated country codes.
    pub countries: Option<String>,
    /// Comma-separated market segments.
    pub markets: Option<String>,
    /// Ranking size for top-N endpoints.
    pub limit: Option<usize>,
    /// Threshold year for the emerging-markets endpoint.
    pub since: Option<i32>,
}

impl DashboardQuery {
    /// Converts the raw query parameters into validated filter values.
    ///
    /// A bound given on only one side leaves the other side open. An empty
    /// `countries=` / `markets=` parameter is treated the same as absent.
    pub fn to_filter_params(&self) -> FilterParams {
        let year_range = match (self.start_year, self.end_year) {
            (None, None) => None,
            (start, end) => Some((start.unwrap_or(i32::MIN), end.unwrap_or(i32::MAX))),
        };
        FilterParams {
            year_range,
            countries: self.countries.as_deref().and_then(parse_selection),
            markets: self.markets.as_deref().and_then(parse_selection),
        }
    }
}

/// Extractor wrapping `DashboardQuery` so a malformed numeric parameter
/// (`start_year=abc`, `limit=x`) produces the same `{"error", "message"}`
/// JSON body as every other API failure instead of axum's plain-text
/// rejection.
pub struct DashboardParams(pub DashboardQuery);

#[axum::async_trait]
impl<S> FromRequestParts<S> for DashboardParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<DashboardQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidParameter(rejection.body_text()))?;
        Ok(DashboardParams(query))
    }
}

/// Splits a comma-separated selection into a set, dropping blank entries.
fn parse_selection(raw: &str) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// Filters the dataset for one request.
fn filtered_view<'a>(
    state: &'a AppState,
    query: &DashboardQuery,
) -> Result<Vec<&'a FundingRecord>, ApiError> {
    let params = query.to_filter_params();
    Ok(filter_records(&state.dataset, &params)?)
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// Response for the filter-values endpoint
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub countries: Vec<String>,
    pub markets: Vec<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

/// GET /api/filters - Values available for the sidebar controls
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FiltersResponse> {
    let dataset = &state.dataset;
    Json(FiltersResponse {
        countries: dataset.countries.clone(),
        markets: dataset.markets.clone(),
        min_year: dataset.year_bounds.map(|(min, _)| min),
        max_year: dataset.year_bounds.map(|(_, max)| max),
    })
}

/// Response for the KPI summary endpoint
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_startups: usize,
    pub total_startups_display: String,
    pub total_funding: f64,
    pub total_funding_display: String,
    pub countries_covered: usize,
    pub avg_funding_per_startup: Option<f64>,
    pub avg_funding_display: String,
    pub total_rounds: u64,
    pub total_rounds_display: String,
}

/// GET /api/summary - KPI cards
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<SummaryResponse>, ApiError> {
    let view = filtered_view(&state, &query)?;
    let kpis = metrics::summarize(&view);

    Ok(Json(SummaryResponse {
        total_startups: kpis.total_startups,
        total_startups_display: grouped_count(kpis.total_startups as u64),
        total_funding: kpis.total_funding,
        total_funding_display: human_usd(kpis.total_funding),
        countries_covered: kpis.countries_covered,
        avg_funding_per_startup: kpis.avg_funding_per_startup,
        avg_funding_display: kpis
            .avg_funding_per_startup
            .map(human_usd)
            .unwrap_or_else(|| "n/a".to_string()),
        total_rounds: kpis.total_rounds,
        total_rounds_display: grouped_count(kpis.total_rounds),
    }))
}

/// One entry in the top-companies response
#[derive(Debug, Serialize)]
pub struct CompanyEntry {
    pub name: String,
    pub market: Option<String>,
    pub country_code: Option<String>,
    pub total_funding: f64,
    pub total_funding_display: String,
    pub share_of_leader_pct: f64,
}

/// Response for the top-companies endpoint
#[derive(Debug, Serialize)]
pub struct TopCompaniesResponse {
    pub companies: Vec<CompanyEntry>,
}

/// GET /api/companies/top - Highest-funded companies
pub async fn get_top_companies(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<TopCompaniesResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_COMPANY_LIMIT);
    let view = filtered_view(&state, &query)?;

    let companies = metrics::top_companies(&view, limit)
        .into_iter()
        .map(|c| CompanyEntry {
            total_funding_display: human_usd(c.total_funding),
            name: c.name,
            market: c.market,
            country_code: c.country_code,
            total_funding: c.total_funding,
            share_of_leader_pct: c.share_of_leader_pct,
        })
        .collect();

    Ok(Json(TopCompaniesResponse { companies }))
}

/// One entry in the top-countries response
#[derive(Debug, Serialize)]
pub struct CountryEntry {
    pub country_code: String,
    pub total_funding: f64,
    pub total_funding_display: String,
    pub share_of_total_pct: f64,
}

/// Response for the top-countries endpoint
#[derive(Debug, Serialize)]
pub struct TopCountriesResponse {
    pub countries: Vec<CountryEntry>,
}

/// GET /api/countries/top - Countries contributing the most funding
pub async fn get_top_countries(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<TopCountriesResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_COUNTRY_LIMIT);
    let view = filtered_view(&state, &query)?;

    let countries = metrics::top_countries(&view, limit)
        .into_iter()
        .map(|c| CountryEntry {
            total_funding_display: human_usd(c.total_funding),
            country_code: c.country_code,
            total_funding: c.total_funding,
            share_of_total_pct: c.share_of_total_pct,
        })
        .collect();

    Ok(Json(TopCountriesResponse { countries }))
}

/// One entry in market funding rankings
#[derive(Debug, Serialize)]
pub struct MarketEntry {
    pub market: String,
    pub total_funding: f64,
    pub total_funding_display: String,
}

/// Response for market funding rankings
#[derive(Debug, Serialize)]
pub struct MarketsResponse {
    pub markets: Vec<MarketEntry>,
}

fn market_entries(ranked: Vec<metrics::MarketFunding>) -> Vec<MarketEntry> {
    ranked
        .into_iter()
        .map(|m| MarketEntry {
            total_funding_display: human_usd(m.total_funding),
            market: m.market,
            total_funding: m.total_funding,
        })
        .collect()
}

/// GET /api/markets/top - Markets attracting the most funding
pub async fn get_top_markets(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<MarketsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_MARKET_LIMIT);
    let view = filtered_view(&state, &query)?;
    Ok(Json(MarketsResponse {
        markets: market_entries(metrics::top_markets(&view, limit)),
    }))
}

/// GET /api/markets/emerging - Top-funded markets among recently founded companies
pub async fn get_emerging_markets(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<MarketsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_EMERGING_LIMIT);
    let since = query.since.unwrap_or(DEFAULT_EMERGING_SINCE);
    let view = filtered_view(&state, &query)?;
    Ok(Json(MarketsResponse {
        markets: market_entries(metrics::emerging_markets(&view, since, limit)),
    }))
}

/// Response for the market-distribution endpoint
#[derive(Debug, Serialize)]
pub struct MarketDistributionResponse {
    pub segments: Vec<metrics::MarketShare>,
}

/// GET /api/markets/distribution - Record share per market segment
pub async fn get_market_distribution(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<MarketDistributionResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_MARKET_LIMIT);
    let view = filtered_view(&state, &query)?;
    Ok(Json(MarketDistributionResponse {
        segments: metrics::market_distribution(&view, limit),
    }))
}

/// Response for the word-cloud endpoint
#[derive(Debug, Serialize)]
pub struct WordCloudResponse {
    pub words: Vec<metrics::WordCount>,
}

/// GET /api/markets/wordcloud - Word frequencies across market labels
pub async fn get_market_wordcloud(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<WordCloudResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_WORDCLOUD_LIMIT);
    let view = filtered_view(&state, &query)?;
    Ok(Json(WordCloudResponse {
        words: metrics::market_word_frequencies(&view, limit),
    }))
}

/// Response for trend endpoints
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    /// The market the trend is restricted to, absent for the overall trend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    pub points: Vec<metrics::YearlyFunding>,
}

/// GET /api/trend - Total funding per founded year
pub async fn get_funding_trend(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<TrendResponse>, ApiError> {
    let view = filtered_view(&state, &query)?;
    Ok(Json(TrendResponse {
        market: None,
        points: metrics::funding_by_year(&view),
    }))
}

/// GET /api/markets/:market/trend - Per-year funding for one market
pub async fn get_market_trend(
    State(state): State<Arc<AppState>>,
    Path(market): Path<String>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<TrendResponse>, ApiError> {
    let view = filtered_view(&state, &query)?;

    let wanted = market.to_lowercase();
    let known = view.iter().any(|r| {
        r.market
            .as_deref()
            .map(|m| m.to_lowercase() == wanted)
            .unwrap_or(false)
    });
    if !known {
        return Err(ApiError::MarketNotFound(market));
    }

    Ok(Json(TrendResponse {
        points: metrics::market_funding_by_year(&view, &market),
        market: Some(market),
    }))
}

/// Response for the status-breakdown endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total: usize,
    pub statuses: Vec<metrics::StatusCount>,
}

/// GET /api/status - Operating / closed / unknown breakdown
pub async fn get_status_breakdown(
    State(state): State<Arc<AppState>>,
    DashboardParams(query): DashboardParams,
) -> Result<Json<StatusResponse>, ApiError> {
    let view = filtered_view(&state, &query)?;
    Ok(Json(StatusResponse {
        total: view.len(),
        statuses: metrics::status_breakdown(&view),
    }))
}

/// GET / - The dashboard page
pub async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_parameters_means_no_filters() {
        let query = DashboardQuery::default();
        assert_eq!(query.to_filter_params(), FilterParams::default());
    }

    #[test]
    fn test_query_year_bounds_can_be_one_sided() {
        let query = DashboardQuery {
            start_year: Some(2005),
            ..Default::default()
        };
        let params = query.to_filter_params();
        assert_eq!(params.year_range, Some((2005, i32::MAX)));

        let query = DashboardQuery {
            end_year: Some(2020),
            ..Default::default()
        };
        let params = query.to_filter_params();
        assert_eq!(params.year_range, Some((i32::MIN, 2020)));
    }

    #[test]
    fn test_query_selection_parsing() {
        let query = DashboardQuery {
            countries: Some("USA, GBR ,,DEU".to_string()),
            ..Default::default()
        };
        let params = query.to_filter_params();
        let countries = params.countries.unwrap();
        assert_eq!(countries.len(), 3);
        assert!(countries.contains("GBR"));
    }

    #[test]
    fn test_query_blank_selection_is_no_restriction() {
        let query = DashboardQuery {
            markets: Some("".to_string()),
            ..Default::default()
        };
        let params = query.to_filter_params();
        assert_eq!(params.markets, None);
    }

    #[tokio::test]
    async fn test_malformed_numeric_parameter_becomes_api_error() {
        let request = axum::http::Request::builder()
            .uri("/api/summary?start_year=abc")
            .body(())
            .unwrap();
        let (mut parts, _body) = request.into_parts();

        let err = DashboardParams::from_request_parts(&mut parts, &())
            .await
            .err()
            .expect("extraction should be rejected");
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_well_formed_parameters_extract() {
        let request = axum::http::Request::builder()
            .uri("/api/summary?start_year=2005&countries=USA&limit=3")
            .body(())
            .unwrap();
        let (mut parts, _body) = request.into_parts();

        let DashboardParams(query) = DashboardParams::from_request_parts(&mut parts, &())
            .await
            .expect("extraction should succeed");
        assert_eq!(query.start_year, Some(2005));
        assert_eq!(query.limit, Some(3));
        assert_eq!(query.countries.as_deref(), Some("USA"));
    }
}
