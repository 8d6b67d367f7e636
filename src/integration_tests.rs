// Integration tests for end-to-end workflows: CSV bytes -> dataset ->
// filtered view -> dashboard aggregates

#[cfg(test)]
mod integration_tests {
    use crate::dataset::FundingDataset;
    use crate::filter::{filter_records, FilterParams};
    use crate::metrics;
    use std::collections::BTreeSet;

    const CSV: &str = "\
name, market ,funding_total_usd,status,country_code,region,city,funding_rounds,founded_at
#waywire,News,\"$1,750,000\",acquired,USA,New York City,New York,1,2012-06-01
MobileWorks,Software,\"$2,000,000\",operating,USA,SF Bay Area,Berkeley,3,2010-01-01
Tracxn,Analytics,\"$12,500,000\",operating,IND,Bangalore,Bangalore,2,2012-08-01
CureFit,Health And Wellness,\"$4,000,000\",operating,IND,Bangalore,Bangalore,1,2016-07-01
FailFast,Software,\"$300,000\",closed,GBR,London,London,1,2016-02-01
Stealthy,,-,,USA,,San Francisco,1,
";

    fn load() -> FundingDataset {
        FundingDataset::from_csv_bytes(CSV.as_bytes()).unwrap()
    }

    fn selection(values: &[&str]) -> Option<BTreeSet<String>> {
        Some(values.iter().map(|s| s.to_string()).collect())
    }

    /// Full pass: load -> no filters -> KPI cards
    #[test]
    fn test_load_and_summarize_end_to_end() {
        let ds = load();
        assert_eq!(ds.len(), 6);

        let view = filter_records(&ds, &FilterParams::default()).unwrap();
        let kpis = metrics::summarize(&view);

        assert_eq!(kpis.total_startups, 6);
        assert_eq!(kpis.total_funding, 20_550_000.0);
        assert_eq!(kpis.countries_covered, 3);
        assert_eq!(kpis.total_rounds, 9);
    }

    /// Full pass: country filter -> every aggregate respects the subset
    #[test]
    fn test_country_filter_flows_through_aggregates() {
        let ds = load();
        let params = FilterParams {
            countries: selection(&["IND"]),
            ..Default::default()
        };
        let view = filter_records(&ds, &params).unwrap();
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.country_code.as_deref() == Some("IND")));

        let companies = metrics::top_companies(&view, 10);
        assert_eq!(companies[0].name, "Tracxn");
        assert_eq!(companies[0].total_funding, 12_500_000.0);

        let countries = metrics::top_countries(&view, 5);
        assert_eq!(countries.len(), 1);
        assert!((countries[0].share_of_total_pct - 100.0).abs() < 1e-9);
    }

    /// Full pass: year range filter + market trend
    #[test]
    fn test_year_range_and_market_trend() {
        let ds = load();
        let params = FilterParams {
            year_range: Some((2010, 2012)),
            ..Default::default()
        };
        let view = filter_records(&ds, &params).unwrap();

        let trend = metrics::funding_by_year(&view);
        let years: Vec<i32> = trend.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2012]);
        // 2012: #waywire 1.75M + Tracxn 12.5M
        assert_eq!(trend[1].total_funding, 14_250_000.0);

        let software = metrics::market_funding_by_year(&view, "software");
        assert_eq!(software.len(), 1);
        assert_eq!(software[0].year, 2010);
    }

    /// Emerging markets only consider companies founded after the threshold
    #[test]
    fn test_emerging_markets_after_threshold() {
        let ds = load();
        let view = filter_records(&ds, &FilterParams::default()).unwrap();

        let emerging = metrics::emerging_markets(&view, 2015, 5);
        let markets: Vec<&str> = emerging.iter().map(|m| m.market.as_str()).collect();
        assert_eq!(markets, vec!["Health And Wellness", "Software"]);
    }

    /// Status breakdown covers every record, unknowns included
    #[test]
    fn test_status_breakdown_accounts_for_all_records() {
        let ds = load();
        let view = filter_records(&ds, &FilterParams::default()).unwrap();

        let breakdown = metrics::status_breakdown(&view);
        let total: usize = breakdown.iter().map(|b| b.count).sum();
        assert_eq!(total, view.len());

        let operating = breakdown.iter().find(|b| b.status == "operating").unwrap();
        assert_eq!(operating.count, 3);
        // acquired + missing both land in unknown
        let unknown = breakdown.iter().find(|b| b.status == "unknown").unwrap();
        assert_eq!(unknown.count, 2);
    }

    /// Filters that exclude everything produce empty-but-valid responses
    #[test]
    fn test_filters_excluding_everything() {
        let ds = load();
        let params = FilterParams {
            countries: selection(&["JPN"]),
            ..Default::default()
        };
        let view = filter_records(&ds, &params).unwrap();
        assert!(view.is_empty());

        let kpis = metrics::summarize(&view);
        assert_eq!(kpis.total_startups, 0);
        assert_eq!(kpis.avg_funding_per_startup, None);
        assert!(metrics::top_companies(&view, 10).is_empty());
        assert!(metrics::funding_by_year(&view).is_empty());
    }
}
