//! Aggregate queries over a filtered record view
//!
//! Every function here takes the filtered slice produced by
//! `filter::filter_records` and recomputes its answer from scratch. The
//! queries are the dashboard's widgets: the KPI summary, top-N rankings,
//! per-year trends, the market distribution, word-cloud frequencies, and
//! the status breakdown. Records without a parseable funding amount simply
//! contribute nothing to funding sums; they still count toward record and
//! company counts.
//!
//! Rankings are deterministic: descending by value, ties broken by name
//! ascending. No function panics on an empty view.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::record::FundingRecord;

/// Default threshold year for the emerging-markets query.
pub const DEFAULT_EMERGING_SINCE: i32 = 2015;

/// Headline numbers shown in the KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Distinct company names in the filtered view.
    pub total_startups: usize,
    /// Sum of all parseable funding amounts.
    pub total_funding: f64,
    /// Distinct country codes in the filtered view.
    pub countries_covered: usize,
    /// Mean of per-company funding totals; `None` when the view is empty.
    pub avg_funding_per_startup: Option<f64>,
    /// Sum of funding-round counts.
    pub total_rounds: u64,
}

/// One row of the top-companies ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyFunding {
    pub name: String,
    pub market: Option<String>,
    pub country_code: Option<String>,
    pub total_funding: f64,
    /// Funding relative to the ranking leader, 0..=100. Drives the
    /// progress bars next to each company.
    pub share_of_leader_pct: f64,
}

/// One row of the top-countries ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryFunding {
    pub country_code: String,
    pub total_funding: f64,
    /// Share of the filtered view's total funding, 0..=100.
    pub share_of_total_pct: f64,
}

/// One row of the top-markets ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketFunding {
    pub market: String,
    pub total_funding: f64,
}

/// Total funding attributed to companies founded in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyFunding {
    pub year: i32,
    pub total_funding: f64,
}

/// Share of records belonging to one market segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShare {
    pub market: String,
    pub count: usize,
    /// Percentage of records carrying any market label, 0..=100.
    pub share_pct: f64,
}

/// Frequency of one word across market labels (word-cloud input).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Count and share for one status bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    pub share_pct: f64,
}

/// Computes the KPI summary over the filtered view.
///
/// The average groups funding by company name first, so a company with
/// several rows counts once; companies with no parseable amount contribute
/// a zero to the mean rather than being dropped.
pub fn summarize(records: &[&FundingRecord]) -> KpiSummary {
    let mut by_company: HashMap<&str, f64> = HashMap::new();
    let mut countries: BTreeSet<&str> = BTreeSet::new();
    let mut total_funding = 0.0;
    let mut total_rounds: u64 = 0;

    for record in records {
        let entry = by_company.entry(record.name.as_str()).or_insert(0.0);
        if let Some(amount) = record.funding_total_usd {
            *entry += amount;
            total_funding += amount;
        }
        if let Some(code) = &record.country_code {
            countries.insert(code);
        }
        total_rounds += u64::from(record.funding_rounds.unwrap_or(0));
    }

    let total_startups = by_company.len();
    let avg_funding_per_startup = if total_startups == 0 {
        None
    } else {
        Some(by_company.values().sum::<f64>() / total_startups as f64)
    };

    KpiSummary {
        total_startups,
        total_funding,
        countries_covered: countries.len(),
        avg_funding_per_startup,
        total_rounds,
    }
}

/// Top companies by total funding, with share-of-leader percentages.
pub fn top_companies(records: &[&FundingRecord], limit: usize) -> Vec<CompanyFunding> {
    // Keep the first-seen market/country for each company
    let mut totals: BTreeMap<&str, (f64, Option<&str>, Option<&str>)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.name.as_str()).or_insert((
            0.0,
            record.market.as_deref(),
            record.country_code.as_deref(),
        ));
        if let Some(amount) = record.funding_total_usd {
            entry.0 += amount;
        }
    }

    let mut ranked: Vec<(&str, f64, Option<&str>, Option<&str>)> = totals
        .into_iter()
        .filter(|(_, (total, _, _))| *total > 0.0)
        .map(|(name, (total, market, country))| (name, total, market, country))
        .collect();
    ranked.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.truncate(limit);

    let leader = ranked.first().map(|(_, total, _, _)| *total).unwrap_or(0.0);
    ranked
        .into_iter()
        .map(|(name, total, market, country)| CompanyFunding {
            name: name.to_string(),
            market: market.map(String::from),
            country_code: country.map(String::from),
            total_funding: total,
            share_of_leader_pct: if leader > 0.0 {
                (total / leader) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Top countries by total funding, with each country's share of the
/// filtered view's total.
pub fn top_countries(records: &[&FundingRecord], limit: usize) -> Vec<CountryFunding> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut grand_total = 0.0;
    for record in records {
        if let (Some(code), Some(amount)) = (&record.country_code, record.funding_total_usd) {
            *totals.entry(code.as_str()).or_insert(0.0) += amount;
        }
        if let Some(amount) = record.funding_total_usd {
            grand_total += amount;
        }
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(code, total)| CountryFunding {
            country_code: code.to_string(),
            total_funding: total,
            share_of_total_pct: if grand_total > 0.0 {
                (total / grand_total) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Top markets by total funding.
pub fn top_markets(records: &[&FundingRecord], limit: usize) -> Vec<MarketFunding> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        if let (Some(market), Some(amount)) = (&record.market, record.funding_total_usd) {
            *totals.entry(market.as_str()).or_insert(0.0) += amount;
        }
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(market, total)| MarketFunding {
            market: market.to_string(),
            total_funding: total,
        })
        .collect()
}

/// Total funding per founded year, ascending by year.
///
/// Years appear only when at least one record contributed a parseable
/// amount, so the trend line has no phantom zero points.
pub fn funding_by_year(records: &[&FundingRecord]) -> Vec<YearlyFunding> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        if let (Some(year), Some(amount)) = (record.founded_year, record.funding_total_usd) {
            *totals.entry(year).or_insert(0.0) += amount;
        }
    }
    totals
        .into_iter()
        .map(|(year, total_funding)| YearlyFunding {
            year,
            total_funding,
        })
        .collect()
}

/// The yearly funding trend restricted to one market.
///
/// The market match is case-insensitive so the trend selector is not
/// sensitive to label casing in the source data.
pub fn market_funding_by_year(records: &[&FundingRecord], market: &str) -> Vec<YearlyFunding> {
    let wanted = market.to_lowercase();
    let in_market: Vec<&FundingRecord> = records
        .iter()
        .filter(|r| {
            r.market
                .as_deref()
                .map(|m| m.to_lowercase() == wanted)
                .unwrap_or(false)
        })
        .copied()
        .collect();
    funding_by_year(&in_market)
}

/// Record counts per market as a share of all labelled records, top N by
/// count.
pub fn market_distribution(records: &[&FundingRecord], limit: usize) -> Vec<MarketShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut labelled = 0usize;
    for record in records {
        if let Some(market) = &record.market {
            *counts.entry(market.as_str()).or_insert(0) += 1;
            labelled += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(market, count)| MarketShare {
            market: market.to_string(),
            count,
            share_pct: if labelled > 0 {
                (count as f64 / labelled as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Connective words excluded from the word cloud. Labels like
/// "Health And Wellness" would otherwise rank "and" near the top.
const WORDCLOUD_STOPWORDS: [&str; 4] = ["and", "of", "the", "for"];

/// Word frequencies across market labels, the input for the word cloud.
///
/// Labels are lowercased and split on whitespace; single-character tokens
/// (stray punctuation, ampersands) and connective stopwords are dropped.
pub fn market_word_frequencies(records: &[&FundingRecord], limit: usize) -> Vec<WordCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(market) = &record.market {
            for word in market.to_lowercase().split_whitespace() {
                let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
                if word.chars().count() > 1 && !WORDCLOUD_STOPWORDS.contains(&word.as_str()) {
                    *counts.entry(word).or_insert(0) += 1;
                }
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect()
}

/// Top-funded markets among companies founded strictly after `since`.
pub fn emerging_markets(
    records: &[&FundingRecord],
    since: i32,
    limit: usize,
) -> Vec<MarketFunding> {
    let recent: Vec<&FundingRecord> = records
        .iter()
        .filter(|r| r.founded_year.map(|y| y > since).unwrap_or(false))
        .copied()
        .collect();
    top_markets(&recent, limit)
}

/// Counts and shares for the `operating` / `closed` / `unknown` buckets.
///
/// Any status other than operating or closed (including missing) lands in
/// `unknown`. Computed from the filtered records on every call; there are
/// no baked-in counts.
pub fn status_breakdown(records: &[&FundingRecord]) -> Vec<StatusCount> {
    let mut operating = 0usize;
    let mut closed = 0usize;
    let mut unknown = 0usize;
    for record in records {
        match record.status.as_deref() {
            Some("operating") => operating += 1,
            Some("closed") => closed += 1,
            _ => unknown += 1,
        }
    }

    let total = records.len();
    let pct = |count: usize| {
        if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    };

    vec![
        StatusCount {
            status: "operating".to_string(),
            count: operating,
            share_pct: pct(operating),
        },
        StatusCount {
            status: "closed".to_string(),
            count: closed,
            share_pct: pct(closed),
        },
        StatusCount {
            status: "unknown".to_string(),
            count: unknown,
            share_pct: pct(unknown),
        },
    ]
}
