//! Writes a small demo funding CSV for running the dashboard locally
//! without the full `investments_VC.csv` export.
//!
//! Run with: `cargo run --bin generate-demo-data [path]`
//!
//! The output reproduces the quirks of the real export that the loader has
//! to cope with: a padded ` market ` header, `$1,234,567` amount strings,
//! `-` placeholders for unknown amounts, and blank region cells.

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "investments_VC.csv".to_string());

    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record([
        "name", " market ", "funding_total_usd", "status", "country_code", "region", "city",
        "funding_rounds", "founded_at",
    ])?;

    // (name, market, funding, status, country, region, city, rounds, founded)
    let rows: [(&str, &str, &str, &str, &str, &str, &str, &str, &str); 20] = [
        ("Waywire", "News", "$1,750,000", "acquired", "USA", "New York City", "New York", "1", "2012-06-01"),
        ("MobileWorks", "Software", "$2,000,000", "operating", "USA", "SF Bay Area", "Berkeley", "3", "2010-01-01"),
        ("Tracxn", "Analytics", "$12,500,000", "operating", "IND", "Bangalore", "Bangalore", "2", "2012-08-01"),
        ("CureFit", "Health And Wellness", "$4,000,000", "operating", "IND", "Bangalore", "Bangalore", "1", "2016-07-01"),
        ("DeepSignal", "Machine Learning", "$27,000,000", "operating", "USA", "SF Bay Area", "Palo Alto", "4", "2017-03-01"),
        ("FailFast", "Software", "$300,000", "closed", "GBR", "London", "London", "1", "2016-02-01"),
        ("GreenVolt", "Clean Energy", "$55,000,000", "operating", "DEU", "", "Munich", "3", "2014-05-01"),
        ("Finlever", "Fintech", "$8,200,000", "operating", "GBR", "London", "London", "2", "2015-11-01"),
        ("Stealthy", "", "-", "", "USA", "", "San Francisco", "1", ""),
        ("CloudNine", "Cloud Computing", "$18,400,000", "operating", "USA", "Seattle", "Seattle", "3", "2011-09-01"),
        ("BioHelix", "Biotechnology", "$33,000,000", "operating", "CHE", "Basel", "Basel", "2", "2013-04-01"),
        ("ShopLocal", "E-Commerce", "$950,000", "closed", "CAN", "Toronto", "Toronto", "1", "2012-02-01"),
        ("EduSpark", "Education", "$3,600,000", "operating", "IND", "", "Mumbai", "2", "2018-01-01"),
        ("AgriSense", "Agriculture", "$6,750,000", "operating", "AUS", "Sydney", "Sydney", "1", "2017-10-01"),
        ("Nimbus Games", "Games", "$2,250,000", "acquired", "SWE", "Stockholm", "Stockholm", "2", "2009-06-01"),
        ("SecureStack", "Security", "$21,000,000", "operating", "ISR", "Tel Aviv", "Tel Aviv", "3", "2015-08-01"),
        ("RideWave", "Transportation", "$40,000,000", "closed", "USA", "SF Bay Area", "San Francisco", "5", "2013-03-01"),
        ("Mealio", "Food And Beverages", "$1,100,000", "operating", "FRA", "Paris", "Paris", "1", "2019-02-01"),
        ("Chartify", "Analytics", "$5,400,000", "operating", "USA", "Boston", "Boston", "2", "2016-06-01"),
        ("PetPal", "Consumer", "undisclosed", "operating", "GBR", "", "Manchester", "1", "2018-09-01"),
    ];

    for row in rows {
        writer.write_record([
            row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7, row.8,
        ])?;
    }

    writer.flush()?;
    println!("Wrote {} demo records to {}", rows.len(), path);
    println!("Start the dashboard with: DATA_PATH={} cargo run --bin dashboard-server", path);

    Ok(())
}
