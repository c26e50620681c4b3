//! Month-bucketed listing history.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use crate::api::{HistoricalInsight, PropertyRecord};
use crate::services::statistics::mean;

/// Inclusive listing-date window; either bound may be open.
pub fn within_window(
    listed: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.map_or(true, |s| listed >= s) && end.map_or(true, |e| listed <= e)
}

#[derive(Default)]
struct Bucket {
    count: usize,
    prices: Vec<f64>,
    square_feet: Vec<f64>,
}

/// Group records by (year, month) of their listing date, in chronological order.
pub fn historical_insights<'a, I>(
    records: I,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<HistoricalInsight>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    // BTreeMap keys give year-then-month ordering for free.
    let mut buckets: BTreeMap<(i32, u32), Bucket> = BTreeMap::new();

    for record in records {
        if !within_window(record.date_listed, start, end) {
            continue;
        }
        let key = (record.date_listed.year(), record.date_listed.month());
        let bucket = buckets.entry(key).or_default();
        bucket.count += 1;
        if let Some(price) = record.price {
            bucket.prices.push(price);
        }
        if let Some(sqft) = record.square_feet {
            bucket.square_feet.push(f64::from(sqft));
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), bucket)| HistoricalInsight {
            year,
            month,
            count: bucket.count,
            average_price: mean(&bucket.prices),
            average_square_feet: mean(&bucket.square_feet),
        })
        .collect()
}
