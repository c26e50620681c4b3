use crate::api::{PropertyRecord, StatisticsSummary};

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median of an ascending-sorted slice by positional indexing.
pub(crate) fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Non-null prices of the given records, sorted ascending.
pub(crate) fn sorted_prices(records: &[&PropertyRecord]) -> Vec<f64> {
    let mut prices: Vec<f64> = records.iter().filter_map(|r| r.price).collect();
    prices.sort_by(f64::total_cmp);
    prices
}

/// Compute the statistics summary for an already filtered set.
pub fn compute_statistics(records: &[&PropertyRecord]) -> StatisticsSummary {
    let prices = sorted_prices(records);

    // Records without a usable square footage are skipped, not fatal.
    let price_per_sqft: Vec<f64> = records
        .iter()
        .filter_map(|r| match (r.price, r.square_feet) {
            (Some(price), Some(sqft)) if sqft > 0 => Some(price / f64::from(sqft)),
            _ => None,
        })
        .collect();

    StatisticsSummary {
        average_price: mean(&prices),
        median_price: median_sorted(&prices),
        average_price_per_sqft: mean(&price_per_sqft),
        total_properties: records.len(),
    }
}
