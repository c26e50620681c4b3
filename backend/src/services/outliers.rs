//! IQR-based price outlier detection.
//!
//! Quartiles use linear interpolation between closest ranks (the NumPy
//! `linear` method): for a sorted sample `x` of length `n` the `p`-th
//! quantile sits at position `h = (n - 1) * p` and equals
//! `x[floor(h)] + (h - floor(h)) * (x[ceil(h)] - x[floor(h)])`.

use crate::api::{Pagination, PropertyRecord};
use crate::services::statistics::sorted_prices;

/// Default IQR multiplier (Tukey fences).
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;

/// Linear-interpolation quantile of an ascending-sorted sample.
///
/// `p` is clamped to `[0, 1]`. Returns `None` for an empty sample.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Quartiles and fences for one detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Fences for an ascending-sorted sample, `None` when it is empty.
    pub fn from_sorted(sorted: &[f64], factor: f64) -> Option<Self> {
        let q1 = percentile(sorted, 0.25)?;
        let q3 = percentile(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - factor * iqr,
            upper: q3 + factor * iqr,
        })
    }

    /// Strictly outside the fences.
    pub fn is_outlier(&self, price: f64) -> bool {
        price < self.lower || price > self.upper
    }
}

/// Fences computed from the non-null prices of `records`.
pub fn iqr_bounds(records: &[&PropertyRecord], factor: f64) -> Option<IqrBounds> {
    IqrBounds::from_sorted(&sorted_prices(records), factor)
}

/// Records whose price falls outside the IQR fences, in input order,
/// paginated with skip then limit.
pub fn detect_outliers(
    records: &[&PropertyRecord],
    factor: f64,
    page: Pagination,
) -> Vec<PropertyRecord> {
    let Some(bounds) = iqr_bounds(records, factor) else {
        return vec![];
    };

    let outliers = records
        .iter()
        .filter(|r| r.price.is_some_and(|p| bounds.is_outlier(p)))
        .map(|r| (*r).clone());

    page.apply(outliers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PropertyId;
    use chrono::{TimeZone, Utc};

    fn record(id: i64, price: Option<f64>) -> PropertyRecord {
        PropertyRecord {
            property_id: PropertyId(id),
            address: format!("{} Oak Ave", id),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            price,
            bedrooms: Some(2),
            bathrooms: Some(1.0),
            square_feet: Some(900),
            date_listed: Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn records_with_prices(prices: &[f64]) -> Vec<PropertyRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| record(i as i64 + 1, Some(*p)))
            .collect()
    }

    fn all() -> Pagination {
        Pagination::new(0, usize::MAX)
    }

    #[test]
    fn test_percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.25), Some(1.75));
        assert_eq!(percentile(&sorted, 0.5), Some(2.5));
        assert_eq!(percentile(&sorted, 0.75), Some(3.25));
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn test_percentile_small_samples() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[7.0], 0.25), Some(7.0));
        assert_eq!(percentile(&[10.0, 20.0], 0.25), Some(12.5));
    }

    #[test]
    fn test_reference_dataset_flags_only_extreme_price() {
        let records = records_with_prices(&[
            10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 14.0, 13.0, 15.0, 10.0, 10.0, 100.0,
        ]);
        let refs: Vec<&PropertyRecord> = records.iter().collect();

        let bounds = iqr_bounds(&refs, DEFAULT_IQR_FACTOR).unwrap();
        assert!((bounds.q1 - 10.75).abs() < 1e-9);
        assert!((bounds.q3 - 13.25).abs() < 1e-9);
        assert!((bounds.lower - 7.0).abs() < 1e-9);
        assert!((bounds.upper - 17.0).abs() < 1e-9);

        let outliers = detect_outliers(&refs, DEFAULT_IQR_FACTOR, all());
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].price, Some(100.0));
    }

    #[test]
    fn test_empty_input_returns_empty() {
        assert!(detect_outliers(&[], DEFAULT_IQR_FACTOR, all()).is_empty());

        let records = vec![record(1, None), record(2, None)];
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        assert!(detect_outliers(&refs, DEFAULT_IQR_FACTOR, all()).is_empty());
    }

    #[test]
    fn test_zero_factor_flags_outside_quartiles() {
        let records = records_with_prices(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        // Q1 = 2, Q3 = 4
        let outliers = detect_outliers(&refs, 0.0, all());
        let prices: Vec<f64> = outliers.iter().filter_map(|r| r.price).collect();
        assert_eq!(prices, vec![1.0, 5.0]);
    }

    #[test]
    fn test_null_prices_are_never_outliers() {
        let mut records = records_with_prices(&[100.0, 100.0, 100.0, 100.0, 5000.0]);
        records.push(record(99, None));
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        let outliers = detect_outliers(&refs, DEFAULT_IQR_FACTOR, all());
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].property_id, PropertyId(5));
    }

    #[test]
    fn test_pagination_returns_second_outlier() {
        let records =
            records_with_prices(&[1.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 5000.0, 9000.0]);
        let refs: Vec<&PropertyRecord> = records.iter().collect();

        let all_outliers = detect_outliers(&refs, DEFAULT_IQR_FACTOR, all());
        let ids: Vec<i64> = all_outliers.iter().map(|r| r.property_id.value()).collect();
        assert_eq!(ids, vec![1, 8, 9]);

        let page = detect_outliers(&refs, DEFAULT_IQR_FACTOR, Pagination::new(1, 1));
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].property_id, PropertyId(8));
    }

    #[test]
    fn test_identical_prices_yield_no_outliers() {
        let records = records_with_prices(&[250.0, 250.0, 250.0]);
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        assert!(detect_outliers(&refs, DEFAULT_IQR_FACTOR, all()).is_empty());
    }
}
