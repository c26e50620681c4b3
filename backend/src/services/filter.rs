//! Filter predicate composition.
//!
//! A [`FilterCriteria`] folds into one predicate over [`PropertyRecord`].
//! The same predicate backs statistics, outlier detection, plain listing
//! and the in-memory repository query.

use crate::api::{FilterCriteria, PropertyRecord};

impl FilterCriteria {
    /// True when every present constraint matches. Price bounds are
    /// inclusive; bedrooms, bathrooms and city are exact matches. A null
    /// field never satisfies a constraint on that field.
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if let Some(min) = self.min_price {
            if !record.price.is_some_and(|p| p >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !record.price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if record.bedrooms != Some(bedrooms) {
                return false;
            }
        }
        if let Some(bathrooms) = self.bathrooms {
            if record.bathrooms != Some(bathrooms) {
                return false;
            }
        }
        if let Some(ref city) = self.city {
            if record.city != *city {
                return false;
            }
        }
        true
    }
}

/// Select the records matching `criteria`, preserving input order.
pub fn apply_filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a PropertyRecord>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}
