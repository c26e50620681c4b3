#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use propstats::api::{NewProperty, PropertyId, PropertyRecord};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the given environment variables set (`Some`) or removed (`None`).
///
/// Holds a global lock for the duration so parallel tests do not observe each
/// other's variables, and restores the previous values on drop.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    previous: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.previous.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Midnight UTC on the given day.
pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// A create payload in Springfield with the given price and size.
pub fn listing(price: Option<f64>, square_feet: Option<u32>) -> NewProperty {
    NewProperty {
        address: "742 Evergreen Terrace".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62704".to_string(),
        price,
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        square_feet,
        date_listed: Some(day(2021, 1, 1)),
        ..Default::default()
    }
}

/// A stored record with an explicit id, city and price.
pub fn record(id: i64, city: &str, price: Option<f64>) -> PropertyRecord {
    PropertyRecord {
        property_id: PropertyId::new(id),
        address: format!("{} Elm St", id),
        city: city.to_string(),
        state: "IL".to_string(),
        zip_code: "62704".to_string(),
        price,
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        square_feet: Some(1000),
        date_listed: day(2021, 1, 1),
    }
}

/// Records with ids `1..` in Springfield, one per price.
pub fn priced(prices: &[f64]) -> Vec<PropertyRecord> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| record(i as i64 + 1, "Springfield", Some(*p)))
        .collect()
}

/// The twelve prices with a single high outlier at 100.
pub const REFERENCE_PRICES: [f64; 12] = [
    10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 14.0, 13.0, 15.0, 10.0, 10.0, 100.0,
];
