use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::{
    FilterCriteria, HistoricalInsight, Pagination, PropertyRecord, StatisticsSummary,
};
use crate::db::repository::{PropertyRepository, RepositoryResult};
use crate::services::{history, outliers, statistics};

/// Statistics, outliers and historical insights over the property store.
///
/// Stateless apart from the borrowed repository; every call fetches the
/// current data and computes fresh. Only the fetch can fail.
pub struct PropertyAnalytics<'a> {
    repo: &'a dyn PropertyRepository,
}

impl<'a> PropertyAnalytics<'a> {
    pub fn new(repo: &'a dyn PropertyRepository) -> Self {
        Self { repo }
    }

    async fn filtered(&self, criteria: &FilterCriteria) -> RepositoryResult<Vec<PropertyRecord>> {
        let records = self.repo.query_properties(criteria).await?;
        debug!(matched = records.len(), ?criteria, "fetched filtered properties");
        Ok(records)
    }

    /// Average, median and price-per-square-foot over the filtered set.
    pub async fn compute_statistics(
        &self,
        criteria: &FilterCriteria,
    ) -> RepositoryResult<StatisticsSummary> {
        let records = self.filtered(criteria).await?;
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        Ok(statistics::compute_statistics(&refs))
    }

    /// IQR outliers of the filtered set, paginated.
    pub async fn detect_outliers(
        &self,
        criteria: &FilterCriteria,
        factor: f64,
        page: Pagination,
    ) -> RepositoryResult<Vec<PropertyRecord>> {
        let records = self.filtered(criteria).await?;
        let refs: Vec<&PropertyRecord> = records.iter().collect();
        let found = outliers::detect_outliers(&refs, factor, page);
        debug!(factor, returned = found.len(), "outlier detection finished");
        Ok(found)
    }

    /// Month buckets of listings inside the optional inclusive window.
    pub async fn historical_insights(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<HistoricalInsight>> {
        let records = self.repo.properties_listed_between(start, end).await?;
        debug!(listed = records.len(), "computing historical insights");
        Ok(history::historical_insights(&records, start, end))
    }
}
