//! Offset pagination: page windows and page-count arithmetic.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::builder::Builder;
use crate::application::ports::QueryTarget;
use crate::domain::value_objects::{OrderBy, SortOrder};

/// Ordering used when the caller supplies no sort fields
pub const DEFAULT_SORT_KEY: &str = "id";

/// Page summary returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPaging {
    pub current_page: i64,
    pub total_page: i64,
    pub per_page: i64,
}

/// Offset pagination over a result set of known size.
///
/// `limit` is the page size and must be positive; `current_page` is
/// 1-based. A non-positive `limit` yields zero pages and applies no row
/// window rather than dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPagingBuilder {
    sort_by: Vec<String>,
    sort_order: SortOrder,
    limit: i64,
    current_page: i64,
    total_records: i64,
    default_sort_key: String,
}

impl OffsetPagingBuilder {
    pub fn new<I, S>(
        limit: i64,
        current_page: i64,
        total_records: i64,
        sort_order: &str,
        sort_by: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sort_by: sort_by
                .into_iter()
                .map(Into::into)
                .filter(|field: &String| !field.trim().is_empty())
                .collect(),
            sort_order: SortOrder::from_str_lossy(sort_order),
            limit,
            current_page,
            total_records,
            default_sort_key: DEFAULT_SORT_KEY.to_string(),
        }
    }

    /// Override the fallback ordering key (`id` by default)
    pub fn with_default_sort_key(mut self, key: impl Into<String>) -> Self {
        self.default_sort_key = key.into();
        self
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// ORDER BY terms; falls back to the default key ascending so page
    /// boundaries stay deterministic.
    pub fn orders(&self) -> Vec<OrderBy> {
        if self.sort_by.is_empty() {
            return vec![OrderBy::new(self.default_sort_key.clone(), SortOrder::Asc)];
        }
        self.sort_by
            .iter()
            .map(|field| OrderBy::new(field.clone(), self.sort_order))
            .collect()
    }

    /// `(current_page - 1) * limit`, with pages below 1 treated as page 1
    pub fn offset(&self) -> u64 {
        if self.limit <= 0 {
            return 0;
        }
        let skipped_pages = self.current_page.max(1) - 1;
        u64::try_from(skipped_pages.saturating_mul(self.limit)).unwrap_or(0)
    }

    /// `ceil(total_records / limit)`
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            warn!(limit = self.limit, "non-positive page size, reporting zero pages");
            return 0;
        }
        let total = self.total_records.max(0);
        let mut pages = total / self.limit;
        if total % self.limit != 0 {
            pages += 1;
        }
        pages
    }

    /// Page summary; `current_page` is the page the offset was computed for.
    pub fn paging(&self) -> OffsetPaging {
        OffsetPaging {
            current_page: self.current_page.max(1),
            total_page: self.total_pages(),
            per_page: self.limit,
        }
    }
}

impl Builder for OffsetPagingBuilder {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        let target = target.order(&self.orders());
        match u64::try_from(self.limit) {
            Ok(limit) if limit > 0 => target.limit(limit).offset(self.offset()),
            _ => {
                warn!(limit = self.limit, "non-positive page size, skipping row window");
                target
            }
        }
    }
}
