//! Search parameter normalization and page shaping.
//!
//! Raw list parameters arrive with every field optional. [`SearchQuery`] is
//! the canonical plan handed to a store: page and page size resolved, the
//! sort target checked against the entity's whitelist, and the filter
//! reduced to `None` when it would match everything. [`paginate`] issues the
//! scan and the count for a plan and wraps the result in a [`Page`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RepoError;
use crate::ports::BaseRepository;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Offsets and limits are bound as signed 64-bit integers by SQL drivers.
const MAX_BOUND: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A per-entity whitelist of sortable columns.
pub trait SortField: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Ordering used when no valid sort is requested. Always descending.
    const DEFAULT: Self;

    /// Resolve a caller-supplied field name. Unknown names yield `None`.
    fn parse(name: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

/// Raw list parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub filter: Option<String>,
}

/// Normalized query plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery<F> {
    pub page: u64,
    pub per_page: u64,
    pub sort: F,
    pub sort_dir: SortDirection,
    pub filter: Option<String>,
}

impl<F: SortField> SearchQuery<F> {
    pub fn from_params(params: &SearchParams) -> Self {
        let page = params
            .page
            .and_then(|p| u64::try_from(p).ok())
            .map_or(DEFAULT_PAGE, |p| p.max(DEFAULT_PAGE));

        // Non-positive sizes are clamped to the default rather than rejected.
        let per_page = params
            .per_page
            .and_then(|p| u64::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PER_PAGE);

        let (sort, sort_dir) = match params.sort.as_deref().and_then(F::parse) {
            Some(field) => (field, params.sort_dir.unwrap_or(SortDirection::Desc)),
            None => (F::DEFAULT, SortDirection::Desc),
        };

        let filter = params.filter.clone().filter(|f| !f.is_empty());

        Self {
            page,
            per_page,
            sort,
            sort_dir,
            filter,
        }
    }

    /// Number of matching records before this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page).min(MAX_BOUND)
    }

    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_BOUND)
    }
}

impl<F: SortField> Default for SearchQuery<F> {
    fn default() -> Self {
        Self::from_params(&SearchParams::default())
    }
}

/// One page of a listing plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        Self {
            items,
            current_page,
            per_page,
            last_page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
            total: self.total,
        }
    }
}

/// Run a listing against a store: one scan for the page, one count for the
/// filtered total.
pub async fn paginate<T, F, R>(repo: &R, params: &SearchParams) -> Result<Page<T>, RepoError>
where
    F: SortField,
    R: BaseRepository<T, F> + ?Sized,
{
    let query = SearchQuery::<F>::from_params(params);
    tracing::debug!(
        page = query.page,
        per_page = query.per_page,
        sort = query.sort.as_str(),
        sort_dir = ?query.sort_dir,
        filtered = query.filter.is_some(),
        "Running paginated search"
    );

    let items = repo.scan(&query).await?;
    let total = repo.count(query.filter.as_deref()).await?;

    Ok(Page::new(items, query.page, query.per_page, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthorSortField;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn defaults_apply_when_everything_is_absent() {
        let query = SearchQuery::<AuthorSortField>::from_params(&params());
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 15);
        assert_eq!(query.sort, AuthorSortField::CreatedAt);
        assert_eq!(query.sort_dir, SortDirection::Desc);
        assert_eq!(query.filter, None);
        assert_eq!(query.skip(), 0);
        assert_eq!(query.limit(), 15);
    }

    #[test]
    fn huge_page_and_size_stay_within_signed_range() {
        let cases = [
            (i64::MAX, 15),
            (3, i64::MAX),
            (i64::MAX, i64::MAX),
        ];
        for (page, per_page) in cases {
            let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
                page: Some(page),
                per_page: Some(per_page),
                ..params()
            });
            assert!(i64::try_from(query.skip()).is_ok(), "page {page} per_page {per_page}");
            assert!(i64::try_from(query.limit()).is_ok(), "page {page} per_page {per_page}");
        }

        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            page: Some(i64::MAX),
            ..params()
        });
        assert_eq!(query.skip(), i64::MAX as u64);
        assert_eq!(query.limit(), 15);
    }

    #[test]
    fn page_below_one_is_raised_to_one() {
        for page in [0, -3] {
            let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
                page: Some(page),
                ..params()
            });
            assert_eq!(query.page, 1);
        }
    }

    #[test]
    fn non_positive_per_page_is_clamped_to_default() {
        for per_page in [0, -1, i64::MIN] {
            let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
                per_page: Some(per_page),
                ..params()
            });
            assert_eq!(query.per_page, DEFAULT_PER_PAGE);
        }
    }

    #[test]
    fn skip_is_derived_from_page_and_size() {
        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            page: Some(3),
            per_page: Some(4),
            ..params()
        });
        assert_eq!(query.skip(), 8);
        assert_eq!(query.limit(), 4);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default_ordering() {
        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            sort: Some("password".into()),
            sort_dir: Some(SortDirection::Asc),
            ..params()
        });
        assert_eq!(query.sort, AuthorSortField::CreatedAt);
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn sort_direction_defaults_to_desc_for_valid_field() {
        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            sort: Some("name".into()),
            ..params()
        });
        assert_eq!(query.sort, AuthorSortField::Name);
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn sort_direction_is_ignored_without_sort() {
        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            sort_dir: Some(SortDirection::Asc),
            ..params()
        });
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn empty_filter_means_no_filter() {
        let query = SearchQuery::<AuthorSortField>::from_params(&SearchParams {
            filter: Some(String::new()),
            ..params()
        });
        assert_eq!(query.filter, None);
    }

    #[test]
    fn last_page_is_at_least_one() {
        let page = Page::<()>::new(vec![], 1, 15, 0);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(Page::<()>::new(vec![], 1, 15, 16).last_page, 2);
        assert_eq!(Page::<()>::new(vec![], 1, 15, 15).last_page, 1);
        assert_eq!(Page::<()>::new(vec![], 1, 2, 3).last_page, 2);
    }
}
