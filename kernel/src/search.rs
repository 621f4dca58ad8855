use std::fmt::Display;

use serde::{Deserialize, Serialize};
use vodca::References;

use crate::error::FieldError;
use crate::{validation_report, KernelError};

/// Longest accepted free-text keyword, in characters.
pub const MAX_KEYWORD_LENGTH: usize = 8;
pub const MIN_PAGE_SIZE: i64 = 1;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied query description. Checked against an entity's
/// [`SearchPolicy`] before it reaches any store.
#[derive(Debug, Clone, PartialEq, Eq, References, Serialize, Deserialize)]
pub struct SearchSpec {
    keyword: String,
    sort: String,
    order: SortOrder,
    page: i64,
    size: i64,
}

impl SearchSpec {
    pub fn new(
        keyword: impl Into<String>,
        sort: impl Into<String>,
        order: SortOrder,
        page: i64,
        size: i64,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            sort: sort.into(),
            order,
            page,
            size,
        }
    }
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            sort: String::from("id"),
            order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A validated query. `sort_column` is always a member of the entity's
/// allow-list, so stores may interpolate it into statements verbatim.
#[derive(Debug, Clone, PartialEq, Eq, References)]
pub struct SearchQuery {
    keyword: Option<String>,
    sort_column: &'static str,
    order: SortOrder,
    offset: i64,
    limit: i64,
}

/// Per-entity translation of a [`SearchSpec`] into a [`SearchQuery`].
///
/// The keyword is matched case-insensitively as a substring of every
/// searchable column, OR-combined. Pure; no side effects.
pub trait SearchPolicy: 'static + Sync + Send {
    const SORTABLE_COLUMNS: &'static [&'static str];
    const SEARCHABLE_COLUMNS: &'static [&'static str];
    const MAX_PAGE_SIZE: i64 = 100;

    fn build_query(spec: &SearchSpec) -> error_stack::Result<SearchQuery, KernelError> {
        let mut errors = Vec::new();

        if spec.keyword().chars().count() > MAX_KEYWORD_LENGTH {
            errors.push(FieldError::new(
                "search",
                format!("keyword must not be longer than {MAX_KEYWORD_LENGTH} characters"),
            ));
        }
        let sort_column = Self::SORTABLE_COLUMNS
            .iter()
            .copied()
            .find(|column| *column == spec.sort().as_str());
        if sort_column.is_none() {
            errors.push(FieldError::new(
                "sort",
                format!("unsupported sort column = {}", spec.sort()),
            ));
        }
        if *spec.page() < 1 {
            errors.push(FieldError::new(
                "page",
                format!("page = {} must be a positive integer", spec.page()),
            ));
        }
        if *spec.size() < MIN_PAGE_SIZE || *spec.size() > Self::MAX_PAGE_SIZE {
            errors.push(FieldError::new(
                "size",
                format!(
                    "size = {} must be between {} and {}",
                    spec.size(),
                    MIN_PAGE_SIZE,
                    Self::MAX_PAGE_SIZE
                ),
            ));
        }

        match (sort_column, errors.is_empty()) {
            (Some(sort_column), true) => {
                let keyword = if spec.keyword().is_empty() {
                    None
                } else {
                    Some(spec.keyword().to_lowercase())
                };
                Ok(SearchQuery {
                    keyword,
                    sort_column,
                    order: *spec.order(),
                    offset: (spec.page() - 1) * spec.size(),
                    limit: *spec.size(),
                })
            }
            _ => Err(validation_report(errors)),
        }
    }
}

/// A bounded slice of an ordered result set plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    page: i64,
    size: i64,
    total_pages: i64,
    total_elements: i64,
    items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(page: i64, requested_size: i64, total_elements: i64, items: Vec<T>) -> Self {
        let requested_size = requested_size.max(1);
        let total_pages = (total_elements + requested_size - 1) / requested_size;
        Self {
            page,
            size: items.len() as i64,
            total_pages,
            total_elements,
            items,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn total_elements(&self) -> i64 {
        self.total_elements
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
