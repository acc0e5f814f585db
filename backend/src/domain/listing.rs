//! Query specifications passed to the repository ports.
//!
//! Handlers translate raw request parameters into these typed
//! specifications so adapters never see free-form query fragments. Unknown
//! sort fields parse to `None`, which repositories treat as primary-key
//! order.

use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, SortOrder};

use super::cache_keys::ListKeyParams;
use super::error::FieldViolation;
use super::project::{ProjectId, UserId};

/// Raw list parameters as the caller sent them.
///
/// Shared by both list requests: validation, defaulting, and the cache-key
/// projection all live here so the two handlers cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to [`DEFAULT_PAGE_SIZE`].
    pub page_size: Option<u32>,
    /// Substring search text.
    pub search: Option<String>,
    /// Requested sort column.
    pub sort_by: Option<String>,
    /// Requested sort direction.
    pub sort_order: Option<String>,
}

impl ListParams {
    /// Collect violations for the page window. Search and sort are never
    /// violations: unknown values fall back to defaults.
    #[must_use]
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.page == Some(0) {
            violations.push(FieldViolation::new(
                "pageNumber",
                "Page number must be at least 1.",
            ));
        }
        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                violations.push(FieldViolation::new(
                    "pageSize",
                    format!("Page size must be between 1 and {MAX_PAGE_SIZE}."),
                ));
            }
        }
        violations
    }

    /// Page number after defaulting.
    #[must_use]
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Page size after defaulting.
    #[must_use]
    pub fn effective_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validated page window. Callers run [`violations`] first, so failure
    /// here means a bug rather than bad input.
    ///
    /// [`violations`]: ListParams::violations
    pub fn page_request(&self) -> Result<PageRequest, pagination::PageRequestError> {
        PageRequest::new(self.effective_page(), self.effective_size())
    }

    /// Search text with surrounding whitespace stripped, `None` when blank.
    #[must_use]
    pub fn normalized_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Sort direction after parsing, ascending for anything unrecognised.
    #[must_use]
    pub fn effective_sort_order(&self) -> SortOrder {
        self.sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default()
    }

    /// Projection of these parameters into a cache-key suffix.
    #[must_use]
    pub fn key_params(&self) -> ListKeyParams<'_> {
        ListKeyParams {
            page: self.effective_page(),
            size: self.effective_size(),
            search: self.search.as_deref(),
            sort_by: self.sort_by.as_deref(),
            sort_order: self.sort_order.as_deref(),
        }
    }
}

/// Visibility scope of a project listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Only projects owned by the given user.
    Owner(UserId),
    /// Every project; reserved for admins.
    All,
}

/// Sortable project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSortField {
    /// Sort by project name.
    Name,
    /// Sort by description text.
    Description,
}

impl ProjectSortField {
    /// Parse a caller-supplied field name, `None` for anything unknown.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Sortable task columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    /// Sort by task title.
    Title,
    /// Sort by workflow status.
    Status,
}

impl TaskSortField {
    /// Parse a caller-supplied field name, `None` for anything unknown.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Specification for a project listing: scope, optional case-insensitive
/// substring search over name and description, sort, and page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Which projects are visible.
    pub scope: Scope,
    /// Substring filter, already trimmed; `None` means no filter.
    pub search: Option<String>,
    /// Sort column; `None` falls back to primary-key order.
    pub sort_by: Option<ProjectSortField>,
    /// Sort direction, ignored without a sort column.
    pub sort_order: SortOrder,
    /// Page window.
    pub page: PageRequest,
}

/// Specification for a task listing within one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Parent project whose tasks are listed.
    pub project_id: ProjectId,
    /// Substring filter over title and description.
    pub search: Option<String>,
    /// Sort column; `None` falls back to primary-key order.
    pub sort_by: Option<TaskSortField>,
    /// Sort direction, ignored without a sort column.
    pub sort_order: SortOrder,
    /// Page window.
    pub page: PageRequest,
}
