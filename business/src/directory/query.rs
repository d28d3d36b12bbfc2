//! Query parameters of the user directory and how gestures change them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Column filters: field name to accepted values.
pub type Filters = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortOrder {
    /// Value of the `sortOrder` query parameter.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::Ascending => Some("asc"),
            Self::Descending => Some("desc"),
            Self::None => None,
        }
    }
}

/// Pagination, sort and filter state of the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    /// Only authoritative right after a successful fetch.
    pub total: u64,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    pub filters: Filters,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
            sort_field: None,
            sort_order: SortOrder::None,
            filters: Filters::new(),
        }
    }
}

/// Query string of `GET /api/Admin/users`.
///
/// Filters have no wire form: the endpoint takes none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortGesture {
    pub field: Option<String>,
    pub order: SortOrder,
}

/// A partial update of [`QueryState`] from one table interaction.
///
/// `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGesture {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortGesture>,
    pub filters: Option<Filters>,
}

impl TableGesture {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn sort(field: Option<&str>, order: SortOrder) -> Self {
        Self {
            sort: Some(SortGesture {
                field: field.map(str::to_owned),
                order,
            }),
            ..Self::default()
        }
    }

    pub fn filters(filters: Filters) -> Self {
        Self {
            filters: Some(filters),
            ..Self::default()
        }
    }
}

/// What a gesture did to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    Unchanged,
    Changed,
    /// Page size changed. Visible rows are void, and the page went back to 1
    /// unless the gesture named one.
    Resized,
}

impl QueryState {
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor {
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_field.clone(),
            sort_order: self.sort_order.as_param(),
        }
    }

    /// Applies `gesture`. A page of 0 is read as 1, a page size of 0 is ignored.
    /// A new page size moves back to page 1 unless `gesture` also sets the page.
    pub fn apply(&mut self, gesture: TableGesture) -> QueryChange {
        let before = self.clone();

        if let Some(page) = gesture.page {
            self.page = page.max(1);
        }
        if let Some(sort) = gesture.sort {
            self.sort_field = sort.field;
            self.sort_order = sort.order;
        }
        if let Some(filters) = gesture.filters {
            self.filters = filters.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        }

        let resized = match gesture.page_size {
            Some(size) if size > 0 && size != self.page_size => {
                self.page_size = size;
                if gesture.page.is_none() {
                    self.page = 1;
                }
                true
            }
            _ => false,
        };

        if resized {
            QueryChange::Resized
        } else if *self == before {
            QueryChange::Unchanged
        } else {
            QueryChange::Changed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_for_ascending_email_sort() {
        let state = QueryState {
            sort_field: Some("email".to_owned()),
            sort_order: SortOrder::Ascending,
            ..QueryState::default()
        };

        assert_eq!(
            state.descriptor(),
            RequestDescriptor {
                page: 1,
                page_size: 10,
                sort_by: Some("email".to_owned()),
                sort_order: Some("asc"),
            }
        );
        assert_eq!(
            serde_json::to_value(state.descriptor()).expect("descriptor should serialize"),
            serde_json::json!({"page": 1, "pageSize": 10, "sortBy": "email", "sortOrder": "asc"})
        );
    }

    #[test]
    fn test_descriptor_omits_absent_sort() {
        let value = serde_json::to_value(QueryState::default().descriptor())
            .expect("descriptor should serialize");
        assert_eq!(value, serde_json::json!({"page": 1, "pageSize": 10}));
    }

    #[test]
    fn test_filters_are_not_serialized() {
        let mut state = QueryState::default();
        let mut filters = Filters::new();
        filters.insert(
            "isBlocked".to_owned(),
            BTreeSet::from(["true".to_owned()]),
        );
        state.apply(TableGesture::filters(filters));

        let value = serde_json::to_value(state.descriptor()).expect("descriptor should serialize");
        assert_eq!(value, serde_json::json!({"page": 1, "pageSize": 10}));
    }

    #[test]
    fn test_same_value_is_unchanged() {
        let mut state = QueryState::default();
        assert_eq!(state.apply(TableGesture::page(1)), QueryChange::Unchanged);
        assert_eq!(state.apply(TableGesture::page_size(10)), QueryChange::Unchanged);
        assert_eq!(state.apply(TableGesture::default()), QueryChange::Unchanged);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = QueryState::default();
        state.apply(TableGesture::page(4));

        assert_eq!(state.apply(TableGesture::page_size(50)), QueryChange::Resized);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 50);
    }

    #[test]
    fn test_explicit_page_survives_resize() {
        let mut state = QueryState::default();
        let gesture = TableGesture {
            page: Some(3),
            page_size: Some(25),
            ..TableGesture::default()
        };

        assert_eq!(state.apply(gesture), QueryChange::Resized);
        assert_eq!(state.page, 3);
        assert_eq!(state.page_size, 25);
    }

    #[test]
    fn test_invalid_values_are_clamped_or_ignored() {
        let mut state = QueryState::default();
        state.apply(TableGesture::page(3));

        assert_eq!(state.apply(TableGesture::page(0)), QueryChange::Changed);
        assert_eq!(state.page, 1);
        assert_eq!(state.apply(TableGesture::page_size(0)), QueryChange::Unchanged);
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let mut state = QueryState::default();

        assert_eq!(
            state.apply(TableGesture::sort(Some("fullName"), SortOrder::Ascending)),
            QueryChange::Changed
        );
        assert_eq!(
            state.apply(TableGesture::sort(Some("fullName"), SortOrder::Descending)),
            QueryChange::Changed
        );
        assert_eq!(state.descriptor().sort_order, Some("desc"));
        assert_eq!(
            state.apply(TableGesture::sort(None, SortOrder::None)),
            QueryChange::Changed
        );
        assert_eq!(state.descriptor().sort_by, None);
    }
}
