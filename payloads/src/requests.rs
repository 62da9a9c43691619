use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{SummaryLanguage, SummaryStyle};

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;
/// Upper bound the backend enforces on `itemsperpage`.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Query parameters for the paginated list endpoints.
///
/// `filters` holds any extra query pairs (e.g. `sort`, `order`) and is sent
/// verbatim alongside the standard fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: u32,
    pub items_per_page: u32,
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, items_per_page: u32) -> Self {
        Self {
            page,
            items_per_page,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Render as query pairs using the backend's parameter names.
    ///
    /// Page is clamped to at least 1 and page size to `1..=100`; an empty
    /// search is omitted entirely.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            (
                "itemsperpage".to_string(),
                self.items_per_page.clamp(1, MAX_ITEMS_PER_PAGE).to_string(),
            ),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            query.push(("search".to_string(), search.to_string()));
        }
        query.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        query
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSummary {
    pub style: SummaryStyle,
    pub language: SummaryLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_uses_backend_names_and_skips_empty_search() {
        let params = PaginationParams::new(2, 25);
        assert_eq!(
            params.to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("itemsperpage".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn query_includes_search_and_filters() {
        let params = PaginationParams::new(1, 50)
            .with_search("  report ")
            .with_filter("order", "asc");
        let query = params.to_query();
        assert!(query.contains(&("search".to_string(), "report".to_string())));
        assert!(query.contains(&("order".to_string(), "asc".to_string())));
    }

    #[test]
    fn query_clamps_out_of_range_values() {
        let params = PaginationParams::new(0, 500);
        let query = params.to_query();
        assert_eq!(query[0].1, "1");
        assert_eq!(query[1].1, "100");
    }
}
