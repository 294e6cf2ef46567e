//! Catalog query construction

use crate::{SEARCH_LIMIT, TOP_RATED_LIMIT};

/// Fields the library and its previews actually display
const FIELDS: &str = "name, first_release_date, cover.url, total_rating, rating, \
platforms.name, summary, involved_companies.company.name, \
involved_companies.developer, involved_companies.publisher";

/// What the caller wants from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Free-text search (already sanitized)
    Search(String),
    /// Highly rated, popular titles for the landing view
    TopRated,
    /// A single record by catalog id
    ById(u64),
}

/// A ready-to-send catalog request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    /// Query-language body
    pub body: String,
    /// Maximum number of records expected back
    pub limit: usize,
}

/// Strip characters that would break the query syntax
pub fn sanitize_query(query: &str) -> String {
    query.replace('"', "").trim().to_string()
}

impl CatalogQuery {
    /// Build a search query, or `None` when the input is too short to be useful
    pub fn search(input: &str, min_len: usize) -> Option<Self> {
        let sanitized = sanitize_query(input);
        if sanitized.chars().count() < min_len {
            return None;
        }
        Some(CatalogQuery::Search(sanitized))
    }

    pub fn limit(&self) -> usize {
        match self {
            CatalogQuery::Search(_) => SEARCH_LIMIT,
            CatalogQuery::TopRated => TOP_RATED_LIMIT,
            CatalogQuery::ById(_) => 1,
        }
    }

    /// Render the query-language body
    pub fn to_request(&self) -> CatalogRequest {
        let limit = self.limit();
        let body = match self {
            CatalogQuery::Search(text) => format!(
                "fields {}; search \"{}\"; where cover != null & version_parent = null; limit {};",
                FIELDS,
                text.replace('"', ""),
                limit
            ),
            CatalogQuery::TopRated => format!(
                "fields {}; where category = 0 & cover != null & rating > 80 & version_parent = null; \
                 sort popularity desc; limit {};",
                FIELDS, limit
            ),
            CatalogQuery::ById(id) => {
                format!("fields {}; where id = {}; limit {};", FIELDS, id, limit)
            }
        };

        CatalogRequest { body, limit }
    }
}
