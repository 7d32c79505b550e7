/// Pagination and sorting for item listings
///
/// List endpoints take `limit`, `page`, `orderBy` and `order` query
/// parameters. Values are resolved here into a [`ListParams`] whose sort
/// column comes from a fixed allow-list, so nothing a client sends is ever
/// spliced into SQL.
///
/// ```
/// use fastvinted_shared::pagination::{ItemQuery, SortField, SortOrder};
///
/// let params = ItemQuery {
///     limit: Some(12),
///     page: Some(2),
///     order_by: Some("price".to_string()),
///     order: Some("ASC".to_string()),
/// }
/// .resolve();
///
/// assert_eq!(params.offset(), 12);
/// assert_eq!(params.sort, SortField::Price);
/// assert_eq!(params.order, SortOrder::Asc);
/// ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 12;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_PAGE: i64 = 1;

/// Raw query string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl ItemQuery {
    /// Applies defaults, clamps bounds and maps sort names onto the allow-list
    pub fn resolve(&self) -> ListParams {
        ListParams {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            page: self.page.unwrap_or(DEFAULT_PAGE).max(1),
            sort: self
                .order_by
                .as_deref()
                .map(SortField::from_param)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

/// Sortable item columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Price,
    Name,
    Size,
    Condition,
    SellerName,
}

impl SortField {
    /// Maps a wire name (`createdAt`, `price`, ...) onto a column
    ///
    /// Unknown names fall back to `createdAt` rather than erroring.
    pub fn from_param(value: &str) -> Self {
        match value {
            "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            "price" => SortField::Price,
            "name" => SortField::Name,
            "size" => SortField::Size,
            "condition" => SortField::Condition,
            "sellerName" | "seller_name" => SortField::SellerName,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Price => "price",
            SortField::Name => "name",
            SortField::Size => "size",
            SortField::Condition => "condition",
            SortField::SellerName => "seller_name",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive `asc` / `desc`; anything else is `desc`
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Resolved listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub limit: i64,
    pub page: i64,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        ItemQuery::default().resolve()
    }
}

impl ListParams {
    /// Rows skipped before this page: `(page - 1) * limit`
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ORDER BY` body for a query where the items table is aliased `alias`
    ///
    /// `id` breaks ties so consecutive pages never overlap.
    pub fn order_by_clause(&self, alias: &str) -> String {
        let dir = self.order.as_sql();
        format!(
            "{alias}.{column} {dir}, {alias}.id {dir}",
            column = self.sort.column()
        )
    }
}

/// Number of pages needed to show `total` rows, never less than one
pub fn total_pages(total: i64, limit: i64) -> i64 {
    let limit = limit.max(1);
    ((total.max(0) + limit - 1) / limit).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ItemQuery::default().resolve();
        assert_eq!(params.limit, 12);
        assert_eq!(params.page, 1);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.sort, SortField::CreatedAt);
        assert_eq!(params.order, SortOrder::Desc);
    }

    #[test]
    fn test_second_page_skips_first_twelve() {
        let params = ItemQuery {
            limit: Some(12),
            page: Some(2),
            ..Default::default()
        }
        .resolve();

        assert_eq!(params.offset(), 12);
        assert_eq!(params.limit, 12);
    }

    #[test]
    fn test_bounds_are_clamped() {
        let params = ItemQuery {
            limit: Some(10_000),
            page: Some(-3),
            ..Default::default()
        }
        .resolve();
        assert_eq!(params.limit, MAX_LIMIT);
        assert_eq!(params.page, 1);

        let params = ItemQuery {
            limit: Some(0),
            ..Default::default()
        }
        .resolve();
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        assert_eq!(SortField::from_param("password_hash"), SortField::CreatedAt);
        assert_eq!(
            SortField::from_param("price; DROP TABLE items"),
            SortField::CreatedAt
        );
        assert_eq!(SortField::from_param("sellerName"), SortField::SellerName);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param("sideways"), SortOrder::Desc);
    }

    #[test]
    fn test_order_by_clause() {
        let params = ItemQuery {
            order_by: Some("price".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        }
        .resolve();

        assert_eq!(params.order_by_clause("i"), "i.price ASC, i.id ASC");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(25, 0), 25);
    }
}
