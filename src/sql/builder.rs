//! Builds the parameterized SELECT and INSERT statements for points and items.
//! Identifiers are fixed constants; every value goes through a placeholder.

use crate::models::NewPoint;
use crate::sql::params::BindValue;

pub const POINTS_TABLE: &str = "points";
pub const ITEMS_TABLE: &str = "itens";
pub const POINT_ITEMS_TABLE: &str = "point_itens";

pub const POINT_COLUMNS: &[&str] = &[
    "id", "image", "name", "email", "whatsapp", "latitude", "longitude", "city", "uf",
];
pub const ITEM_COLUMNS: &[&str] = &["id", "title", "image"];

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `alias."col", alias."col2"` (or unqualified when alias is None).
fn column_list(alias: Option<&str>, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{}", a, quoted(c)),
            None => quoted(c),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<BindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

/// Filters for the points search. `None` leaves that column unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointFilter {
    pub city: Option<String>,
    pub uf: Option<String>,
    /// Accepted item ids; a point matches when it accepts at least one of them.
    pub item_ids: Option<Vec<i32>>,
}

impl PointFilter {
    /// True when an item filter is present but holds no usable id, so nothing can match.
    pub fn matches_nothing(&self) -> bool {
        self.item_ids.as_ref().is_some_and(|ids| ids.is_empty())
    }
}

/// SELECT all items ordered by id.
pub fn select_items() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(None, ITEM_COLUMNS),
        quoted(ITEMS_TABLE),
        quoted("id")
    );
    q
}

/// SELECT items accepted by one point, through the join table.
pub fn select_items_for_point(point_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(point_id);
    q.sql = format!(
        "SELECT {} FROM {} i JOIN {} pi ON i.{} = pi.{} WHERE pi.{} = ${} ORDER BY i.{}",
        column_list(Some("i"), ITEM_COLUMNS),
        quoted(ITEMS_TABLE),
        quoted(POINT_ITEMS_TABLE),
        quoted("id"),
        quoted("item_id"),
        quoted("point_id"),
        n,
        quoted("id")
    );
    q
}

/// SELECT one point by primary key.
pub fn select_point_by_id(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(None, POINT_COLUMNS),
        quoted(POINTS_TABLE),
        quoted("id"),
        n
    );
    q
}

/// SELECT DISTINCT points, joined to point_itens only when filtering by item.
/// Params are bound in order: item ids, city, uf (each only when present).
pub fn select_points(filter: &PointFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut join = String::new();
    let mut where_parts = Vec::new();

    if let Some(ids) = &filter.item_ids {
        join = format!(
            " JOIN {} pi ON p.{} = pi.{}",
            quoted(POINT_ITEMS_TABLE),
            quoted("id"),
            quoted("point_id")
        );
        let n = q.push_param(ids.clone());
        where_parts.push(format!("pi.{} = ANY(${})", quoted("item_id"), n));
    }
    if let Some(city) = &filter.city {
        let n = q.push_param(city.as_str());
        where_parts.push(format!("p.{} = ${}", quoted("city"), n));
    }
    if let Some(uf) = &filter.uf {
        let n = q.push_param(uf.as_str());
        where_parts.push(format!("p.{} = ${}", quoted("uf"), n));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };

    q.sql = format!(
        "SELECT DISTINCT {} FROM {} p{}{} ORDER BY p.{}",
        column_list(Some("p"), POINT_COLUMNS),
        quoted(POINTS_TABLE),
        join,
        where_clause,
        quoted("id")
    );
    q
}

/// INSERT one point, RETURNING the stored row.
pub fn insert_point(point: &NewPoint) -> QueryBuf {
    let mut q = QueryBuf::new();
    let insert_cols = &POINT_COLUMNS[1..];
    let placeholders = [
        q.push_param(point.image.as_str()),
        q.push_param(point.name.as_str()),
        q.push_param(point.email.as_str()),
        q.push_param(point.whatsapp.as_str()),
        q.push_param(point.latitude),
        q.push_param(point.longitude),
        q.push_param(point.city.as_str()),
        q.push_param(point.uf.as_str()),
    ]
    .iter()
    .map(|n| format!("${}", n))
    .collect::<Vec<_>>();

    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(POINTS_TABLE),
        column_list(None, insert_cols),
        placeholders.join(", "),
        column_list(None, POINT_COLUMNS)
    );
    q
}

/// INSERT one join row per item id in a single multi-row statement, RETURNING the rows.
/// The point id is bound once and reused.
pub fn insert_point_items(point_id: i32, item_ids: &[i32]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let point_param = q.push_param(point_id);
    let rows: Vec<String> = item_ids
        .iter()
        .map(|id| format!("(${}, ${})", point_param, q.push_param(*id)))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}, {}) VALUES {} RETURNING {}, {}",
        quoted(POINT_ITEMS_TABLE),
        quoted("point_id"),
        quoted("item_id"),
        rows.join(", "),
        quoted("point_id"),
        quoted("item_id")
    );
    q
}
