//! Point and item queries against PostgreSQL.

use crate::error::AppError;
use crate::models::{Item, NewPoint, Point, PointItem};
use crate::sql::{
    bind_all, insert_point, insert_point_items, select_items, select_items_for_point, select_point_by_id,
    select_points, PointFilter, QueryBuf,
};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

pub struct ItemService;

impl ItemService {
    /// Whole catalog, ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, AppError> {
        fetch_all(pool, &select_items()).await
    }
}

pub struct PointService;

impl PointService {
    /// Distinct points matching every present filter, ordered by id.
    pub async fn list(pool: &PgPool, filter: &PointFilter) -> Result<Vec<Point>, AppError> {
        if filter.matches_nothing() {
            tracing::debug!(?filter, "item filter has no valid id");
            return Ok(Vec::new());
        }
        fetch_all(pool, &select_points(filter)).await
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Point>, AppError> {
        let q = select_point_by_id(id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, Point>(&q.sql), &q.params)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Items accepted by a point.
    pub async fn items_of(pool: &PgPool, point_id: i32) -> Result<Vec<Item>, AppError> {
        fetch_all(pool, &select_items_for_point(point_id)).await
    }

    /// Insert the point and one join row per item id in one transaction. Returns the stored point and links.
    /// An unknown item id rolls everything back and is reported as a bad request.
    pub async fn create(pool: &PgPool, new: &NewPoint) -> Result<(Point, Vec<PointItem>), AppError> {
        let mut tx = pool.begin().await?;

        let q = insert_point(new);
        let point: Point = fetch_one_tx(&mut tx, &q).await?;

        let q = insert_point_items(point.id, &new.itens);
        let links: Vec<PointItem> = fetch_all_tx(&mut tx, &q).await.map_err(unknown_item)?;

        tx.commit().await?;
        tracing::info!(point_id = point.id, itens = links.len(), "point created");
        Ok((point, links))
    }
}

fn unknown_item(err: AppError) -> AppError {
    match err {
        AppError::Db(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            AppError::BadRequest("one or more itens do not exist".into())
        }
        other => other,
    }
}

async fn fetch_all<O>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<O>, AppError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let rows = bind_all(sqlx::query_as::<_, O>(&q.sql), &q.params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_one_tx<O>(tx: &mut PgConnection, q: &QueryBuf) -> Result<O, AppError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let row = bind_all(sqlx::query_as::<_, O>(&q.sql), &q.params)
        .fetch_one(&mut *tx)
        .await?;
    Ok(row)
}

async fn fetch_all_tx<O>(tx: &mut PgConnection, q: &QueryBuf) -> Result<Vec<O>, AppError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let rows = bind_all(sqlx::query_as::<_, O>(&q.sql), &q.params)
        .fetch_all(&mut *tx)
        .await?;
    Ok(rows)
}
