//! Create the points/itens/point_itens tables and seed the item catalog.
//! Order follows foreign-key dependencies: parents first, then the join table.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "points" (
        "id" SERIAL PRIMARY KEY,
        "image" TEXT NOT NULL,
        "name" TEXT NOT NULL,
        "email" TEXT NOT NULL,
        "whatsapp" TEXT NOT NULL,
        "latitude" DOUBLE PRECISION NOT NULL,
        "longitude" DOUBLE PRECISION NOT NULL,
        "city" TEXT NOT NULL,
        "uf" VARCHAR(2) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "itens" (
        "id" SERIAL PRIMARY KEY,
        "image" TEXT NOT NULL,
        "title" TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "point_itens" (
        "point_id" INTEGER NOT NULL REFERENCES "points" ("id"),
        "item_id" INTEGER NOT NULL REFERENCES "itens" ("id"),
        PRIMARY KEY ("point_id", "item_id")
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "points_uf_city_idx" ON "points" ("uf", "city")"#,
    r#"CREATE INDEX IF NOT EXISTS "point_itens_item_id_idx" ON "point_itens" ("item_id")"#,
];

/// Catalog of collectible materials: (id, title, image filename under the upload dir).
pub const ITEM_CATALOG: &[(i32, &str, &str)] = &[
    (1, "Lâmpadas", "lampadas.svg"),
    (2, "Pilhas e Baterias", "baterias.svg"),
    (3, "Papéis e Papelão", "papeis-papelao.svg"),
    (4, "Resíduos Eletrônicos", "eletronicos.svg"),
    (5, "Resíduos Orgânicos", "organicos.svg"),
    (6, "Óleo de Cozinha", "oleo.svg"),
];

/// Icons for `ITEM_CATALOG`, written into the upload dir at startup so each `image_url` resolves.
pub const CATALOG_IMAGES: &[(&str, &[u8])] = &[
    ("lampadas.svg", include_bytes!("../assets/itens/lampadas.svg")),
    ("baterias.svg", include_bytes!("../assets/itens/baterias.svg")),
    ("papeis-papelao.svg", include_bytes!("../assets/itens/papeis-papelao.svg")),
    ("eletronicos.svg", include_bytes!("../assets/itens/eletronicos.svg")),
    ("organicos.svg", include_bytes!("../assets/itens/organicos.svg")),
    ("oleo.svg", include_bytes!("../assets/itens/oleo.svg")),
];

/// Idempotent: every statement is IF NOT EXISTS.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in DDL {
        tracing::debug!(sql = %sql.trim(), "migration");
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

/// Insert catalog items missing by id and move the id sequence past them. Returns rows inserted.
pub async fn seed_itens(pool: &PgPool) -> Result<u64, AppError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for (id, title, image) in ITEM_CATALOG {
        let result = sqlx::query(
            r#"INSERT INTO "itens" ("id", "title", "image") VALUES ($1, $2, $3) ON CONFLICT ("id") DO NOTHING"#,
        )
        .bind(*id)
        .bind(*title)
        .bind(*image)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    sqlx::query(
        r#"SELECT setval(pg_get_serial_sequence('itens', 'id'), (SELECT COALESCE(MAX("id"), 1) FROM "itens"))"#,
    )
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_item_has_an_icon() {
        for (_, title, image) in ITEM_CATALOG {
            let icon = CATALOG_IMAGES.iter().find(|(name, _)| name == image);
            let (_, bytes) = icon.unwrap_or_else(|| panic!("no icon for {}", title));
            assert!(bytes.starts_with(b"<svg"));
        }
    }
}
