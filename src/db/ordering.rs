//! Auto-ordering for sibling records
//!
//! Modules order themselves within a course and contents within a module.
//! When a record is created without an explicit order, the next value in the
//! parent's sequence is computed here: the maximum existing `order` among
//! siblings sharing the same scope columns, plus one, or 0 for the first
//! sibling.
//!
//! The computation is a single read with no locking. Two concurrent creates
//! under the same parent can both observe the same maximum and end up with
//! the same order; `order` is deliberately not unique, so both writes
//! succeed. An explicitly provided order skips this path entirely and is
//! stored as-is without collision checks.

use anyhow::{Context, Result};
use sqlx::{MySqlPool, Row, SqlitePool};

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;

/// Compute the next order value for a new row in `table`, scoped to the
/// parent reference(s) in `scope` as `(column, value)` pairs.
///
/// `table` and the scope column names are compile-time constants owned by
/// the calling repository; only the scope values are bound as parameters.
pub async fn next_order(
    pool: &DynDatabasePool,
    table: &str,
    scope: &[(&str, i64)],
) -> Result<i32> {
    let sql = max_order_sql(table, scope);

    let max = match pool.driver() {
        DatabaseDriver::Sqlite => {
            max_order_sqlite(pool.as_sqlite().unwrap(), &sql, scope).await?
        }
        DatabaseDriver::Mysql => max_order_mysql(pool.as_mysql().unwrap(), &sql, scope).await?,
    };

    Ok(max.map_or(0, |m| m + 1))
}

/// Build the MAX query for a sibling set.
///
/// `order` is backtick-quoted since it is a reserved word in both backends.
fn max_order_sql(table: &str, scope: &[(&str, i64)]) -> String {
    let filter = scope
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(" AND ");

    format!(
        "SELECT MAX(`order`) AS max_order FROM {} WHERE {}",
        table, filter
    )
}

async fn max_order_sqlite(
    pool: &SqlitePool,
    sql: &str,
    scope: &[(&str, i64)],
) -> Result<Option<i32>> {
    let mut query = sqlx::query(sql);
    for (_, value) in scope {
        query = query.bind(*value);
    }

    let row = query
        .fetch_one(pool)
        .await
        .context("Failed to query sibling order maximum")?;
    Ok(row.get("max_order"))
}

async fn max_order_mysql(
    pool: &MySqlPool,
    sql: &str,
    scope: &[(&str, i64)],
) -> Result<Option<i32>> {
    let mut query = sqlx::query(sql);
    for (_, value) in scope {
        query = query.bind(*value);
    }

    let row = query
        .fetch_one(pool)
        .await
        .context("Failed to query sibling order maximum")?;
    Ok(row.get("max_order"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    async fn setup() -> DynDatabasePool {
        let pool = create_test_pool().await.expect("test pool");
        pool.execute(
            "CREATE TABLE widgets (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             parent_id INTEGER NOT NULL, `order` INTEGER NOT NULL)",
        )
        .await
        .expect("create table");
        pool
    }

    #[tokio::test]
    async fn test_empty_sibling_set_starts_at_zero() {
        let pool = setup().await;

        let order = next_order(&pool, "widgets", &[("parent_id", 1)])
            .await
            .expect("next order");
        assert_eq!(order, 0);
    }

    #[tokio::test]
    async fn test_next_order_is_max_plus_one() {
        let pool = setup().await;
        pool.execute("INSERT INTO widgets (parent_id, `order`) VALUES (1, 0)")
            .await
            .expect("insert");
        pool.execute("INSERT INTO widgets (parent_id, `order`) VALUES (1, 4)")
            .await
            .expect("insert");

        // Gaps are not filled in; the sequence continues past the maximum
        let order = next_order(&pool, "widgets", &[("parent_id", 1)])
            .await
            .expect("next order");
        assert_eq!(order, 5);
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let pool = setup().await;
        pool.execute("INSERT INTO widgets (parent_id, `order`) VALUES (1, 0)")
            .await
            .expect("insert");
        pool.execute("INSERT INTO widgets (parent_id, `order`) VALUES (1, 1)")
            .await
            .expect("insert");

        let order = next_order(&pool, "widgets", &[("parent_id", 2)])
            .await
            .expect("next order");
        assert_eq!(order, 0);
    }

    #[tokio::test]
    async fn test_multi_column_scope() {
        let pool = setup().await;
        pool.execute(
            "CREATE TABLE slots (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             a INTEGER NOT NULL, b INTEGER NOT NULL, `order` INTEGER NOT NULL)",
        )
        .await
        .expect("create table");
        pool.execute("INSERT INTO slots (a, b, `order`) VALUES (1, 1, 7)")
            .await
            .expect("insert");
        pool.execute("INSERT INTO slots (a, b, `order`) VALUES (1, 2, 9)")
            .await
            .expect("insert");

        let order = next_order(&pool, "slots", &[("a", 1), ("b", 1)])
            .await
            .expect("next order");
        assert_eq!(order, 8);
    }
}
