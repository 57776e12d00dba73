//! Sequential identifier allocation
//!
//! Identifiers are drawn from the `id_sequences` counter table on the caller's
//! transaction. The counter row stays locked until that transaction ends, so
//! concurrent requests for the same prefix queue behind each other instead of
//! computing the same "max + 1", and a rollback hands the numbers back.

use shared::{format_entity_id, next_sequence, EntityKind};
use sqlx::PgConnection;

use crate::error::AppResult;

/// Allocate the next identifier of `kind` for `year`, e.g. `ING-2025-007`
pub async fn allocate_id(conn: &mut PgConnection, kind: EntityKind, year: i32) -> AppResult<String> {
    let bumped = sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE id_sequences
        SET last_value = last_value + 1
        WHERE prefix = $1 AND year = $2
        RETURNING last_value
        "#,
    )
    .bind(kind.prefix())
    .bind(year)
    .fetch_optional(&mut *conn)
    .await?;

    let sequence = match bumped {
        Some(sequence) => sequence,
        None => seed_counter(conn, kind, year).await?,
    };

    Ok(format_entity_id(kind, year, sequence))
}

/// First allocation of a prefix/year: continue after identifiers already in the table
async fn seed_counter(conn: &mut PgConnection, kind: EntityKind, year: i32) -> AppResult<i32> {
    let sql = format!("SELECT id FROM {} WHERE id LIKE $1", kind.table());
    let existing = sqlx::query_scalar::<_, String>(&sql)
        .bind(format!("{}%", kind.year_prefix(year)))
        .fetch_all(&mut *conn)
        .await?;

    let seed = next_sequence(kind, year, existing.iter().map(String::as_str));

    // A concurrent first allocation may have created the row meanwhile
    let sequence = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO id_sequences (prefix, year, last_value)
        VALUES ($1, $2, $3)
        ON CONFLICT (prefix, year)
        DO UPDATE SET last_value = id_sequences.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(kind.prefix())
    .bind(year)
    .bind(seed)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!(prefix = kind.prefix(), year, sequence, "Seeded id sequence");

    Ok(sequence)
}
