use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

use crate::domain::common::search_key;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_supplier (
        id TEXT PRIMARY KEY NOT NULL,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        contact_person TEXT,
        phone TEXT,
        city TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        search_key TEXT NOT NULL DEFAULT '',
        created_at TEXT,
        updated_at TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a001_supplier_code ON a001_supplier (code);",
    r#"
    CREATE TABLE IF NOT EXISTS a002_employee (
        id TEXT PRIMARY KEY NOT NULL,
        code TEXT NOT NULL,
        full_name TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT,
        monthly_salary REAL NOT NULL DEFAULT 0,
        hired_on TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        search_key TEXT NOT NULL DEFAULT '',
        created_at TEXT,
        updated_at TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a002_employee_code ON a002_employee (code);",
    "CREATE INDEX IF NOT EXISTS idx_a002_employee_department ON a002_employee (department);",
];

/// Opens (creating if needed) the SQLite file and bootstraps the schema.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Windows paths need a leading slash in the URL
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Private in-memory database with the schema applied. A single pooled
/// connection keeps every query on the same memory database.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// (таблица, поля, из которых собирается `search_key`)
const SEARCH_KEY_SOURCES: &[(&str, &str, &str)] = &[
    ("a001_supplier", "code", "name"),
    ("a002_employee", "code", "full_name"),
];

pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    for (table, code_col, name_col) in SEARCH_KEY_SOURCES {
        ensure_search_key(conn, table, code_col, name_col).await?;
    }
    Ok(())
}

async fn has_column(conn: &DatabaseConnection, table: &str, column: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("PRAGMA table_info({})", table),
        ))
        .await?;
    for row in rows {
        let name: String = row.try_get("", "name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Базы, созданные до появления `search_key`: добавляем колонку и
/// заполняем её из Rust, т.к. `lower()` в SQLite не знает кириллицу.
async fn ensure_search_key(
    conn: &DatabaseConnection,
    table: &str,
    code_col: &str,
    name_col: &str,
) -> anyhow::Result<()> {
    if has_column(conn, table, "search_key").await? {
        return Ok(());
    }
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!(
            "ALTER TABLE {} ADD COLUMN search_key TEXT NOT NULL DEFAULT ''",
            table
        ),
    ))
    .await?;

    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT id, {}, {} FROM {}", code_col, name_col, table),
        ))
        .await?;
    for row in &rows {
        let id: String = row.try_get("", "id")?;
        let code: String = row.try_get("", code_col)?;
        let name: String = row.try_get("", name_col)?;
        conn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("UPDATE {} SET search_key = ? WHERE id = ?", table),
            [search_key(&[&code, &name]).into(), id.into()],
        ))
        .await?;
    }
    tracing::info!("Added search_key to {} ({} rows backfilled)", table, rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_key_backfilled_for_old_tables() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let conn = Database::connect(options).await.unwrap();
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "CREATE TABLE a001_supplier (id TEXT PRIMARY KEY NOT NULL, code TEXT NOT NULL, \
             name TEXT NOT NULL, contact_person TEXT, phone TEXT, city TEXT, \
             is_active INTEGER NOT NULL DEFAULT 1, created_at TEXT, updated_at TEXT);"
                .to_string(),
        ))
        .await
        .unwrap();
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "INSERT INTO a001_supplier (id, code, name) VALUES ('1', 'SUP-001', 'Камни Урала');"
                .to_string(),
        ))
        .await
        .unwrap();

        ensure_schema(&conn).await.unwrap();
        // повторный вызов ничего не ломает
        ensure_schema(&conn).await.unwrap();

        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT search_key FROM a001_supplier WHERE id = '1'".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let key: String = row.try_get("", "search_key").unwrap();
        assert_eq!(key, "sup-001\u{1f}камни урала");
    }
}
