use rusqlite::Connection;
use sea_query::{ColumnDef, Expr, OnConflict, Query, SqliteQueryBuilder, Table};
use sea_query_rusqlite::RusqliteBinder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::{SettingsMeta, SettingsRecord, SettingsTable, SETTINGS_VERSION};
use crate::error::TriageError;

const KEY_DAYS: &str = "days";
const KEY_SINCE: &str = "since";
const KEY_LABELS: &str = "labels";
const KEY_GROUP: &str = "group";

/// Last-used query parameters. Last write wins.
pub trait SettingsStore: Send + Sync {
    fn save(&self, record: &SettingsRecord) -> Result<(), TriageError>;

    /// `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<SettingsRecord>, TriageError>;

    fn clear(&self) -> Result<(), TriageError>;
}

pub fn get_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ghtabs").join("settings.db"))
}

pub fn init_db(conn: &Connection) -> Result<(), TriageError> {
    let meta_sql = Table::create()
        .table(SettingsMeta::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SettingsMeta::Key)
                .text()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(SettingsMeta::Value).integer())
        .build(SqliteQueryBuilder);
    conn.execute(&meta_sql, [])?;

    let (version_sql, version_values) = Query::select()
        .column(SettingsMeta::Value)
        .from(SettingsMeta::Table)
        .and_where(Expr::col(SettingsMeta::Key).eq("version"))
        .build_rusqlite(SqliteQueryBuilder);

    let current_version: Option<i32> = conn
        .query_row(&version_sql, &*version_values.as_params(), |row| row.get(0))
        .ok();

    if current_version != Some(SETTINGS_VERSION) {
        let drop_sql = Table::drop()
            .table(SettingsTable::Table)
            .if_exists()
            .build(SqliteQueryBuilder);
        conn.execute(&drop_sql, [])?;

        let (upsert_sql, upsert_values) = Query::insert()
            .into_table(SettingsMeta::Table)
            .columns([SettingsMeta::Key, SettingsMeta::Value])
            .values_panic(["version".into(), SETTINGS_VERSION.into()])
            .on_conflict(
                OnConflict::column(SettingsMeta::Key)
                    .update_column(SettingsMeta::Value)
                    .to_owned(),
            )
            .build_rusqlite(SqliteQueryBuilder);
        conn.execute(&upsert_sql, &*upsert_values.as_params())?;
    }

    let settings_sql = Table::create()
        .table(SettingsTable::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SettingsTable::Key)
                .text()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(SettingsTable::Value).text().not_null())
        .build(SqliteQueryBuilder);
    conn.execute(&settings_sql, [])?;

    Ok(())
}

/// Settings kept in a small SQLite key-value table.
pub struct SqliteSettingsStore {
    path: PathBuf,
}

impl SqliteSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, TriageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path)?;
        init_db(&conn)?;
        Ok(conn)
    }

    fn put(conn: &Connection, key: &str, value: String) -> Result<(), TriageError> {
        let (sql, values) = Query::insert()
            .into_table(SettingsTable::Table)
            .columns([SettingsTable::Key, SettingsTable::Value])
            .values_panic([key.into(), value.into()])
            .on_conflict(
                OnConflict::column(SettingsTable::Key)
                    .update_column(SettingsTable::Value)
                    .to_owned(),
            )
            .build_rusqlite(SqliteQueryBuilder);
        conn.execute(&sql, &*values.as_params())?;
        Ok(())
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn save(&self, record: &SettingsRecord) -> Result<(), TriageError> {
        let conn = self.open()?;

        Self::put(
            &conn,
            KEY_DAYS,
            record.days.map(|days| days.to_string()).unwrap_or_default(),
        )?;
        Self::put(&conn, KEY_SINCE, record.since.clone().unwrap_or_default())?;
        Self::put(&conn, KEY_LABELS, record.labels.clone().unwrap_or_default())?;
        Self::put(
            &conn,
            KEY_GROUP,
            record.group.unwrap_or(false).to_string(),
        )?;

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<SettingsRecord>, TriageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let conn = self.open()?;
        let (sql, values) = Query::select()
            .columns([SettingsTable::Key, SettingsTable::Value])
            .from(SettingsTable::Table)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(&*values.as_params(), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .filter_map(|r| r.ok())
            .collect::<Vec<_>>();

        if rows.is_empty() {
            return Ok(None);
        }

        let mut record = SettingsRecord::default();
        for (key, value) in rows {
            match key.as_str() {
                KEY_DAYS => record.days = value.parse().ok(),
                KEY_SINCE => record.since = (!value.is_empty()).then_some(value),
                KEY_LABELS => record.labels = Some(value),
                KEY_GROUP => record.group = value.parse().ok(),
                _ => {}
            }
        }

        Ok(Some(record))
    }

    fn clear(&self) -> Result<(), TriageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SqliteSettingsStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteSettingsStore::new(dir.path().join("nested").join("settings.db"));
        (dir, store)
    }

    #[test]
    fn load_is_empty_before_first_save() {
        let (_dir, store) = store();
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn saved_record_is_loaded_back() {
        let (_dir, store) = store();
        let record = SettingsRecord {
            days: Some(12),
            since: Some("2024-05-01T00:00:00.000+00:00".to_string()),
            labels: Some("bug,area:core".to_string()),
            group: Some(true),
        };

        store.save(&record).expect("save");
        assert_eq!(store.load().expect("load"), Some(record));
    }

    #[test]
    fn last_write_wins() {
        let (_dir, store) = store();
        store
            .save(&SettingsRecord {
                days: Some(5),
                since: Some("2024-05-01".to_string()),
                labels: Some("bug".to_string()),
                group: Some(true),
            })
            .expect("save");
        store
            .save(&SettingsRecord {
                days: Some(9),
                since: None,
                labels: Some(String::new()),
                group: Some(false),
            })
            .expect("save");

        let loaded = store.load().expect("load").expect("record");
        assert_eq!(loaded.days, Some(9));
        assert_eq!(loaded.since, None);
        assert_eq!(loaded.labels.as_deref(), Some(""));
        assert_eq!(loaded.group, Some(false));
    }

    #[test]
    fn cleared_days_replace_the_stored_value() {
        let (_dir, store) = store();
        store
            .save(&SettingsRecord {
                days: Some(10),
                ..SettingsRecord::default()
            })
            .expect("save");
        store
            .save(&SettingsRecord {
                days: None,
                ..SettingsRecord::default()
            })
            .expect("save");

        let loaded = store.load().expect("load").expect("record");
        assert_eq!(loaded.days, None);
    }

    #[test]
    fn clear_removes_everything() {
        let (_dir, store) = store();
        store.save(&SettingsRecord::default()).expect("save");
        store.clear().expect("clear");
        assert!(!store.path().exists());
        assert_eq!(store.load().expect("load"), None);
    }
}
