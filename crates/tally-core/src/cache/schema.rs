pub(crate) const DB_FILE: &str = "cache.db";

pub(crate) const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  key TEXT NOT NULL UNIQUE,
  value TEXT NOT NULL,
  size INTEGER NOT NULL,
  stored_at TEXT NOT NULL
);
"#;
