pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  text TEXT NOT NULL,
  risk REAL NOT NULL,
  categories TEXT NOT NULL,
  highlights TEXT NOT NULL,
  rewrites TEXT NOT NULL,
  ok INTEGER NOT NULL DEFAULT 1,
  text_sha256 TEXT NOT NULL,
  created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_logs_created_at ON logs(created_at);
"#;
