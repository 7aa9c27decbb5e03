use rusqlite::Connection;

// cascades are deliberately absent: flows delete dependent rows themselves
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user_t(
  user_id INTEGER PRIMARY KEY AUTOINCREMENT,
  creation_time INTEGER NOT NULL,
  name TEXT NOT NULL,
  email TEXT NOT NULL UNIQUE,
  password_hash TEXT NOT NULL,
  is_active INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS pending_registration_t(
  email TEXT PRIMARY KEY,
  creation_time INTEGER NOT NULL,
  name TEXT NOT NULL,
  password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS otp_t(
  otp_id INTEGER PRIMARY KEY AUTOINCREMENT,
  creation_time INTEGER NOT NULL,
  otp_kind INTEGER NOT NULL,
  owner_email TEXT NOT NULL,
  code TEXT NOT NULL,
  expires_at INTEGER NOT NULL,
  used INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS otp_owner_idx ON otp_t(otp_kind, owner_email);

CREATE TABLE IF NOT EXISTS token_t(
  token_id INTEGER PRIMARY KEY AUTOINCREMENT,
  creation_time INTEGER NOT NULL,
  creator_user_id INTEGER NOT NULL,
  token_hash TEXT NOT NULL,
  token_kind INTEGER NOT NULL,
  duration INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS token_hash_idx ON token_t(token_hash);
";

pub fn initialize(con: &mut Connection) -> Result<(), rusqlite::Error> {
    con.execute_batch(SCHEMA)
}
