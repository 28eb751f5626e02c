//! SQLite schema for the data the export jobs read.

use rusqlite::Connection;
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS parking_lots (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS parking_spots (
    id     INTEGER PRIMARY KEY,
    lot_id INTEGER NOT NULL REFERENCES parking_lots(id)
);
CREATE TABLE IF NOT EXISTS reservations (
    id             INTEGER PRIMARY KEY,
    user_id        INTEGER NOT NULL,
    spot_id        INTEGER REFERENCES parking_spots(id),
    vehicle_number TEXT,
    driver_name    TEXT,
    start_time     TEXT NOT NULL,
    end_time       TEXT,
    parking_fee    REAL,
    remarks        TEXT
);
CREATE INDEX IF NOT EXISTS idx_reservations_user ON reservations(user_id, start_time);
";

/// Creates the tables if they are missing. Safe to run on every startup.
pub fn init(path: &Path) -> Result<(), String> {
    let conn = Connection::open(path).map_err(|e| e.to_string())?;
    conn.execute_batch(SCHEMA).map_err(|e| e.to_string())
}
