//! Blocking half of the export job: query reservations and write the CSV.
//! Runs on `spawn_blocking`; never call it from async code directly.

use common::model::reservation::{ReservationRow, HISTORY_CSV_HEADER};
use common::requests::ExportCsvRequest;
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

const HISTORY_QUERY: &str = "
SELECT r.id,
       r.user_id,
       l.name,
       r.spot_id,
       r.vehicle_number,
       r.driver_name,
       r.start_time,
       r.end_time,
       CASE WHEN r.end_time IS NULL THEN NULL
            ELSE (CAST(strftime('%s', r.end_time) AS INTEGER)
                  - CAST(strftime('%s', r.start_time) AS INTEGER)) / 60
       END,
       r.parking_fee,
       r.remarks
FROM reservations r
LEFT JOIN parking_spots s ON s.id = r.spot_id
LEFT JOIN parking_lots l ON l.id = s.lot_id
WHERE (?1 IS NULL OR r.user_id = ?1)
  AND (?2 IS NULL OR r.start_time >= ?2)
  AND (?3 IS NULL OR r.start_time < date(?3, '+1 day'))
ORDER BY r.start_time, r.id";

/// File name of the export for `task_id`.
pub fn history_file_name(task_id: &str) -> String {
    format!("history_{}.csv", task_id)
}

/// Runs a whole export and returns the written file name.
///
/// `on_progress` receives percentages in `0..=100`, each value at most once.
pub fn export_history(
    database: &Path,
    reports_dir: &Path,
    task_id: &str,
    request: &ExportCsvRequest,
    mut on_progress: impl FnMut(u32),
) -> Result<String, String> {
    let conn = Connection::open(database).map_err(|e| format!("database: {}", e))?;
    let rows = load_reservations(&conn, request)?;

    fs::create_dir_all(reports_dir).map_err(|e| format!("reports dir: {}", e))?;
    let file_name = history_file_name(task_id);
    write_history_csv(&reports_dir.join(&file_name), &rows, &mut on_progress)?;
    Ok(file_name)
}

pub fn load_reservations(
    conn: &Connection,
    request: &ExportCsvRequest,
) -> Result<Vec<ReservationRow>, String> {
    let mut stmt = conn.prepare(HISTORY_QUERY).map_err(|e| e.to_string())?;
    let start = request.start_date.as_deref().filter(|d| !d.is_empty());
    let end = request.end_date.as_deref().filter(|d| !d.is_empty());

    let rows = stmt
        .query_map(params![request.user_id, start, end], |row| {
            Ok(ReservationRow {
                reservation_id: row.get(0)?,
                user_id: row.get(1)?,
                lot: row.get(2)?,
                spot_id: row.get(3)?,
                vehicle_number: row.get(4)?,
                driver_name: row.get(5)?,
                start_time: row.get(6)?,
                end_time: row.get(7)?,
                duration_minutes: row.get(8)?,
                cost: row.get(9)?,
                remarks: row.get(10)?,
            })
        })
        .map_err(|e| e.to_string())?;

    let rows = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    Ok(rows)
}

/// Writes the header and every row. An empty export still gets its header.
pub fn write_history_csv(
    path: &Path,
    rows: &[ReservationRow],
    on_progress: &mut impl FnMut(u32),
) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| e.to_string())?;
    writer
        .write_record(HISTORY_CSV_HEADER)
        .map_err(|e| e.to_string())?;

    on_progress(0);
    let total = rows.len();
    let mut reported = 0;
    for (i, row) in rows.iter().enumerate() {
        writer.serialize(row).map_err(|e| e.to_string())?;
        let pct = ((i + 1) * 100 / total) as u32;
        if pct > reported {
            reported = pct;
            on_progress(pct);
        }
    }
    if total == 0 {
        on_progress(100);
    }

    writer.flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{seed, temp_config};

    fn request(user_id: Option<i64>, start: Option<&str>, end: Option<&str>) -> ExportCsvRequest {
        ExportCsvRequest {
            user_id,
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    #[test]
    fn filters_by_user_and_inclusive_dates() {
        let (_dir, config) = temp_config();
        seed(&config);
        let conn = Connection::open(&config.database_path).unwrap();

        let all = load_reservations(&conn, &ExportCsvRequest::default()).unwrap();
        assert_eq!(all.iter().map(|r| r.reservation_id).collect::<Vec<_>>(), vec![1, 3, 2, 4]);

        let user = load_reservations(&conn, &request(Some(7), None, None)).unwrap();
        assert_eq!(user.len(), 3);

        let january = load_reservations(&conn, &request(Some(7), Some("2024-01-01"), Some("2024-01-20"))).unwrap();
        assert_eq!(january.iter().map(|r| r.reservation_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn computes_duration_and_lot() {
        let (_dir, config) = temp_config();
        seed(&config);
        let conn = Connection::open(&config.database_path).unwrap();
        let rows = load_reservations(&conn, &ExportCsvRequest::default()).unwrap();

        let first = &rows[0];
        assert_eq!(first.lot.as_deref(), Some("North"));
        assert_eq!(first.duration_minutes, Some(90));
        assert_eq!(first.cost, Some(12.5));

        let open = rows.iter().find(|r| r.reservation_id == 4).unwrap();
        assert_eq!(open.lot, None);
        assert_eq!(open.duration_minutes, None);
    }

    #[test]
    fn writes_header_rows_and_progress() {
        let (dir, config) = temp_config();
        seed(&config);
        let mut progress = Vec::new();
        let name = export_history(
            &config.database_path,
            &config.reports_dir,
            "t1",
            &request(Some(8), None, None),
            |p| progress.push(p),
        )
        .unwrap();

        assert_eq!(name, "history_t1.csv");
        let text = fs::read_to_string(dir.path().join("reports").join(&name)).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HISTORY_CSV_HEADER.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("3,8,North,11,KA-03,Asha,2024-01-10 07:15:00,2024-01-10 17:15:00,600,40.0,")
        );
        assert_eq!(lines.next(), None);
        assert_eq!(progress, vec![0, 100]);
    }

    #[test]
    fn empty_export_keeps_header() {
        let (dir, config) = temp_config();
        let name = export_history(
            &config.database_path,
            &config.reports_dir,
            "empty",
            &request(Some(99), None, None),
            |_| {},
        )
        .unwrap();
        let text = fs::read_to_string(dir.path().join("reports").join(name)).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
