use serde::{Deserialize, Serialize};

/// Column order of the reservation history export.
pub const HISTORY_CSV_HEADER: [&str; 11] = [
    "reservation_id",
    "user_id",
    "lot",
    "spot_id",
    "vehicle_number",
    "driver_name",
    "start_time",
    "end_time",
    "duration_minutes",
    "cost",
    "remarks",
];

/// One reservation as written to the history CSV.
///
/// Field order matches [`HISTORY_CSV_HEADER`]; the `csv` writer relies on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub user_id: i64,
    pub lot: Option<String>,
    pub spot_id: Option<i64>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    /// Whole minutes between start and end; `None` while the reservation is open.
    pub duration_minutes: Option<i64>,
    pub cost: Option<f64>,
    pub remarks: Option<String>,
}
