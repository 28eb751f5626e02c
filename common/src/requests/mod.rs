use serde::{Deserialize, Serialize};

/// Body of `POST /api/user/export-csv`.
///
/// The dashboard merges its search parameters into every body, so the date
/// bounds arrive under their camelCase names; unrelated keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportCsvRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,
}
