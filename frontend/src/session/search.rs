use super::CommonParams;

/// The dashboard's search bar state.
///
/// Empty strings are how the UI says "not set"; they are kept as-is here and
/// filtered out by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub search_type: String,
    pub search_by: String,
    pub search_value: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub op_code: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            search_type: "user".to_string(),
            search_by: String::new(),
            search_value: String::new(),
            start_date: None,
            end_date: None,
            op_code: None,
        }
    }
}

impl SearchState {
    pub fn set_search_type(&mut self, search_type: impl Into<String>) {
        self.search_type = search_type.into();
    }

    pub fn set_search_by(&mut self, search_by: impl Into<String>) {
        self.search_by = search_by.into();
    }

    pub fn set_search_value(&mut self, value: impl Into<String>) {
        self.search_value = value.into();
    }

    pub fn set_date_range(&mut self, start: Option<String>, end: Option<String>) {
        self.start_date = start;
        self.end_date = end;
    }

    pub fn set_op_code(&mut self, op_code: Option<String>) {
        self.op_code = op_code;
    }

    pub fn common_params(&self) -> CommonParams {
        fn non_empty(s: &str) -> Option<String> {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        CommonParams {
            search_type: non_empty(&self.search_type),
            search_by: non_empty(&self.search_by),
            search_value: non_empty(&self.search_value),
            start_date: self.start_date.as_deref().and_then(non_empty),
            end_date: self.end_date.as_deref().and_then(non_empty),
            op_code: self.op_code.as_deref().and_then(non_empty),
        }
    }
}
