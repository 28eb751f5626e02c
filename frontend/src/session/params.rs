use serde_json::Value;

use crate::gateway::Params;

/// Filter and context values merged into every outgoing request.
///
/// Unset fields stay `None`; [`CommonParams::to_params`] still emits them as
/// `null` entries and the gateway drops them before serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonParams {
    pub search_type: Option<String>,
    pub search_by: Option<String>,
    pub search_value: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub op_code: Option<String>,
}

impl CommonParams {
    /// Wire names in the order the server has always received them.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        let fields = [
            ("searchType", &self.search_type),
            ("searchBy", &self.search_by),
            ("searchValue", &self.search_value),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            ("opCode", &self.op_code),
        ];
        for (key, value) in fields {
            let value = match value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            params.insert(key.to_string(), value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_become_null() {
        let params = CommonParams {
            search_type: Some("user".into()),
            ..Default::default()
        }
        .to_params();
        assert_eq!(params["searchType"], Value::String("user".into()));
        assert_eq!(params["opCode"], Value::Null);
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            ["searchType", "searchBy", "searchValue", "startDate", "endDate", "opCode"]
        );
    }
}
