use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::classify;
use crate::code::Code;
use crate::convert;
use crate::error::Error;
use crate::shape::SqlStateError;
use crate::sqlstate::{self, SqlState};

fn to_js(value: &serde_json::Value) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

/// Classify a SQLSTATE string into its gRPC code, condition name and the rule that fired.
#[wasm_bindgen]
pub fn classify_sql_state(state: &str) -> JsValue {
    let state = match SqlState::new(state) {
        Ok(s) => s,
        Err(e) => return error_result(&e.to_string()),
    };

    let rule = classify::rule_for_sql_state(state.as_str()).map(|(rule, _)| *rule);
    let code = classify::code_for_sql_state(state.as_str());
    let result = serde_json::json!({
        "sqlState": state.as_str(),
        "class": state.class(),
        "code": code.as_ref(),
        "value": code.value(),
        "conditionName": state.condition_name(),
        "rule": rule,
    });
    to_js(&result)
}

/// Convert a `{"sqlState": .., "message": ..}` payload into a status.
#[wasm_bindgen]
pub fn convert_json(json: &str) -> JsValue {
    let parsed: Result<SqlStateError, Error> = serde_json::from_str(json).map_err(Error::from);
    let err = match parsed {
        Ok(err) => err,
        Err(e) => return error_result(&e.to_string()),
    };

    let (status, matched) = convert::from_error(Some(&err));
    let result = serde_json::json!({
        "code": status.code().as_ref(),
        "value": status.code().value(),
        "message": status.message(),
        "matched": matched,
    });
    to_js(&result)
}

/// Condition name for an exact SQLSTATE, or null.
#[wasm_bindgen]
pub fn condition_name(state: &str) -> Option<String> {
    sqlstate::condition_name(state).map(str::to_string)
}

/// Every known SQLSTATE with its condition name and gRPC code.
#[wasm_bindgen]
pub fn get_all_conditions() -> JsValue {
    let result: Vec<serde_json::Value> = sqlstate::CONDITIONS
        .iter()
        .map(|(state, name)| {
            serde_json::json!({
                "sqlState": state,
                "conditionName": name,
                "code": classify::code_for_sql_state(state).as_ref(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(result))
}

/// Canonical name of a numeric gRPC code; out-of-range values read as `UNKNOWN`.
#[wasm_bindgen]
pub fn code_name(value: i32) -> String {
    Code::from_i32(value).to_string()
}
