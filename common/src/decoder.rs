//! `/detect` レスポンスデコーダー
//!
//! 形を信用せず、フィールドの有無・型・Base64の妥当性を検証してから
//! DetectionResponse を組み立てる。エラーにはJSONパスを含める。

use serde_json::{Map, Value};
use thiserror::Error;

use crate::data_uri::is_base64;
use crate::types::{DetectionResponse, DetectionResult};

/// デコードエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` must be {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("field `{field}` is not valid base64")]
    InvalidBase64 { field: String },
}

/// レスポンス本文をデコード
///
/// # Arguments
/// * `body` - HTTPレスポンス本文
///
/// # Returns
/// * `Ok(DetectionResponse)` - スキーマ通り
/// * `Err(DecodeError)` - 最初に見つかった不整合
///
/// # Examples
/// ```
/// use plate_detect_common::decode_response;
///
/// let body = r#"{"results": [{"text": "ABC123", "plate_image": "AAAA"}], "result_image": "AAAA"}"#;
/// let response = decode_response(body).unwrap();
/// assert_eq!(response.results[0].text, "ABC123");
/// ```
pub fn decode_response(body: &str) -> Result<DetectionResponse, DecodeError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| DecodeError::MalformedJson(e.to_string()))?;
    decode_value(&value)
}

/// 解析済みJSONからデコード
pub fn decode_value(value: &Value) -> Result<DetectionResponse, DecodeError> {
    let root = value.as_object().ok_or_else(|| DecodeError::WrongType {
        field: "$".to_string(),
        expected: "an object",
    })?;

    let entries = match root.get("results") {
        None | Some(Value::Null) => {
            return Err(DecodeError::MissingField {
                field: "results".to_string(),
            })
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(DecodeError::WrongType {
                field: "results".to_string(),
                expected: "an array",
            })
        }
    };

    let results = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_result(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let result_image = base64_field(root, "result_image", "result_image".to_string())?;

    Ok(DetectionResponse {
        results,
        result_image,
    })
}

fn decode_result(index: usize, entry: &Value) -> Result<DetectionResult, DecodeError> {
    let path = format!("results[{}]", index);
    let object = entry.as_object().ok_or_else(|| DecodeError::WrongType {
        field: path.clone(),
        expected: "an object",
    })?;

    let text = string_field(object, "text", format!("{}.text", path))?;
    let plate_image = base64_field(object, "plate_image", format!("{}.plate_image", path))?;

    Ok(DetectionResult { text, plate_image })
}

fn string_field(object: &Map<String, Value>, key: &str, path: String) -> Result<String, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { field: path }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DecodeError::WrongType {
            field: path,
            expected: "a string",
        }),
    }
}

fn base64_field(object: &Map<String, Value>, key: &str, path: String) -> Result<String, DecodeError> {
    let value = string_field(object, key, path.clone())?;
    if !is_base64(&value) {
        return Err(DecodeError::InvalidBase64 { field: path });
    }
    Ok(value)
}
