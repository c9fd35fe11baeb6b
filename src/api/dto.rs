use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// The three wrapper shapes the backend answers with, plus an unwrapped
/// record object that only by-id lookups accept.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Bare(Vec<Value>),
    Flagged {
        success: bool,
        #[serde(default)]
        data: Option<Payload>,
        #[serde(default)]
        message: Option<String>,
    },
    Data {
        data: Payload,
    },
    Record(Map<String, Value>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Many(Vec<Value>),
    One(Value),
}

impl Envelope {
    fn into_payload(self) -> Result<Option<Payload>, AppError> {
        match self {
            Envelope::Bare(items) => Ok(Some(Payload::Many(items))),
            Envelope::Flagged {
                success: true,
                data,
                ..
            } => Ok(data),
            Envelope::Flagged {
                success: false,
                message,
                ..
            } => Err(AppError::Api {
                status: reqwest::StatusCode::OK,
                message,
            }),
            Envelope::Data { data } => Ok(Some(data)),
            Envelope::Record(_) => Err(AppError::Decode(
                "Expected a schedule collection, got a single object".to_string(),
            )),
        }
    }

    /// Records of a bulk response. A lone object counts as one record.
    pub fn into_records(self) -> Result<Vec<Value>, AppError> {
        Ok(match self.into_payload()? {
            Some(Payload::Many(items)) => items,
            Some(Payload::One(Value::Null)) | None => Vec::new(),
            Some(Payload::One(item)) => vec![item],
        })
    }

    /// Record of a by-id response: the object itself or the first array element.
    pub fn into_single(self) -> Result<Option<Value>, AppError> {
        if let Envelope::Record(record) = self {
            return Ok(Some(Value::Object(record)));
        }
        Ok(match self.into_payload()? {
            Some(Payload::Many(items)) => items.into_iter().next(),
            Some(Payload::One(Value::Null)) | None => None,
            Some(Payload::One(item)) => Some(item),
        })
    }
}

/// Error body of a failed request, `{message}` or `{error}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .or_else(|| match parsed.error {
                Some(Value::String(s)) => Some(s),
                Some(Value::Object(map)) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .filter(|m| !m.trim().is_empty())
    }
}

/// Body of a create/update/delete answer.
#[derive(Debug, Deserialize)]
pub struct MutationReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Accepts `7` as well as `"7"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Loose {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            // i64::MIN and i64::MAX + 1 are exact powers of two in f64.
            Loose::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            Loose::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Loose::Bool(b) => Some(*b),
            Loose::Int(n) => Some(*n != 0),
            Loose::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Loose::Float(_) => None,
        }
    }

    pub fn into_id(self) -> String {
        match self {
            Loose::Int(n) => n.to_string(),
            Loose::Float(f) => f.to_string(),
            Loose::Text(s) => s,
            Loose::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedule {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub class_id: Option<Loose>,
    #[serde(default)]
    pub room_id: Option<Loose>,
    #[serde(default)]
    pub class: Option<RawClass>,
    #[serde(default)]
    pub room: Option<RawRoom>,
    #[serde(default)]
    pub teacher: Option<RawPerson>,
    #[serde(default)]
    pub subject: Option<RawNamed>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub class_code: Option<String>,
    #[serde(default)]
    pub room_code: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub capacity: Option<Loose>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<Loose>,
    #[serde(default)]
    pub is_active: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub teacher: Option<RawPerson>,
    #[serde(default)]
    pub subject: Option<RawNamed>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default, alias = "roomCode")]
    pub code: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub capacity: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerson {
    #[serde(default, alias = "fullName")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawNamed {
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_floats_outside_i64_are_rejected() {
        assert_eq!(Loose::Float(42.0).as_i64(), Some(42));
        assert_eq!(Loose::Float(-3.0).as_i64(), Some(-3));
        assert_eq!(Loose::Float(1e19).as_i64(), None);
        assert_eq!(Loose::Float(-1e19).as_i64(), None);
        assert_eq!(Loose::Float(9_223_372_036_854_775_808.0).as_i64(), None);
        assert_eq!(Loose::Float(2.5).as_i64(), None);
    }

    #[test]
    fn bare_object_is_a_single_record_only() {
        let single: Envelope = serde_json::from_value(json!({ "id": "7", "dayOfWeek": "Monday" })).unwrap();
        assert_eq!(single.into_single().unwrap().unwrap()["id"], "7");

        let bulk: Envelope = serde_json::from_value(json!({ "id": "7" })).unwrap();
        assert!(matches!(bulk.into_records(), Err(AppError::Decode(_))));

        let wrapped: Envelope = serde_json::from_value(json!({ "data": { "id": "8" } })).unwrap();
        assert_eq!(wrapped.into_single().unwrap().unwrap()["id"], "8");
    }
}
