//! JSON codec
//!
//! Encodes instances as JSON objects (or positional arrays) of their public
//! properties and decodes JSON objects back into instances through the full
//! constructor. Decoding never calls setters, so immutable properties are
//! populated the same way a template activation populates them.
//!
//! ## Wire format
//!
//! | ValueType   | JSON                              |
//! |-------------|-----------------------------------|
//! | Bool        | boolean                           |
//! | Int         | integer                           |
//! | Float       | number                            |
//! | String      | string                            |
//! | Bytes       | base64 string (standard alphabet) |
//! | Uuid        | hyphenated string                 |
//! | Timestamp   | RFC 3339 string                   |
//! | Array       | array                             |
//! | Object      | object                            |
//! | Optional(T) | `null` or T                       |

use crate::config::CodecConfig;
use crate::instance::Instance;
use crate::synthesizer::SynthesizedType;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use dtoforge_core::{Error, Result, Value, ValueType};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Encode the public properties of an instance as a JSON object
pub fn encode(instance: &Instance) -> JsonValue {
    let map: Map<String, JsonValue> = instance
        .public_values()
        .map(|(slot, value)| (slot.name.clone(), JsonValue::from(value.clone())))
        .collect();
    JsonValue::Object(map)
}

/// Encode the public properties of an instance as a JSON array in
/// constructor order
pub fn encode_positional(instance: &Instance) -> JsonValue {
    JsonValue::Array(
        instance
            .public_values()
            .map(|(_, value)| JsonValue::from(value.clone()))
            .collect(),
    )
}

/// Encode an instance as a JSON string
pub fn to_string(instance: &Instance) -> Result<String> {
    serde_json::to_string(&encode(instance)).map_err(|e| Error::Codec(e.to_string()))
}

/// Decode a JSON object into an instance of `ty`
///
/// Missing properties take their type default. Fields naming no public
/// property are ignored unless `config.reject_unknown_fields` is set.
///
/// # Errors
///
/// - `Codec` for non-object input, unknown fields (when rejected) and values
///   that do not decode as the declared type
/// - `ConstructorSignatureMismatch` propagated from the constructor
pub fn decode(ty: &Arc<SynthesizedType>, json: &JsonValue, config: &CodecConfig) -> Result<Instance> {
    let object = json
        .as_object()
        .ok_or_else(|| Error::Codec(format!("expected JSON object for '{}'", ty.name())))?;

    if config.reject_unknown_fields {
        for key in object.keys() {
            let known = ty
                .full_constructor()
                .iter()
                .any(|p| names_match(&p.name, key, config.case_insensitive));
            if !known {
                return Err(Error::Codec(format!(
                    "unknown field '{}' for '{}'",
                    key,
                    ty.name()
                )));
            }
        }
    }

    let mut args = Vec::with_capacity(ty.full_constructor().len());
    for param in ty.full_constructor() {
        let field = object.get(&param.name).or_else(|| {
            if config.case_insensitive {
                object
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(&param.name))
                    .map(|(_, v)| v)
            } else {
                None
            }
        });
        let value = match field {
            Some(json) => decode_value(&param.name, &param.value_type, json)?,
            None => param.value_type.default_value(),
        };
        args.push(value);
    }

    debug!(target: "dtoforge::synth", type_name = ty.name(), fields = object.len(), "Decoded instance");
    ty.construct(args)
}

/// Decode a JSON string into an instance of `ty`
pub fn from_str(ty: &Arc<SynthesizedType>, input: &str, config: &CodecConfig) -> Result<Instance> {
    let json: JsonValue = serde_json::from_str(input).map_err(|e| Error::Codec(e.to_string()))?;
    decode(ty, &json, config)
}

fn names_match(property: &str, key: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        property.eq_ignore_ascii_case(key)
    } else {
        property == key
    }
}

/// Decode one JSON value as the declared type
pub fn decode_value(property: &str, ty: &ValueType, json: &JsonValue) -> Result<Value> {
    let mismatch = || {
        Error::Codec(format!(
            "field '{}' expected {}, got {}",
            property,
            ty,
            json_kind(json)
        ))
    };

    let value = match ty {
        ValueType::Optional(inner) => {
            if json.is_null() {
                Value::Null
            } else {
                decode_value(property, inner, json)?
            }
        }
        ValueType::Bool => Value::Bool(json.as_bool().ok_or_else(mismatch)?),
        ValueType::Int => Value::Int(json.as_i64().ok_or_else(mismatch)?),
        ValueType::Float => Value::Float(json.as_f64().ok_or_else(mismatch)?),
        ValueType::String => Value::String(json.as_str().ok_or_else(mismatch)?.to_string()),
        ValueType::Bytes => {
            let encoded = json.as_str().ok_or_else(mismatch)?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| Error::Codec(format!("field '{}': invalid base64: {}", property, e)))?;
            Value::Bytes(bytes)
        }
        ValueType::Uuid => {
            let text = json.as_str().ok_or_else(mismatch)?;
            let id = Uuid::parse_str(text)
                .map_err(|e| Error::Codec(format!("field '{}': invalid uuid: {}", property, e)))?;
            Value::Uuid(id)
        }
        ValueType::Timestamp => {
            let text = json.as_str().ok_or_else(mismatch)?;
            let ts = DateTime::parse_from_rfc3339(text)
                .map_err(|e| Error::Codec(format!("field '{}': invalid timestamp: {}", property, e)))?;
            Value::Timestamp(ts.with_timezone(&Utc))
        }
        ValueType::Array => match json {
            JsonValue::Array(_) => Value::from(json.clone()),
            _ => return Err(mismatch()),
        },
        ValueType::Object => match json {
            JsonValue::Object(_) => Value::from(json.clone()),
            _ => return Err(mismatch()),
        },
    };
    Ok(value)
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TypeCache;
    use dtoforge_core::contract::ContractType;
    use dtoforge_core::define_contract;
    use serde_json::json;

    define_contract! {
        struct Record {
            id: Uuid = GET,
            payload: Vec<u8> = GET_SET,
            created: DateTime<Utc> = GET_INIT,
            note: Option<String> = GET_SET,
        }
        restricted {
            obsolete: bool = GET_SET,
        }
    }

    fn record_type() -> Arc<SynthesizedType> {
        TypeCache::new().get::<Record>().unwrap()
    }

    #[test]
    fn test_encode_object_skips_restricted() {
        let ty = record_type();
        let instance = ty.construct_empty().unwrap();
        let json = encode(&instance);
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("obsolete"));
        assert_eq!(object["id"], json!("00000000-0000-0000-0000-000000000000"));
        assert_eq!(object["note"], JsonValue::Null);
    }

    #[test]
    fn test_encode_positional_order() {
        let ty = record_type();
        let instance = ty.construct_empty().unwrap();
        let json = encode_positional(&instance);
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], json!(""));
    }

    #[test]
    fn test_decode_populates_immutable_properties() {
        let ty = record_type();
        let id = Uuid::new_v4();
        let json = json!({
            "id": id.to_string(),
            "payload": "Zm9vYmFy",
            "created": "2024-01-02T03:04:05Z",
        });
        let instance = decode(&ty, &json, &CodecConfig::default()).unwrap();
        assert_eq!(instance.get(Record::id).unwrap(), id);
        assert_eq!(instance.get(Record::payload).unwrap(), b"foobar".to_vec());
        assert_eq!(
            instance.get(Record::created).unwrap().to_rfc3339(),
            "2024-01-02T03:04:05+00:00"
        );
        assert_eq!(instance.get(Record::note).unwrap(), None);
    }

    #[test]
    fn test_decode_case_insensitive() {
        let ty = record_type();
        let json = json!({ "NOTE": "hi" });

        let strict = decode(&ty, &json, &CodecConfig::default()).unwrap();
        assert_eq!(strict.get(Record::note).unwrap(), None);

        let config = CodecConfig {
            case_insensitive: true,
            ..CodecConfig::default()
        };
        let relaxed = decode(&ty, &json, &config).unwrap();
        assert_eq!(relaxed.get(Record::note).unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn test_decode_rejects_unknown_when_configured() {
        let ty = record_type();
        let json = json!({ "obsolete": true });
        assert!(decode(&ty, &json, &CodecConfig::default()).is_ok());

        let config = CodecConfig {
            reject_unknown_fields: true,
            ..CodecConfig::default()
        };
        assert!(matches!(decode(&ty, &json, &config), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_type_errors() {
        let ty = record_type();
        assert!(matches!(
            decode(&ty, &json!({ "id": 5 }), &CodecConfig::default()),
            Err(Error::Codec(_))
        ));
        assert!(matches!(
            decode(&ty, &json!({ "id": "not-a-uuid" }), &CodecConfig::default()),
            Err(Error::Codec(_))
        ));
        assert!(matches!(
            decode(&ty, &json!([1, 2]), &CodecConfig::default()),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_round_trip_through_string() {
        let ty = record_type();
        let json = json!({ "payload": "AAEC", "note": "n" });
        let original = decode(&ty, &json, &CodecConfig::default()).unwrap();
        let text = to_string(&original).unwrap();
        let decoded = from_str(&ty, &text, &CodecConfig::default()).unwrap();
        assert_eq!(decoded.values(), original.values());
        assert_eq!(Record::contract().name(), "Record");
    }

    #[test]
    fn test_float_accepts_integer_json() {
        let value = decode_value("price", &ValueType::Float, &json!(3)).unwrap();
        assert_eq!(value, Value::Float(3.0));
        assert!(decode_value("count", &ValueType::Int, &json!(3.5)).is_err());
    }
}
