//! Reversible string encoding for stat fields: base64 over the JSON
//! serialization. This is a text transform, not a cipher — anyone holding
//! the encoded bytes can reconstruct the value. Callers must not treat it
//! as confidentiality.

use crate::models::EncodedField;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Encode a JSON-serializable value. Never panics or propagates: on
/// internal failure the result is `None`.
pub fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_vec(value) {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(err) => {
            warn!("field encoding failed: {err}");
            None
        }
    }
}

/// Decode previously encoded text. `None` for anything that is not valid
/// base64 or does not parse as JSON afterwards.
pub fn decode(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    let bytes = STANDARD.decode(text).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Wrap a single stat as `{ <name>: value }` and encode it. A failed encode
/// leaves an empty payload, which decodes to an absent value later.
pub fn encode_stat(name: &str, value: f64) -> EncodedField {
    let mut payload = serde_json::Map::new();
    payload.insert(name.to_string(), Value::from(value));
    EncodedField {
        value: encode(&payload).unwrap_or_default(),
    }
}

/// Pull the named stat back out of an encoded field. The payload must carry
/// the matching key; anything else is treated as undecodable.
pub fn decode_stat(name: &str, field: &EncodedField) -> Option<f64> {
    decode(&field.value)?.get(name)?.as_f64()
}
