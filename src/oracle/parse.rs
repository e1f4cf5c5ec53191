//! Turning free-form oracle text into an [`OracleReply`].

use super::OracleReply;
use crate::error::{OracleError, OracleErrorKind};
use serde_json::Value;
use tracing::{debug, instrument};

/// Parses a reply of the shape `{"row": int, "col": int, "reasoning": str}`.
///
/// Generative models like to wrap JSON in prose or code fences, so the
/// outermost `{ ... }` span is extracted first. Integer coordinates may
/// be JSON numbers or numeric strings; anything else is an error.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_reply(text: &str) -> Result<OracleReply, OracleError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => {
            return Err(OracleError::new(OracleErrorKind::Malformed(
                "no JSON object in reply".to_string(),
            )));
        }
    };

    let value: Value = serde_json::from_str(json)
        .map_err(|e| OracleError::new(OracleErrorKind::Malformed(e.to_string())))?;

    let object = value.as_object().ok_or_else(|| {
        OracleError::new(OracleErrorKind::Malformed("reply is not a JSON object".to_string()))
    })?;

    let row = coordinate(object.get("row"), "row")?;
    let col = coordinate(object.get("col"), "col")?;
    let reasoning = object
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::to_string);

    debug!(row, col, has_reasoning = reasoning.is_some(), "Parsed oracle reply");
    Ok(OracleReply { row, col, reasoning })
}

fn coordinate(value: Option<&Value>, field: &'static str) -> Result<i64, OracleError> {
    let value = match value {
        None | Some(Value::Null) => {
            return Err(OracleError::new(OracleErrorKind::MissingCoordinate(field)));
        }
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    };

    parsed.ok_or_else(|| {
        OracleError::new(OracleErrorKind::NonNumericCoordinate {
            field,
            value: value.to_string(),
        })
    })
}

/// Integral floats such as `7.0` or `1e20`, saturated into `i64`.
///
/// Huge values stay huge so validation rejects them as off-board.
fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}
