//! Normalize raw upstream payloads into canonical shapes
//!
//! Pure transforms over `serde_json::Value`, so every rule is unit
//! testable with literal fixtures. The rules:
//!
//! - missing optional fields get documented defaults (absent `aspects`
//!   or `tokens` → empty, absent `score` → 0)
//! - numeric-like strings parse to numbers; a composite value in a
//!   scalar field is a [`ShapeMismatch`], never silently stringified
//! - unknown extra fields are ignored for forward compatibility
//! - field-name variants observed across deployments are accepted as a
//!   union (`hits` vs `results`, numeric `sentiment` vs `score`, string
//!   `sentiment` vs `polarity` labels)
//! - list items missing their one required field (aspect name, token,
//!   hit text) are skipped with a warning rather than failing the payload

use crate::error::ShapeMismatch;
use crate::report::{Explanation, Prediction, SearchResultSet};
use reviewlens_domain::{AspectObservation, Polarity, SearchHit, TokenAttribution};
use serde_json::{Map, Value};
use tracing::warn;

fn number(value: &Value, field: &str) -> Result<f64, ShapeMismatch> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ShapeMismatch::new(field, "number is not representable as f64")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ShapeMismatch::new(field, format!("string \"{s}\" is not numeric"))),
        Value::Bool(_) => Err(ShapeMismatch::new(field, "expected a number, found a boolean")),
        Value::Array(_) | Value::Object(_) => Err(ShapeMismatch::new(
            field,
            "expected a number, found a composite value",
        )),
        Value::Null => Err(ShapeMismatch::new(field, "expected a number, found null")),
    }
}

/// Numeric field that may be absent (or null), yielding `None`
fn opt_number(obj: &Map<String, Value>, key: &str) -> Result<Option<f64>, ShapeMismatch> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => number(value, key).map(Some),
    }
}

/// String field that may be absent; composites are a mismatch
fn opt_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ShapeMismatch> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(ShapeMismatch::new(
            key,
            "expected a string, found a composite value",
        )),
        Some(other) => Err(ShapeMismatch::new(
            key,
            format!("expected a string, found {other}"),
        )),
    }
}

/// Sequence field that may be absent (default empty); a scalar where the
/// sequence belongs is a mismatch
fn opt_sequence<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Vec<Value>>, ShapeMismatch> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ShapeMismatch::new(key, "expected an array")),
    }
}

fn top_level_object(value: &Value) -> Result<&Map<String, Value>, ShapeMismatch> {
    value
        .as_object()
        .ok_or_else(|| ShapeMismatch::new("$", "expected a JSON object"))
}

/// Upstream models that label a text "negative" often report the score
/// as a positive magnitude. A negative label with a positive score means
/// the signed score points the other way.
fn signed_score(score: f64, label: Option<Polarity>) -> f64 {
    let score = score.clamp(-1.0, 1.0);
    if label == Some(Polarity::Negative) && score > 0.0 {
        -score
    } else {
        score
    }
}

/// One aspect item. `Ok(None)` means "skip": the item had no aspect name.
fn aspect_item(value: &Value) -> Result<Option<AspectObservation>, ShapeMismatch> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return Ok(None),
    };

    let aspect = match opt_string(obj, "aspect")? {
        Some(a) if !a.trim().is_empty() => a,
        _ => return Ok(None),
    };

    // the label may arrive as `sentiment` ("negative") or `polarity`;
    // a numeric `sentiment` is a score instead
    let mut label = None;
    let mut numeric_sentiment = None;
    match obj.get("sentiment") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) => numeric_sentiment = Some(n),
            Err(_) => label = Polarity::parse(s),
        },
        Some(value) => numeric_sentiment = Some(number(value, "sentiment")?),
    }
    if label.is_none() {
        if let Some(s) = opt_string(obj, "polarity")? {
            label = Polarity::parse(&s);
        }
    }

    let raw_score = match opt_number(obj, "score")? {
        Some(score) => score,
        None => numeric_sentiment.unwrap_or(0.0),
    };
    let score = signed_score(raw_score, label);
    let confidence = opt_number(obj, "confidence")?.unwrap_or(0.0).clamp(0.0, 1.0);

    Ok(Some(AspectObservation {
        aspect,
        polarity: label.unwrap_or_else(|| Polarity::from_score(score)),
        sentiment_score: score,
        confidence,
    }))
}

fn aspect_list(obj: &Map<String, Value>) -> Result<Vec<AspectObservation>, ShapeMismatch> {
    let mut aspects = Vec::new();
    if let Some(items) = opt_sequence(obj, "aspects")? {
        for (idx, item) in items.iter().enumerate() {
            match aspect_item(item)? {
                Some(obs) => aspects.push(obs),
                None => warn!("aspect item {idx} has no aspect name, skipping"),
            }
        }
    }
    Ok(aspects)
}

/// Normalize a predict payload into a [`Prediction`]
pub fn normalize_prediction(value: &Value) -> Result<Prediction, ShapeMismatch> {
    let obj = top_level_object(value)?;

    let label = match opt_string(obj, "sentiment")? {
        Some(s) => Polarity::parse(&s),
        None => None,
    };
    let score = signed_score(opt_number(obj, "score")?.unwrap_or(0.0), label);

    Ok(Prediction {
        sentiment: label.unwrap_or_else(|| Polarity::from_score(score)),
        score,
        aspects: aspect_list(obj)?,
    })
}

/// Normalize an explain payload into an [`Explanation`]
pub fn normalize_explanation(value: &Value) -> Result<Explanation, ShapeMismatch> {
    let obj = top_level_object(value)?;

    let mut tokens = Vec::new();
    if let Some(items) = opt_sequence(obj, "tokens")? {
        for (idx, item) in items.iter().enumerate() {
            let Some(item_obj) = item.as_object() else {
                warn!("token item {idx} is not an object, skipping");
                continue;
            };
            let Some(token) = opt_string(item_obj, "token")? else {
                warn!("token item {idx} has no token, skipping");
                continue;
            };
            let score = opt_number(item_obj, "score")?.unwrap_or(0.0).clamp(-1.0, 1.0);
            tokens.push(TokenAttribution { token, score });
        }
    }

    Ok(Explanation {
        tokens,
        aspects: aspect_list(obj)?,
    })
}

/// Normalize a search payload into a [`SearchResultSet`].
///
/// Accepts either the `hits` or the `results` field name; both have been
/// observed upstream.
pub fn normalize_search(value: &Value) -> Result<SearchResultSet, ShapeMismatch> {
    let obj = top_level_object(value)?;

    let items = match opt_sequence(obj, "hits")? {
        Some(items) => Some(items),
        None => opt_sequence(obj, "results")?,
    };

    let mut hits = Vec::new();
    if let Some(items) = items {
        for (idx, item) in items.iter().enumerate() {
            let Some(item_obj) = item.as_object() else {
                warn!("search hit {idx} is not an object, skipping");
                continue;
            };
            let Some(text) = opt_string(item_obj, "text")? else {
                warn!("search hit {idx} has no text, skipping");
                continue;
            };
            let score = opt_number(item_obj, "score")?.unwrap_or(0.0).clamp(0.0, 1.0);
            let id = match item_obj.get("id") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(_) => {
                    return Err(ShapeMismatch::new("id", "expected a string or number"));
                }
            };
            hits.push(SearchHit {
                id,
                text,
                score,
                domain: opt_string(item_obj, "domain")?,
                product: opt_string(item_obj, "product")?,
                date: opt_string(item_obj, "date")?,
            });
        }
    }

    Ok(SearchResultSet { hits })
}
