use serde_json::Value;

use crate::domain::{Category, ClassificationResult, DomainError, Intent, Tone};

/// Confidence reported when the model gives nothing usable.
pub const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Turn raw completion text into a normalized classification.
///
/// `include_raw_output` controls whether the parsed JSON is attached to the
/// result for diagnostics.
pub fn parse_model_response(
    raw: &str,
    include_raw_output: bool,
) -> Result<ClassificationResult, DomainError> {
    let parsed = extract_json(raw)?;
    let result = normalize_classification(&parsed);
    Ok(if include_raw_output {
        result.with_raw_model_output(parsed)
    } else {
        result
    })
}

/// Parse `raw` as JSON, falling back to the first balanced `{...}` block when
/// the model wrapped its answer in prose.
pub fn extract_json(raw: &str) -> Result<Value, DomainError> {
    let direct_err = match serde_json::from_str::<Value>(raw) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match first_balanced_object(raw) {
        Some(candidate) => serde_json::from_str::<Value>(candidate).map_err(|e| {
            DomainError::parse(format!("embedded object is not valid JSON: {e}"), raw)
        }),
        None => Err(DomainError::parse(
            format!("response is not JSON: {direct_err}"),
            raw,
        )),
    }
}

/// Locate the first `{` that has a matching `}`, ignoring braces that appear
/// inside JSON string literals. An opening brace that never closes is skipped
/// and the scan resumes at the next one.
fn first_balanced_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_object_at(&text[start..]))
}

/// The balanced object starting at the `{` that opens `text`, if it closes.
fn balanced_object_at(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Map an arbitrary parsed value onto the closed taxonomy.
pub fn normalize_classification(parsed: &Value) -> ClassificationResult {
    // A missing key has no numeric reading, unlike an explicit `null`.
    let confidence = parsed
        .get("confidence")
        .map(normalize_confidence)
        .unwrap_or(FALLBACK_CONFIDENCE);

    ClassificationResult::new(
        normalize_enum(parsed.get("intent"), Intent::parse, Intent::FALLBACK),
        normalize_enum(parsed.get("category"), Category::parse, Category::FALLBACK),
        normalize_enum(parsed.get("tone"), Tone::parse, Tone::FALLBACK),
        confidence,
    )
}

/// Missing keys, non-string values and strings outside the taxonomy all map
/// to `fallback`.
pub fn normalize_enum<T>(
    value: Option<&Value>,
    parse: impl Fn(&str) -> Option<T>,
    fallback: T,
) -> T {
    value.and_then(Value::as_str).and_then(parse).unwrap_or(fallback)
}

pub fn normalize_confidence(value: &Value) -> f64 {
    let numeric = coerce_number(value);
    if numeric.is_finite() {
        numeric.clamp(0.0, 1.0)
    } else {
        FALLBACK_CONFIDENCE
    }
}

/// Loose numeric coercion following JavaScript `Number(value)`; `NaN` marks
/// values with no numeric reading.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => coerce_str(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        // Arrays read through their string form: `[]` is "", `[x]` is x.
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [item] => match item {
                Value::Bool(_) | Value::Object(_) => f64::NAN,
                other => coerce_number(other),
            },
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn coerce_str(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix_prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|digits| (digits, *radix)));
    if let Some((digits, radix)) = radix_prefixed {
        return u128::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
