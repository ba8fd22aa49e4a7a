use serde_json::Value;

const MAX_ID_LEN: usize = 64;

/// Filters out path ids that cannot name a stored row (empty, padded or
/// oversized). Callers answer `None` with their own not-found error.
#[must_use]
pub fn validate_id(id: &str) -> Option<&str> {
    (!id.is_empty() && id.trim() == id && id.len() <= MAX_ID_LEN).then_some(id)
}

/// Loose boolean coercion for flags sent by older clients: `false`, `0`,
/// `""` and `null` are false, everything else is true.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("false")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));

        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("3f2a9c"), Some("3f2a9c"));
        assert_eq!(validate_id(""), None);
        assert_eq!(validate_id(" 3f2a9c"), None);
        assert_eq!(validate_id(&"x".repeat(65)), None);
    }
}
