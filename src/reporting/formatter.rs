use serde::Serialize;

use crate::errors::AssetIntelError;

/// Pretty JSON for stdout.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AssetIntelError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_json_is_indented() {
        let out = to_pretty_json(&json!({"a": 1})).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }
}
