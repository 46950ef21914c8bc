//! JSON output formatting

use anyhow::Result;
use serde::Serialize;

/// Serialize a value, indented when `pretty` is set
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Print a value as a single JSON document
pub fn print<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_and_pretty() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(to_json(&value, false).unwrap(), r#"{"a":1}"#);
        assert_eq!(to_json(&value, true).unwrap(), "{\n  \"a\": 1\n}");
    }
}
