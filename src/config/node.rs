//! Node attributes.

use std::path::Path;

use serde_json::Value;

use crate::error::SvcError;

/// Location of the start-first flag inside a Chef-style node document.
const START_FIRST_POINTER: &str = "/REC/PICs/scalaris_PIC/0/attributes/scalaris_start_first";

/// Per-node attributes that shape the service declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    /// Stop the scalaris node with its hard-kill verb.
    pub scalaris_start_first: bool,
}

impl NodeAttributes {
    /// Read attributes from a JSON node document.
    pub fn load(path: &Path) -> Result<Self, SvcError> {
        let content = std::fs::read_to_string(path).map_err(|e| SvcError::Config {
            message: format!(
                "Failed to read node attributes '{}': {}",
                path.display(),
                e
            ),
        })?;
        let document: Value = serde_json::from_str(&content)?;
        Ok(Self::from_json(&document))
    }

    /// Extract attributes from a parsed node document.
    ///
    /// The flag follows Chef attribute truthiness: only a missing value,
    /// `null` and `false` are off. Any other value, `0` and `"false"`
    /// included, turns it on.
    pub fn from_json(document: &Value) -> Self {
        let scalaris_start_first = document
            .pointer(START_FIRST_POINTER)
            .is_some_and(is_truthy);

        Self {
            scalaris_start_first,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_flag_found() {
        let doc = json!({
            "REC": {"PICs": {"scalaris_PIC": [
                {"attributes": {"scalaris_start_first": true}}
            ]}}
        });
        assert!(NodeAttributes::from_json(&doc).scalaris_start_first);
    }

    #[test]
    fn test_flag_missing_defaults_false() {
        assert!(!NodeAttributes::from_json(&json!({})).scalaris_start_first);

        let doc = json!({"REC": {"PICs": {"scalaris_PIC": []}}});
        assert!(!NodeAttributes::from_json(&doc).scalaris_start_first);
    }

    #[test]
    fn test_flag_uses_attribute_truthiness() {
        let flag = |value: Value| {
            let doc = json!({
                "REC": {"PICs": {"scalaris_PIC": [
                    {"attributes": {"scalaris_start_first": value}}
                ]}}
            });
            NodeAttributes::from_json(&doc).scalaris_start_first
        };

        assert!(!flag(json!(false)));
        assert!(!flag(Value::Null));
        assert!(flag(json!("true")));
        assert!(flag(json!("false")));
        assert!(flag(json!(1)));
        assert!(flag(json!(0)));
        assert!(flag(json!({})));
    }

    #[test]
    fn test_only_first_pic_counts() {
        let doc = json!({
            "REC": {"PICs": {"scalaris_PIC": [
                {"attributes": {}},
                {"attributes": {"scalaris_start_first": true}}
            ]}}
        });
        assert!(!NodeAttributes::from_json(&doc).scalaris_start_first);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.json");
        std::fs::write(
            &path,
            r#"{"REC":{"PICs":{"scalaris_PIC":[{"attributes":{"scalaris_start_first":true}}]}}}"#,
        )
        .unwrap();
        assert!(NodeAttributes::load(&path).unwrap().scalaris_start_first);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            NodeAttributes::load(&path),
            Err(SvcError::Serialization(_))
        ));
    }
}
