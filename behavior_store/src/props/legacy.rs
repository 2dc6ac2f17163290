//! Legacy property-comment syntax.
//!
//! The first script API generation declared properties in single-line
//! comments:
//!
//! ```text
//! // property Number speed 12
//! // property String nickname foo
//! // property Boolean isHappy true
//! // property Actor target
//! ```
//!
//! The current generation exports structured declarations as data instead;
//! both are honored when a behavior's properties are enumerated, legacy
//! entries first.

use tracing::warn;

use super::{PropDef, PropType};
use crate::error::StoreError;

const LEGACY_PREFIX: &str = "// property ";

/// Parse one `// property ...` line into a declaration.
pub fn parse_legacy_line(line: &str) -> Result<PropDef, StoreError> {
    let malformed = || StoreError::MalformedSource {
        line: line.to_string(),
    };

    let rest = line.strip_prefix(LEGACY_PREFIX).ok_or_else(malformed)?;
    let mut parts = rest.split_whitespace();

    let type_name = parts.next().ok_or_else(malformed)?;
    let prop_type = PropType::from_name(type_name).ok_or_else(malformed)?;
    let variable_name = parts.next().ok_or_else(malformed)?;

    let mut def = PropDef::new(prop_type, variable_name);
    if let Some(default_value) = parts.next() {
        def.default_value = Some(default_value.to_string());
    }
    Ok(def)
}

/// Enumerate every legacy property declaration in a script source.
///
/// Malformed declarations are logged and skipped, never fatal - a behavior
/// with one bad line still exposes its other properties.
pub fn parse_legacy_props(source: &str) -> Vec<PropDef> {
    let mut defs = Vec::new();
    for line in source.lines() {
        if !line.starts_with(LEGACY_PREFIX) {
            continue;
        }
        match parse_legacy_line(line) {
            Ok(def) => defs.push(def),
            Err(err) => warn!(%err, "skipping property declaration"),
        }
    }
    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_default() {
        let def = parse_legacy_line("// property Number speed 12").unwrap();
        assert_eq!(def.prop_type, PropType::Number);
        assert_eq!(def.variable_name, "speed");
        assert_eq!(def.default_value.as_deref(), Some("12"));
    }

    #[test]
    fn test_parse_line_without_default() {
        let def = parse_legacy_line("// property Actor target").unwrap();
        assert_eq!(def.prop_type, PropType::ActorRef);
        assert_eq!(def.variable_name, "target");
        assert!(def.default_value.is_none());
    }

    #[test]
    fn test_parse_line_rejects_unknown_type() {
        let err = parse_legacy_line("// property Matrix transform").unwrap_err();
        assert!(matches!(err, StoreError::MalformedSource { .. }));
    }

    #[test]
    fn test_parse_line_rejects_missing_name() {
        assert!(parse_legacy_line("// property Number").is_err());
    }

    #[test]
    fn test_source_scan_skips_malformed() {
        let source = "\
// A guard that chases intruders.
// property Number speed 5
// property Quaternion spin
// property Boolean isHappy true
export function onTick() {}
";
        let defs = parse_legacy_props(source);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].variable_name, "speed");
        assert_eq!(defs[1].variable_name, "isHappy");
    }

    #[test]
    fn test_source_scan_ignores_ordinary_comments() {
        assert!(parse_legacy_props("// just a comment\nlet x = 1;").is_empty());
    }
}
