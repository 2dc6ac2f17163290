//! Property assignment codec - between typed values and the JSON slot.

use serde_json::Value;
use uuid::Uuid;

use super::{PropDef, PropType, PropValue};
use crate::error::StoreError;
use crate::model::{ActorId, PropertyAssignment};

/// Encode a typed value into its serialized JSON form.
pub fn encode(value: &PropValue) -> Value {
    match value {
        PropValue::Number(n) => serde_json::json!(n),
        PropValue::Text(s) => Value::String(s.clone()),
        PropValue::Flag(b) => Value::Bool(*b),
        PropValue::ActorRef(id) => Value::String(id.to_string()),
        PropValue::EnumVal(s) => Value::String(s.clone()),
    }
}

/// Strictly decode a JSON slot against a type tag.
///
/// Fails with `TypeMismatch` when the JSON shape disagrees with the tag -
/// the stale-assignment guard. `property` only feeds the error message.
pub fn decode(tag: PropType, property: &str, value: &Value) -> Result<PropValue, StoreError> {
    let mismatch = || StoreError::TypeMismatch {
        property: property.to_string(),
        expected: tag,
        found: json_kind(value).to_string(),
    };
    match tag {
        PropType::Number => value.as_f64().map(PropValue::Number).ok_or_else(mismatch),
        PropType::Text => value
            .as_str()
            .map(|s| PropValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        PropType::Flag => value.as_bool().map(PropValue::Flag).ok_or_else(mismatch),
        PropType::ActorRef => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|u| PropValue::ActorRef(ActorId(u)))
            .ok_or_else(mismatch),
        PropType::EnumVal => value
            .as_str()
            .map(|s| PropValue::EnumVal(s.to_string()))
            .ok_or_else(mismatch),
    }
}

/// The type-specific zero value.
pub fn zero_value(tag: PropType) -> PropValue {
    match tag {
        PropType::Number => PropValue::Number(0.0),
        PropType::Text => PropValue::Text(String::new()),
        PropType::Flag => PropValue::Flag(false),
        PropType::ActorRef => PropValue::ActorRef(ActorId::nil()),
        PropType::EnumVal => PropValue::EnumVal(String::new()),
    }
}

/// Parse a declaration's textual default per the type tag, falling back to
/// the zero value when absent or unparseable.
pub fn parse_default(tag: PropType, default_value: Option<&str>) -> PropValue {
    let Some(text) = default_value else {
        return zero_value(tag);
    };
    match tag {
        PropType::Number => text
            .parse::<f64>()
            .map(PropValue::Number)
            .unwrap_or_else(|_| zero_value(tag)),
        PropType::Text => PropValue::Text(text.to_string()),
        PropType::Flag => text
            .parse::<bool>()
            .map(PropValue::Flag)
            .unwrap_or_else(|_| zero_value(tag)),
        PropType::ActorRef => Uuid::parse_str(text)
            .map(|u| PropValue::ActorRef(ActorId(u)))
            .unwrap_or_else(|_| zero_value(tag)),
        PropType::EnumVal => PropValue::EnumVal(text.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A declaration paired with its current raw slot value for one use.
///
/// Built from a [`PropDef`] and the use's matching assignment, if any. The
/// slot keeps whatever JSON the assignment carried, so a stale value written
/// under an older declaration survives untouched until
/// [`assert_valid`](PropSlot::assert_valid) is asked about it.
#[derive(Debug, Clone)]
pub struct PropSlot {
    pub def: PropDef,
    value: Value,
}

impl PropSlot {
    /// Build a slot from a declaration and an optional existing assignment.
    /// With no assignment, the declaration's default is parsed and encoded.
    pub fn new(def: PropDef, assignment: Option<&PropertyAssignment>) -> Self {
        let value = match assignment {
            Some(a) => a.value.clone(),
            None => encode(&parse_default(def.prop_type, def.default_value.as_deref())),
        };
        Self { def, value }
    }

    /// The raw JSON slot.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// The typed value. Lenient: a slot that does not decode under the
    /// declared tag yields the declaration's default instead.
    pub fn value(&self) -> PropValue {
        decode(self.def.prop_type, &self.def.variable_name, &self.value)
            .unwrap_or_else(|_| parse_default(self.def.prop_type, self.def.default_value.as_deref()))
    }

    /// Fail with `TypeMismatch` if the slot's JSON shape disagrees with the
    /// declared type tag.
    pub fn assert_valid(&self) -> Result<(), StoreError> {
        decode(self.def.prop_type, &self.def.variable_name, &self.value).map(|_| ())
    }

    /// Write a new value. Returns the assignment to persist, or `None` when
    /// the new value equals the current one (no store write, no undo entry).
    pub fn set(&mut self, new_value: PropValue) -> Option<PropertyAssignment> {
        if self.value() == new_value {
            return None;
        }
        self.value = encode(&new_value);
        Some(PropertyAssignment::new(
            self.def.variable_name.clone(),
            self.value.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tags() -> [PropType; 5] {
        [
            PropType::Number,
            PropType::Text,
            PropType::Flag,
            PropType::ActorRef,
            PropType::EnumVal,
        ]
    }

    fn sample(tag: PropType) -> PropValue {
        match tag {
            PropType::Number => PropValue::Number(12.5),
            PropType::Text => PropValue::Text("nickname".to_string()),
            PropType::Flag => PropValue::Flag(true),
            PropType::ActorRef => PropValue::ActorRef(ActorId::new()),
            PropType::EnumVal => PropValue::EnumVal("angry".to_string()),
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for tag in all_tags() {
            let original = sample(tag);
            let decoded = decode(tag, "p", &encode(&original)).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_decode_wrong_shape_is_type_mismatch() {
        let err = decode(PropType::Number, "speed", &encode(&PropValue::Flag(true))).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: PropType::Number, .. }
        ));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            parse_default(PropType::Number, Some("3.5")),
            PropValue::Number(3.5)
        );
        assert_eq!(
            parse_default(PropType::Flag, Some("true")),
            PropValue::Flag(true)
        );
        // Unparseable falls back to the zero value.
        assert_eq!(
            parse_default(PropType::Number, Some("fast")),
            PropValue::Number(0.0)
        );
        assert_eq!(parse_default(PropType::Text, None), PropValue::Text(String::new()));
        assert_eq!(
            parse_default(PropType::ActorRef, None),
            PropValue::ActorRef(ActorId::nil())
        );
    }

    #[test]
    fn test_slot_uses_assignment_over_default() {
        let def = PropDef::new(PropType::Number, "speed").with_default("1");
        let assignment = PropertyAssignment::new("speed", serde_json::json!(9.0));

        let slot = PropSlot::new(def.clone(), Some(&assignment));
        assert_eq!(slot.value(), PropValue::Number(9.0));

        let slot = PropSlot::new(def, None);
        assert_eq!(slot.value(), PropValue::Number(1.0));
    }

    #[test]
    fn test_stale_assignment_fails_validation() {
        // Value written while the declaration said Number; the declaration
        // has since changed to String.
        let stale = PropertyAssignment::new("speed", encode(&PropValue::Number(5.0)));
        let slot = PropSlot::new(PropDef::new(PropType::Text, "speed"), Some(&stale));

        let err = slot.assert_valid().unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
        // The lenient read falls back to the default rather than crashing.
        assert_eq!(slot.value(), PropValue::Text(String::new()));
    }

    #[test]
    fn test_set_skips_equal_values() {
        let def = PropDef::new(PropType::Number, "speed").with_default("4");
        let mut slot = PropSlot::new(def, None);

        assert!(slot.set(PropValue::Number(4.0)).is_none());

        let assignment = slot.set(PropValue::Number(8.0)).unwrap();
        assert_eq!(assignment.property_name, "speed");
        assert_eq!(assignment.value, serde_json::json!(8.0));
    }
}
