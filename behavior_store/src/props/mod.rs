//! Property declarations and typed values.

mod codec;
mod legacy;

pub use codec::*;
pub use legacy::*;

use serde::{Deserialize, Serialize};

use crate::model::ActorId;

/// The closed set of property type tags a behavior may declare.
///
/// Serialized under the script-facing names (`Number`, `String`, ...), which
/// is also what the legacy comment syntax uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropType {
    Number,
    #[serde(rename = "String")]
    Text,
    #[serde(rename = "Boolean")]
    Flag,
    #[serde(rename = "Actor")]
    ActorRef,
    #[serde(rename = "Enum")]
    EnumVal,
}

impl PropType {
    /// The script-facing name of the tag.
    pub fn name(&self) -> &'static str {
        match self {
            PropType::Number => "Number",
            PropType::Text => "String",
            PropType::Flag => "Boolean",
            PropType::ActorRef => "Actor",
            PropType::EnumVal => "Enum",
        }
    }

    /// Parse a script-facing type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Number" => Some(PropType::Number),
            "String" => Some(PropType::Text),
            "Boolean" => Some(PropType::Flag),
            "Actor" => Some(PropType::ActorRef),
            "Enum" => Some(PropType::EnumVal),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed in-memory property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Text(String),
    Flag(bool),
    ActorRef(ActorId),
    EnumVal(String),
}

impl PropValue {
    /// The type tag this value belongs to.
    pub fn prop_type(&self) -> PropType {
        match self {
            PropValue::Number(_) => PropType::Number,
            PropValue::Text(_) => PropType::Text,
            PropValue::Flag(_) => PropType::Flag,
            PropValue::ActorRef(_) => PropType::ActorRef,
            PropValue::EnumVal(_) => PropType::EnumVal,
        }
    }
}

/// One allowed value of an enum-typed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumAllowedValue {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Visibility requirement on a property: shown/required only while a sibling
/// property holds a particular value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDefRequirement {
    pub property_name: String,
    pub equals: serde_json::Value,
}

/// A property declaration belonging to a behavior.
///
/// Not persisted as its own entity - derived by parsing the behavior's
/// source (legacy comment syntax) or delivered as data by the running script
/// (structured declarations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDef {
    #[serde(rename = "type")]
    pub prop_type: PropType,
    pub variable_name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Textual default, parsed per the type tag when no assignment exists.
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub allow_offstage_actors: bool,
    #[serde(default)]
    pub picker_prompt: Option<String>,
    #[serde(default)]
    pub requires: Vec<PropDefRequirement>,
    #[serde(default)]
    pub allowed_values: Vec<EnumAllowedValue>,
}

impl PropDef {
    /// Create a minimal declaration with just a type and variable name.
    pub fn new(prop_type: PropType, variable_name: impl Into<String>) -> Self {
        Self {
            prop_type,
            variable_name: variable_name.into(),
            label: None,
            comment: None,
            default_value: None,
            allow_offstage_actors: false,
            picker_prompt: None,
            requires: Vec::new(),
            allowed_values: Vec::new(),
        }
    }

    /// Set the textual default value.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label to show in editors, falling back to the variable name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.variable_name)
    }
}
