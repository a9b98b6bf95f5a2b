//! Shape declarations the host reads before invoking a data source or function.
//!
//! Values crossing the host boundary are plain [`serde_json::Value`]s; the
//! declarations here describe which values are acceptable.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::Diagnostics;

/// Type of an attribute, parameter, or return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    String,
    List(Box<AttrType>),
    Object(BTreeMap<String, AttrType>),
}

impl AttrType {
    pub fn list_of(element: AttrType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrType)>,
        K: Into<String>,
    {
        Self::Object(
            attributes
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    /// Whether `value` is a known, non-null value of this type.
    ///
    /// Objects must carry exactly the declared attributes.
    pub fn conforms(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::List(element), Value::Array(items)) => {
                items.iter().all(|item| element.conforms(item))
            }
            (Self::Object(attributes), Value::Object(fields)) => {
                attributes.len() == fields.len()
                    && attributes.iter().all(|(name, ty)| {
                        fields.get(name).is_some_and(|field| ty.conforms(field))
                    })
            }
            _ => false,
        }
    }

    /// Human-readable name used in error messages.
    pub fn friendly_name(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::List(element) => format!("list of {}", element.friendly_name()),
            Self::Object(attributes) => {
                let names: Vec<&str> = attributes.keys().map(String::as_str).collect();
                format!("object({})", names.join(", "))
            }
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// The configuration must set it.
    Required,
    /// The configuration may set it.
    Optional,
    /// Only the data source sets it.
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub description: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    pub mode: AttributeMode,
}

impl Attribute {
    pub fn required(attr_type: AttrType, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attr_type,
            mode: AttributeMode::Required,
        }
    }

    pub fn computed(attr_type: AttrType, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attr_type,
            mode: AttributeMode::Computed,
        }
    }
}

/// Schema of a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Check a configuration object the way the host would before a read.
    pub fn validate_config(&self, config: &Value) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let Some(fields) = config.as_object() else {
            diagnostics.add_error(
                "Invalid configuration",
                "Data source configuration must be an object.",
            );
            return diagnostics;
        };

        for name in fields.keys() {
            if !self.attributes.contains_key(name) {
                diagnostics.add_attribute_error(
                    name,
                    "Unsupported argument",
                    format!("An argument named \"{name}\" is not expected here."),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            let value = fields.get(name).filter(|v| !v.is_null());
            match (attribute.mode, value) {
                (AttributeMode::Required, None) => diagnostics.add_attribute_error(
                    name,
                    "Missing required argument",
                    format!("The argument \"{name}\" is required, but no definition was found."),
                ),
                (AttributeMode::Computed, Some(_)) => diagnostics.add_attribute_error(
                    name,
                    "Invalid configuration",
                    format!("\"{name}\" is computed and cannot be set in configuration."),
                ),
                (_, Some(v)) if !attribute.attr_type.conforms(v) => {
                    diagnostics.add_attribute_error(
                        name,
                        "Incorrect attribute value type",
                        format!(
                            "Inappropriate value for attribute \"{name}\": {} required.",
                            attribute.attr_type.friendly_name()
                        ),
                    );
                }
                _ => {}
            }
        }

        diagnostics
    }
}

/// A positional function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
}

impl Parameter {
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            attr_type: AttrType::String,
        }
    }
}

/// Signature and documentation of a provider function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub return_type: AttrType,
}
