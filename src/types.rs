//! Output schema model and its JSON encoding.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Type token the packaging system uses for untyped values.
pub const ANY_TYPE_TOKEN: &str = "pulumi:pulumi:Any";

/// Object spec `type` value.
const OBJECT_TYPE: &str = "object";

/// Scalar schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Integer,
    Number,
    String,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::String => "string",
        }
    }
}

/// Schema type of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Scalar(ScalarType),
    Any,
    List(Box<TypeDescriptor>),
    /// String-keyed open-ended object.
    Dict(Box<TypeDescriptor>),
    /// Reference to a type by qualified name.
    Reference(String),
}

impl TypeDescriptor {
    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn dict(value: TypeDescriptor) -> Self {
        TypeDescriptor::Dict(Box::new(value))
    }
}

/// Lists encode as `{"additionalProperties": T}` without a `type`; the
/// consumer of the document depends on this shape.
impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            TypeDescriptor::Scalar(scalar) => map.serialize_entry("type", scalar.as_str())?,
            TypeDescriptor::Any => map.serialize_entry("type", ANY_TYPE_TOKEN)?,
            TypeDescriptor::List(element) => {
                map.serialize_entry("additionalProperties", element.as_ref())?
            }
            TypeDescriptor::Dict(value) => {
                map.serialize_entry("type", OBJECT_TYPE)?;
                map.serialize_entry("additionalProperties", value.as_ref())?;
            }
            TypeDescriptor::Reference(name) => {
                map.serialize_entry("$ref", &format!("#/types/{}", name))?
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    #[serde(flatten)]
    pub ty: TypeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shared shape of resources and complex types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectTypeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(rename = "type")]
    pub ty: &'static str,
}

impl ObjectTypeSpec {
    pub fn new(description: Option<String>, properties: BTreeMap<String, PropertySpec>) -> Self {
        Self {
            description,
            properties,
            ty: OBJECT_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSpec {
    #[serde(flatten)]
    pub object: ObjectTypeSpec,
    #[serde(rename = "isComponent")]
    pub is_component: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexTypeSpec {
    #[serde(flatten)]
    pub object: ObjectTypeSpec,
}

/// The assembled document, keyed by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSchema {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, ComplexTypeSpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, ResourceSpec>,
}

/// Qualified name of a declaration within a package: `<pkg>:index:<Name>`.
///
/// Anything up to the last `.` is treated as a package qualifier and dropped.
pub fn qualified_name(package_name: &str, declaration: &str) -> String {
    let simple = declaration
        .rsplit_once('.')
        .map_or(declaration, |(_, name)| name);
    format!("{}:index:{}", package_name, simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn scalar_encoding() {
        assert_eq!(
            encode(&TypeDescriptor::Scalar(ScalarType::Boolean)),
            json!({"type": "boolean"})
        );
        assert_eq!(
            encode(&TypeDescriptor::Scalar(ScalarType::Number)),
            json!({"type": "number"})
        );
        assert_eq!(encode(&TypeDescriptor::Any), json!({"type": ANY_TYPE_TOKEN}));
    }

    #[test]
    fn container_encoding() {
        let string = TypeDescriptor::Scalar(ScalarType::String);
        assert_eq!(
            encode(&TypeDescriptor::dict(string.clone())),
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
        assert_eq!(
            encode(&TypeDescriptor::list(string)),
            json!({"additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn reference_encoding() {
        assert_eq!(
            encode(&TypeDescriptor::Reference("demo:index:Other".into())),
            json!({"$ref": "#/types/demo:index:Other"})
        );
    }

    #[test]
    fn property_flattens_type() {
        let prop = PropertySpec {
            ty: TypeDescriptor::Scalar(ScalarType::Integer),
            description: Some("How many.".into()),
        };
        assert_eq!(
            serde_json::to_string(&prop).unwrap(),
            r#"{"type":"integer","description":"How many."}"#
        );
    }

    #[test]
    fn resource_encoding() {
        let mut properties = BTreeMap::new();
        properties.insert(
            "name".to_string(),
            PropertySpec {
                ty: TypeDescriptor::Scalar(ScalarType::String),
                description: None,
            },
        );
        let resource = ResourceSpec {
            object: ObjectTypeSpec::new(None, properties),
            is_component: true,
        };
        assert_eq!(
            serde_json::to_string(&resource).unwrap(),
            r#"{"properties":{"name":{"type":"string"}},"type":"object","isComponent":true}"#
        );
    }

    #[test]
    fn empty_schema_omits_maps() {
        let schema = PackageSchema {
            name: "demo".into(),
            types: BTreeMap::new(),
            resources: BTreeMap::new(),
        };
        assert_eq!(serde_json::to_string(&schema).unwrap(), r#"{"name":"demo"}"#);
    }

    #[test]
    fn qualified_names() {
        assert_eq!(qualified_name("demo", "Widget"), "demo:index:Widget");
        assert_eq!(
            qualified_name("demo", "example.com/widgets.Widget"),
            "demo:index:Widget"
        );
    }
}
