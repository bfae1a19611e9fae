//! Host type graph - the semantic model handed over by the source loader.
//!
//! The loader parses and type-checks a host package and serializes what it
//! found as JSON. This module is the typed view of that document: the
//! package-scope objects in declaration order (the semantic side) and the
//! per-file declaration nodes carrying documentation and positions (the
//! syntactic side).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A loaded host package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    /// Import path of the analyzed package.
    pub path: String,
    /// Package-scope objects in traversal order.
    #[serde(default)]
    pub objects: Vec<PackageObject>,
    /// Source files of the package with their declaration nodes.
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl TypeGraph {
    /// Find the declaration node for a package-scope type by name.
    pub fn declaration_node(&self, name: &str) -> Option<&DeclarationNode> {
        self.files
            .iter()
            .flat_map(|file| file.declarations.iter())
            .find(|node| node.name == name)
    }
}

/// Kind of a package-scope object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Type,
    Func,
    Var,
    Const,
}

/// A package-scope object: a type name, function, variable or constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(rename = "type")]
    pub ty: HostType,
}

impl PackageObject {
    /// Exported objects start with an uppercase letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    #[serde(default)]
    pub declarations: Vec<DeclarationNode>,
}

/// Syntactic information for one type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub position: Position,
}

/// Source location used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.file, self.line, self.column)
    }
}

/// Predeclared scalar kinds of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

impl BasicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
        }
    }
}

/// Shape of a host type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostType {
    Basic {
        name: BasicKind,
    },
    Named(NamedType),
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    Pointer {
        elem: Box<HostType>,
    },
    Map {
        key: Box<HostType>,
        value: Box<HostType>,
    },
    Slice {
        elem: Box<HostType>,
    },
    Array {
        len: u64,
        elem: Box<HostType>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<String>,
    },
    Chan {
        elem: Box<HostType>,
    },
    Func,
    Other {
        description: String,
    },
}

impl HostType {
    /// Short name of the shape, used when rejecting top-level declarations.
    pub fn shape_name(&self) -> &'static str {
        match self {
            HostType::Basic { .. } => "basic",
            HostType::Named(_) => "named",
            HostType::Struct { .. } => "struct",
            HostType::Pointer { .. } => "pointer",
            HostType::Map { .. } => "map",
            HostType::Slice { .. } => "slice",
            HostType::Array { .. } => "array",
            HostType::Interface { .. } => "interface",
            HostType::Chan { .. } => "chan",
            HostType::Func => "func",
            HostType::Other { .. } => "other",
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, HostType::Pointer { .. })
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Basic { name } => f.write_str(name.as_str()),
            HostType::Named(named) => write!(f, "{}", named),
            HostType::Struct { fields } => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.anonymous {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                f.write_str("}")
            }
            HostType::Pointer { elem } => write!(f, "*{}", elem),
            HostType::Map { key, value } => write!(f, "map[{}]{}", key, value),
            HostType::Slice { elem } => write!(f, "[]{}", elem),
            HostType::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            HostType::Interface { methods } if methods.is_empty() => f.write_str("interface{}"),
            HostType::Interface { methods } => write!(f, "interface{{{}}}", methods.join("; ")),
            HostType::Chan { elem } => write!(f, "chan {}", elem),
            HostType::Func => f.write_str("func"),
            HostType::Other { description } => f.write_str(description),
        }
    }
}

/// A defined (named) type together with its underlying shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedType {
    pub name: String,
    /// Defining package path; empty for predeclared types such as `error`.
    #[serde(default)]
    pub package: String,
    pub underlying: Box<HostType>,
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Embedded fields carry no name of their own in the host source.
    #[serde(default)]
    pub anonymous: bool,
    #[serde(rename = "type")]
    pub ty: HostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}
