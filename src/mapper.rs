//! Host type to schema type mapping.
//!
//! Legal property types are:
//! - primitives: bool, int, float and string (and named types over them)
//! - `interface{}`, mapped to any
//! - other structs, emitted by reference
//! - resources, assets and archives, emitted by reference
//! - pointers to any of the above
//! - slices and arrays of the above
//! - maps with string keys and any of the above as values

use tracing::trace;

use crate::classify::Classifier;
use crate::error::MapError;
use crate::graph::{BasicKind, HostType, NamedType};
use crate::options::PropertyOptions;
use crate::types::{qualified_name, ScalarType, TypeDescriptor};

/// Maps field types of one package into schema types.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    package_name: &'a str,
    classifier: Classifier<'a>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(package_name: &'a str, classifier: Classifier<'a>) -> Self {
        Self {
            package_name,
            classifier,
        }
    }

    /// Map a host type into a schema type.
    ///
    /// Struct types are never expanded in place; they become references that
    /// are expected to be registered by the top-level traversal. Whether the
    /// target exists is not checked here.
    pub fn map(&self, ty: &HostType, opts: &PropertyOptions) -> Result<TypeDescriptor, MapError> {
        match ty {
            HostType::Basic { name } => map_basic(*name),
            HostType::Interface { methods } if methods.is_empty() => Ok(TypeDescriptor::Any),
            HostType::Named(named) => self.map_named(named, opts),
            // Pointers only mark optionality, which the options already carry.
            HostType::Pointer { elem } => self.map(elem, opts),
            HostType::Map { key, value } => {
                if !is_string_key(key) {
                    return Err(MapError::NonStringMapKey {
                        key: key.to_string(),
                    });
                }
                let value = self.map(value, &PropertyOptions::default())?;
                Ok(TypeDescriptor::dict(value))
            }
            HostType::Slice { elem } | HostType::Array { elem, .. } => {
                let element = self.map(elem, &PropertyOptions::default())?;
                Ok(TypeDescriptor::list(element))
            }
            HostType::Interface { .. }
            | HostType::Struct { .. }
            | HostType::Chan { .. }
            | HostType::Func
            | HostType::Other { .. } => Err(MapError::UnrecognizedFieldType {
                ty: ty.to_string(),
            }),
        }
    }

    fn map_named(&self, named: &NamedType, opts: &PropertyOptions) -> Result<TypeDescriptor, MapError> {
        // Resources, assets and archives are always used by reference,
        // whatever their underlying shape.
        if self.classifier.is_entity(named) {
            let target = self.reference_target(named, opts);
            trace!(entity = %named, %target, "referencing entity");
            return Ok(TypeDescriptor::Reference(target));
        }

        match named.underlying.as_ref() {
            underlying @ (HostType::Basic { .. } | HostType::Interface { .. }) => {
                self.map(underlying, opts)
            }
            HostType::Struct { .. } => {
                let target = self.reference_target(named, opts);
                trace!(ty = %named, %target, "referencing struct");
                Ok(TypeDescriptor::Reference(target))
            }
            other => Err(MapError::UnrecognizedFieldType {
                ty: format!("{} (underlying {})", named, other.shape_name()),
            }),
        }
    }

    /// The explicit `ref=` override, else the computed qualified name.
    fn reference_target(&self, named: &NamedType, opts: &PropertyOptions) -> String {
        if opts.reference.is_empty() {
            qualified_name(self.package_name, &named.name)
        } else {
            opts.reference.clone()
        }
    }
}

fn map_basic(kind: BasicKind) -> Result<TypeDescriptor, MapError> {
    let scalar = match kind {
        BasicKind::Bool => ScalarType::Boolean,
        BasicKind::Int | BasicKind::Int16 | BasicKind::Int32 | BasicKind::Int64 => {
            ScalarType::Integer
        }
        BasicKind::Float32 | BasicKind::Float64 => ScalarType::Number,
        BasicKind::String => ScalarType::String,
        other => {
            return Err(MapError::UnsupportedPrimitive {
                kind: other.as_str().to_string(),
            })
        }
    };
    Ok(TypeDescriptor::Scalar(scalar))
}

/// Map keys must be strings or named types backed by a string.
fn is_string_key(key: &HostType) -> bool {
    match key {
        HostType::Basic { name } => *name == BasicKind::String,
        HostType::Named(named) => matches!(
            named.underlying.as_ref(),
            HostType::Basic {
                name: BasicKind::String
            }
        ),
        _ => false,
    }
}
