//! Schema assembly - walks a package's declarations and builds the schema.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::classify::{Classifier, MarkerTable};
use crate::error::{GenerateError, TagViolation};
use crate::graph::{DeclarationNode, Field, HostType, NamedType, ObjectKind, TypeGraph};
use crate::mapper::TypeMapper;
use crate::options::{parse_property_options, PropertyOptions, DEFAULT_TAG_KEY};
use crate::types::{
    qualified_name, ComplexTypeSpec, ObjectTypeSpec, PackageSchema, PropertySpec, ResourceSpec,
};

/// Options for schema generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the emitted schema package.
    pub package_name: String,
    /// Struct-tag key holding property annotations.
    pub tag_key: String,
    /// Marker declarations recognized as resources, assets and archives.
    pub markers: MarkerTable,
}

impl GenerateOptions {
    /// Create options with the default annotation key and marker table.
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
            markers: MarkerTable::default(),
        }
    }

    /// Set the struct-tag key holding property annotations.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Replace the marker table.
    pub fn markers(mut self, markers: MarkerTable) -> Self {
        self.markers = markers;
        self
    }
}

/// Declarations gathered during one run, keyed by simple name.
#[derive(Debug, Default)]
pub struct Registry {
    resources: BTreeMap<String, ResourceSpec>,
    types: BTreeMap<String, ComplexTypeSpec>,
}

impl Registry {
    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name) || self.types.contains_key(name)
    }

    pub fn resources(&self) -> &BTreeMap<String, ResourceSpec> {
        &self.resources
    }

    pub fn types(&self) -> &BTreeMap<String, ComplexTypeSpec> {
        &self.types
    }

    /// Register a resource. Returns false if the name was already taken.
    pub fn insert_resource(&mut self, name: &str, spec: ResourceSpec) -> bool {
        if self.contains(name) {
            return false;
        }
        self.resources.insert(name.to_string(), spec);
        true
    }

    /// Register a complex type. Returns false if the name was already taken.
    pub fn insert_type(&mut self, name: &str, spec: ComplexTypeSpec) -> bool {
        if self.contains(name) {
            return false;
        }
        self.types.insert(name.to_string(), spec);
        true
    }

    /// Finish the run, qualifying every registered name.
    pub fn into_schema(self, package_name: &str) -> PackageSchema {
        PackageSchema {
            name: package_name.to_string(),
            types: self
                .types
                .into_iter()
                .map(|(name, spec)| (qualified_name(package_name, &name), spec))
                .collect(),
            resources: self
                .resources
                .into_iter()
                .map(|(name, spec)| (qualified_name(package_name, &name), spec))
                .collect(),
        }
    }
}

/// Generate the package schema for a loaded type graph.
///
/// Fails on the first illegal declaration or property; no partial schema is
/// returned.
///
/// # Errors
///
/// Returns `GenerateError` describing the offending declaration or field.
pub fn generate(graph: &TypeGraph, options: &GenerateOptions) -> Result<PackageSchema, GenerateError> {
    let generator = Generator::new(graph, options);
    let mut registry = Registry::default();
    generator.gather_package(&mut registry)?;

    debug!(
        package = %options.package_name,
        resources = registry.resources().len(),
        types = registry.types().len(),
        "assembled package schema"
    );
    Ok(registry.into_schema(&options.package_name))
}

/// Per-run traversal state that never changes while walking.
pub struct Generator<'a> {
    graph: &'a TypeGraph,
    options: &'a GenerateOptions,
    classifier: Classifier<'a>,
    mapper: TypeMapper<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(graph: &'a TypeGraph, options: &'a GenerateOptions) -> Self {
        let classifier = Classifier::new(&options.markers);
        Self {
            graph,
            options,
            classifier,
            mapper: TypeMapper::new(&options.package_name, classifier),
        }
    }

    /// Visit every exported package-scope type in declaration order.
    pub fn gather_package(&self, registry: &mut Registry) -> Result<(), GenerateError> {
        for object in &self.graph.objects {
            if object.kind != ObjectKind::Type {
                continue;
            }
            if !object.is_exported() {
                trace!(name = %object.name, "skipping unexported type");
                continue;
            }
            self.gather_type(&object.name, &object.ty, registry)?;
        }
        Ok(())
    }

    /// Visit one top-level type declaration.
    pub fn gather_type(
        &self,
        name: &str,
        ty: &HostType,
        registry: &mut Registry,
    ) -> Result<(), GenerateError> {
        let node = self
            .graph
            .declaration_node(name)
            .ok_or_else(|| GenerateError::DeclarationNotFound {
                name: name.to_string(),
            })?;

        let named = match ty {
            HostType::Named(named) => named,
            other => return Err(illegal_top_level(node, other)),
        };
        // Enum-like primitive aliases and bare container aliases are not supported yet.
        match named.underlying.as_ref() {
            HostType::Struct { fields } => self.gather_struct(node, named, fields, registry),
            other => Err(illegal_top_level(node, other)),
        }
    }

    fn gather_struct(
        &self,
        node: &DeclarationNode,
        named: &NamedType,
        fields: &[Field],
        registry: &mut Registry,
    ) -> Result<(), GenerateError> {
        let name = named.name.as_str();
        if registry.contains(name) {
            trace!(name, "already registered");
            return Ok(());
        }
        if self.classifier.is_special(named) {
            trace!(name, "skipping marker declaration");
            return Ok(());
        }

        let is_resource = self.classifier.is_resource(named);
        let properties = self.gather_properties(node, named, fields, is_resource)?;
        let object = ObjectTypeSpec::new(trim_doc(node.doc.as_deref()), properties);

        if is_resource {
            debug!(name, properties = object.properties.len(), "registering resource");
            registry.insert_resource(
                name,
                ResourceSpec {
                    object,
                    is_component: true,
                },
            );
        } else if !object.properties.is_empty() {
            debug!(name, properties = object.properties.len(), "registering type");
            registry.insert_type(name, ComplexTypeSpec { object });
        } else {
            debug!(name, "no annotated properties, skipping");
        }
        Ok(())
    }

    fn gather_properties(
        &self,
        node: &DeclarationNode,
        named: &NamedType,
        fields: &[Field],
        is_resource: bool,
    ) -> Result<BTreeMap<String, PropertySpec>, GenerateError> {
        let mut properties = BTreeMap::new();
        for field in fields {
            let Some(opts) = field
                .tag
                .as_deref()
                .and_then(|tag| parse_property_options(tag, &self.options.tag_key))
            else {
                continue;
            };

            let position = field.position.clone().unwrap_or_else(|| node.position.clone());
            if let Some(violation) = check_options(&opts, field, is_resource) {
                return Err(GenerateError::Tag {
                    position,
                    declaration: named.name.clone(),
                    field: field.name.clone(),
                    violation,
                });
            }

            // Optionality is validated above but does not yet feed a required list.
            let ty = self
                .mapper
                .map(&field.ty, &opts)
                .map_err(|source| GenerateError::TypeMapping {
                    position,
                    declaration: named.name.clone(),
                    field: field.name.clone(),
                    source,
                })?;

            let spec = PropertySpec {
                ty,
                description: trim_doc(field.doc.as_deref()),
            };
            match properties.entry(opts.name) {
                Entry::Vacant(entry) => {
                    entry.insert(spec);
                }
                Entry::Occupied(mut entry) => {
                    warn!(
                        declaration = %named.name,
                        property = %entry.key(),
                        "duplicate property name, last field wins"
                    );
                    entry.insert(spec);
                }
            }
        }
        Ok(properties)
    }
}

/// Check annotation flags against the field's context.
fn check_options(opts: &PropertyOptions, field: &Field, is_resource: bool) -> Option<TagViolation> {
    if opts.name.is_empty() {
        Some(TagViolation::MissingName)
    } else if opts.output && !is_resource {
        Some(TagViolation::OutOnNonResource)
    } else if opts.replaces && !is_resource {
        Some(TagViolation::ReplacesOnNonResource)
    } else if opts.optional && !field.ty.is_pointer() {
        Some(TagViolation::OptionalOnNonPointer)
    } else {
        None
    }
}

fn illegal_top_level(node: &DeclarationNode, ty: &HostType) -> GenerateError {
    GenerateError::IllegalTopLevelKind {
        position: node.position.clone(),
        name: node.name.clone(),
        kind: ty.shape_name(),
    }
}

/// Doc text without surrounding newlines; empty text counts as absent.
fn trim_doc(doc: Option<&str>) -> Option<String> {
    doc.map(|d| d.trim_matches('\n'))
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
