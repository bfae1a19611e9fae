//! Declaration classification: resources, markers and plain types.

use crate::graph::{HostType, NamedType};

/// Canonical path of the package defining the marker types.
pub const DEFAULT_MARKER_PACKAGE: &str = "github.com/pulumi/pulumi/sdk/v3/go/pulumi";

/// Well-known marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    Resource,
    Asset,
    Archive,
}

/// One marker: a declaration name in a package whose path ends with `package_suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub package_suffix: String,
    pub name: String,
    pub kind: SpecialKind,
}

impl Marker {
    pub fn new(package_suffix: impl Into<String>, name: impl Into<String>, kind: SpecialKind) -> Self {
        Self {
            package_suffix: package_suffix.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Static table of marker declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTable {
    markers: Vec<Marker>,
}

impl MarkerTable {
    pub fn new(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::new(vec![
            Marker::new(DEFAULT_MARKER_PACKAGE, "ResourceState", SpecialKind::Resource),
            Marker::new(DEFAULT_MARKER_PACKAGE, "Asset", SpecialKind::Asset),
            Marker::new(DEFAULT_MARKER_PACKAGE, "Archive", SpecialKind::Archive),
        ])
    }
}

/// True when `package` is `suffix` or a relocated copy of it (e.g. vendored).
pub fn package_matches(package: &str, suffix: &str) -> bool {
    package.ends_with(suffix)
}

/// Decides what a declaration is, using a marker table.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    markers: &'a MarkerTable,
}

impl<'a> Classifier<'a> {
    pub fn new(markers: &'a MarkerTable) -> Self {
        Self { markers }
    }

    /// Returns the marker kind of a declaration, if it is one.
    pub fn special_kind(&self, decl: &NamedType) -> Option<SpecialKind> {
        self.markers
            .markers()
            .iter()
            .find(|m| m.name == decl.name && package_matches(&decl.package, &m.package_suffix))
            .map(|m| m.kind)
    }

    pub fn is_special(&self, decl: &NamedType) -> bool {
        self.special_kind(decl).is_some()
    }

    fn is_resource_marker(&self, decl: &NamedType) -> bool {
        self.special_kind(decl) == Some(SpecialKind::Resource)
    }

    /// A declaration is a resource if it is the resource marker or directly
    /// embeds it. Only one level of embedding is inspected.
    pub fn is_resource(&self, decl: &NamedType) -> bool {
        if self.is_resource_marker(decl) {
            return true;
        }

        let HostType::Struct { fields } = decl.underlying.as_ref() else {
            return false;
        };
        fields.iter().filter(|f| f.anonymous).any(|f| match &f.ty {
            HostType::Named(embedded) => self.is_resource_marker(embedded),
            _ => false,
        })
    }

    /// Entities may be used by reference: resources, assets and archives.
    pub fn is_entity(&self, decl: &NamedType) -> bool {
        self.is_resource(decl) || self.is_special(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BasicKind, Field};

    fn named(package: &str, name: &str, underlying: HostType) -> NamedType {
        NamedType {
            name: name.into(),
            package: package.into(),
            underlying: Box::new(underlying),
        }
    }

    fn marker(name: &str) -> NamedType {
        named(DEFAULT_MARKER_PACKAGE, name, HostType::Struct { fields: vec![] })
    }

    fn embed(ty: NamedType) -> Field {
        Field {
            name: ty.name.clone(),
            anonymous: true,
            ty: HostType::Named(ty),
            tag: None,
            doc: None,
            position: None,
        }
    }

    fn plain(name: &str) -> Field {
        Field {
            name: name.into(),
            anonymous: false,
            ty: HostType::Basic {
                name: BasicKind::String,
            },
            tag: Some(format!(r#"pulumi:"{}""#, name)),
            doc: None,
            position: None,
        }
    }

    fn strukt(name: &str, fields: Vec<Field>) -> NamedType {
        named("example.com/widgets", name, HostType::Struct { fields })
    }

    #[test]
    fn package_suffix_match() {
        assert!(package_matches("a/b/c", "a/b/c"));
        assert!(package_matches("vendor/a/b/c", "a/b/c"));
        assert!(!package_matches("a/b/c/d", "a/b/c"));
        assert!(!package_matches("b/c", "a/b/c"));
    }

    #[test]
    fn special_kinds() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        assert_eq!(
            classifier.special_kind(&marker("ResourceState")),
            Some(SpecialKind::Resource)
        );
        assert_eq!(classifier.special_kind(&marker("Asset")), Some(SpecialKind::Asset));
        assert_eq!(
            classifier.special_kind(&marker("Archive")),
            Some(SpecialKind::Archive)
        );
        assert_eq!(classifier.special_kind(&marker("Context")), None);
        assert_eq!(
            classifier.special_kind(&strukt("ResourceState", vec![])),
            None
        );
    }

    #[test]
    fn vendored_marker_is_special() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);
        let vendored = named(
            &format!("example.com/widgets/vendor/{}", DEFAULT_MARKER_PACKAGE),
            "ResourceState",
            HostType::Struct { fields: vec![] },
        );
        assert!(classifier.is_resource(&vendored));
    }

    #[test]
    fn embedding_marker_makes_resource() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        let widget = strukt("Widget", vec![embed(marker("ResourceState")), plain("name")]);
        assert!(classifier.is_resource(&widget));
        assert!(classifier.is_entity(&widget));
        assert!(!classifier.is_special(&widget));
    }

    #[test]
    fn named_marker_field_is_not_embedding() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        let mut field = embed(marker("ResourceState"));
        field.anonymous = false;
        let widget = strukt("Widget", vec![field]);
        assert!(!classifier.is_resource(&widget));
    }

    #[test]
    fn embedding_other_marker_is_not_resource() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        let bundle = strukt("Bundle", vec![embed(marker("Asset"))]);
        assert!(!classifier.is_resource(&bundle));
        assert!(!classifier.is_entity(&bundle));
        assert!(classifier.is_entity(&marker("Archive")));
    }

    #[test]
    fn transitive_embedding_is_not_detected() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        let base = strukt("Base", vec![embed(marker("ResourceState"))]);
        let derived = strukt("Derived", vec![embed(base)]);
        assert!(!classifier.is_resource(&derived));
    }

    #[test]
    fn embedded_pointer_to_marker_is_not_detected() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);

        let mut field = embed(marker("ResourceState"));
        field.ty = HostType::Pointer {
            elem: Box::new(field.ty),
        };
        assert!(!classifier.is_resource(&strukt("Widget", vec![field])));
    }

    #[test]
    fn plain_struct_is_not_resource() {
        let table = MarkerTable::default();
        let classifier = Classifier::new(&table);
        assert!(!classifier.is_resource(&strukt("Point", vec![plain("x"), plain("y")])));
    }

    #[test]
    fn custom_marker_table() {
        let table = MarkerTable::new(vec![Marker::new(
            "example.com/sdk",
            "Component",
            SpecialKind::Resource,
        )]);
        let classifier = Classifier::new(&table);

        let component = named("example.com/sdk", "Component", HostType::Struct { fields: vec![] });
        let widget = strukt("Widget", vec![embed(component)]);
        assert!(classifier.is_resource(&widget));
        assert!(!classifier.is_special(&marker("ResourceState")));
    }
}
