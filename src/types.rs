//! Statically-declared type descriptor tables.
//!
//! Instead of reflecting over live classes at documentation time, every documented type
//! is described once, at a build step, by a [`TypeDescriptor`] registered in a
//! [`TypeIndex`]. The descriptor captures exactly the metadata the generation run needs:
//! the serialized shape, the closed list of polymorphic subtypes, the declared class
//! hierarchy for doc-comment lookups, and per-member constraint and deprecation data.

use crate::constraints::ConstraintSpec;
use log::trace;
use std::collections::{HashMap, HashSet};

/// Scalar kinds a serialized value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Decimal,
    Boolean,
    /// Serialized as a JSON null (e.g. a unit/void marker type)
    Null,
    /// No fixed serialized kind (free-form / "any" values)
    Varies,
}

/// Reference to the value type of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// An inline scalar leaf, e.g. a plain string or numeric field
    Scalar(ScalarKind),
    /// A reference to a descriptor registered in the [`TypeIndex`], by qualified name
    Named(String),
    /// A collection with the given element type
    Array(Box<TypeRef>),
    /// A map/dictionary, documented as an opaque `Map` leaf
    Map,
}

/// The serialized shape of a registered type.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// An object with named properties, in declaration order
    Object(Vec<Property>),
    /// An enumeration; constants are stored in their serialized form,
    /// in declaration order
    Enum(Vec<String>),
    /// A type that serializes to a single scalar value (e.g. a locale or
    /// money amount with a custom serializer)
    Scalar(ScalarKind),
}

/// One serialized property of an object type.
///
/// Declaration order of the `Vec<Property>` in [`TypeShape::Object`] is the
/// serialization property order and therefore the documentation order.
#[derive(Debug, Clone)]
pub struct Property {
    /// Name of the property in the serialized output
    pub json_name: String,
    /// Name of the backing member: either a bare field name or a getter-style
    /// accessor name such as `getAge`/`isActive`
    pub member_name: String,
    /// Qualified name of the type that declares this member. Filled with the
    /// owning descriptor's name when left empty at construction time.
    pub declared_by: String,
    /// Value type; `None` models a property whose type could not be resolved,
    /// which is fatal for the generation call
    pub ty: Option<TypeRef>,
    /// Whether the serialization framework marks this property unconditionally
    /// required (wins over all other optionality signals)
    pub required: bool,
    /// Whether the backing member is a non-nullable primitive scalar
    pub primitive: bool,
    /// Whether recursive expansion is allowed; `false` models an explicit
    /// do-not-expand marker used to cap depth or break intentional cycles
    pub expand: bool,
    /// Whether a value serializer is absent for this property; such properties
    /// are silently omitted from the output
    pub opaque: bool,
}

impl Property {
    /// Creates a property with the given serialized name, member name and value type.
    pub fn new(json_name: &str, member_name: &str, ty: TypeRef) -> Self {
        Self {
            json_name: json_name.to_string(),
            member_name: member_name.to_string(),
            declared_by: String::new(),
            ty: Some(ty),
            required: false,
            primitive: false,
            expand: true,
            opaque: false,
        }
    }

    /// Creates a property without a resolvable type. Visiting it aborts the
    /// generation call with an explicit error naming the property.
    pub fn untyped(json_name: &str, member_name: &str) -> Self {
        Self {
            ty: None,
            ..Self::new(json_name, member_name, TypeRef::Map)
        }
    }

    /// Records the declaring type, for members inherited from a supertype.
    pub fn declared_by(mut self, qualified_name: &str) -> Self {
        self.declared_by = qualified_name.to_string();
        self
    }

    /// Marks the property as unconditionally required by the serialization framework.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the backing member as a non-nullable primitive scalar.
    pub fn primitive(mut self) -> Self {
        self.primitive = true;
        self
    }

    /// Suppresses recursive expansion of this property's children.
    pub fn without_expansion(mut self) -> Self {
        self.expand = false;
        self
    }

    /// Marks the property as having no resolvable value serializer.
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }
}

/// Build-time description of one documented type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Fully qualified name, e.g. `com.example.Item`
    pub qualified_name: String,
    /// Short display name used as the merge qualifier, e.g. `Item`
    pub display_name: String,
    /// The serialized shape
    pub shape: TypeShape,
    /// Closed list of concrete subtype qualified names for polymorphic fan-out
    pub subtypes: Vec<String>,
    /// Declared superclass, walked by method-level doc-comment lookups
    pub supertype: Option<String>,
    /// Declared interfaces, walked after the superclass chain
    pub interfaces: Vec<String>,
    /// Validation constraint metadata keyed by member name (bare field name or
    /// getter-style name, as populated by the build step)
    pub constraints: HashMap<String, Vec<ConstraintSpec>>,
    /// Members carrying a deprecation marker
    pub deprecated_members: HashSet<String>,
}

impl TypeDescriptor {
    fn base(qualified_name: &str, shape: TypeShape) -> Self {
        let mut descriptor = Self {
            qualified_name: qualified_name.to_string(),
            display_name: simple_name(qualified_name).to_string(),
            shape,
            subtypes: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            constraints: HashMap::new(),
            deprecated_members: HashSet::new(),
        };

        // Properties that did not name their declaring type belong to this one.
        if let TypeShape::Object(ref mut properties) = descriptor.shape {
            for property in properties.iter_mut() {
                if property.declared_by.is_empty() {
                    property.declared_by = descriptor.qualified_name.clone();
                }
            }
        }

        descriptor
    }

    /// Creates an object descriptor with the given properties in declaration order.
    pub fn object(qualified_name: &str, properties: Vec<Property>) -> Self {
        Self::base(qualified_name, TypeShape::Object(properties))
    }

    /// Creates an enum descriptor; constants are given in their serialized form,
    /// in declaration order.
    pub fn enumeration(qualified_name: &str, constants: &[&str]) -> Self {
        Self::base(
            qualified_name,
            TypeShape::Enum(constants.iter().map(|c| c.to_string()).collect()),
        )
    }

    /// Creates a descriptor for a type that serializes to a single scalar kind.
    pub fn scalar(qualified_name: &str, kind: ScalarKind) -> Self {
        Self::base(qualified_name, TypeShape::Scalar(kind))
    }

    /// Declares the closed list of concrete subtypes for polymorphic fan-out.
    pub fn with_subtypes(mut self, subtypes: &[&str]) -> Self {
        self.subtypes = subtypes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Declares the superclass.
    pub fn with_supertype(mut self, qualified_name: &str) -> Self {
        self.supertype = Some(qualified_name.to_string());
        self
    }

    /// Declares the directly implemented interfaces.
    pub fn with_interfaces(mut self, qualified_names: &[&str]) -> Self {
        self.interfaces = qualified_names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Attaches constraint metadata to the given member name.
    pub fn with_constraints(mut self, member_name: &str, specs: Vec<ConstraintSpec>) -> Self {
        self.constraints
            .entry(member_name.to_string())
            .or_default()
            .extend(specs);
        self
    }

    /// Marks a member as deprecated.
    pub fn with_deprecated_member(mut self, member_name: &str) -> Self {
        self.deprecated_members.insert(member_name.to_string());
        self
    }
}

/// Registry of all documented types, keyed by qualified name.
///
/// Built once per documentation run by the caller; the generation code only reads it.
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types
            .insert(descriptor.qualified_name.clone(), descriptor);
        self
    }

    /// Looks up a descriptor by qualified name.
    pub fn get(&self, qualified_name: &str) -> Option<&TypeDescriptor> {
        trace!("Looking up type: {}", qualified_name);
        self.types.get(qualified_name)
    }

    /// Returns the display name for a qualified name, falling back to the
    /// trailing name segment for unregistered types.
    pub fn display_name<'a>(&'a self, qualified_name: &'a str) -> &'a str {
        match self.types.get(qualified_name) {
            Some(descriptor) => &descriptor.display_name,
            None => simple_name(qualified_name),
        }
    }

    /// Resolves a type reference to the documented value kind, as used for
    /// parameter type columns and array element qualifiers. Enums document as
    /// `String`, the same as their serialized constants.
    pub fn json_type_of(&self, type_ref: &TypeRef) -> JsonType {
        match type_ref {
            TypeRef::Scalar(kind) => JsonType::from(*kind),
            TypeRef::Map => JsonType::Map,
            TypeRef::Array(element) => {
                JsonType::Array(Some(Box::new(self.json_type_of(element))))
            }
            TypeRef::Named(name) => match self.get(name).map(|d| &d.shape) {
                Some(TypeShape::Enum(_)) => JsonType::String,
                Some(TypeShape::Scalar(kind)) => JsonType::from(*kind),
                Some(TypeShape::Object(_)) | None => JsonType::Object,
            },
        }
    }
}

/// Serialized kind of a documented field, as rendered in the type column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonType {
    String,
    Integer,
    Decimal,
    Boolean,
    Object,
    /// Array, with the element kind when it is known
    Array(Option<Box<JsonType>>),
    Map,
    Null,
    Varies,
}

impl From<ScalarKind> for JsonType {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => JsonType::String,
            ScalarKind::Integer => JsonType::Integer,
            ScalarKind::Decimal => JsonType::Decimal,
            ScalarKind::Boolean => JsonType::Boolean,
            ScalarKind::Null => JsonType::Null,
            ScalarKind::Varies => JsonType::Varies,
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "String"),
            JsonType::Integer => write!(f, "Integer"),
            JsonType::Decimal => write!(f, "Decimal"),
            JsonType::Boolean => write!(f, "Boolean"),
            JsonType::Object => write!(f, "Object"),
            JsonType::Array(Some(element)) => write!(f, "Array[{}]", element),
            JsonType::Array(None) => write!(f, "Array"),
            JsonType::Map => write!(f, "Map"),
            JsonType::Null => write!(f, "Null"),
            JsonType::Varies => write!(f, "Varies"),
        }
    }
}

/// Returns the trailing name segment of a qualified name.
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
}

/// Determines if a member name is a getter-style accessor name.
pub fn is_getter(member_name: &str) -> bool {
    member_name.starts_with("get") || member_name.starts_with("is")
}

/// Derives the backing field name from a getter-style accessor name,
/// e.g. `getAge` becomes `age` and `isActive` becomes `active`.
/// Non-getter names are returned unchanged.
pub fn from_getter(member_name: &str) -> String {
    if !is_getter(member_name) {
        return member_name.to_string();
    }

    let cut = if member_name.starts_with("get") { 3 } else { 2 };
    let rest = &member_name[cut..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => member_name.to_string(),
    }
}
