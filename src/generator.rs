//! The field-documentation accumulator.
//!
//! Walks a root type's serialized shape depth-first, in declaration order, and
//! produces one [`FieldDescriptor`] per reachable JSON path. At every node the
//! doc-comment store, the constraint reader and the per-branch visited-type
//! registry are consulted; polymorphic subtypes are fanned out and merged onto
//! shared paths; cyclic type graphs terminate through the registry.

use crate::constraints::{ConstraintReader, ConstraintSpec};
use crate::docstore::DocStore;
use crate::error::{Error, Result};
use crate::registry::VisitedTypes;
use crate::types::{
    from_getter, is_getter, JsonType, Property, TypeDescriptor, TypeIndex, TypeRef, TypeShape,
};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Forced line break between text pieces of one description, resolved by the
/// output renderer.
pub const LINE_BREAK: &str = "<br>";

/// Null-handling configuration of the consuming deserializer, as far as it
/// affects the optional column.
#[derive(Debug, Clone)]
pub struct DeserializationSettings {
    /// Whether deserialization fails when a primitive member receives null.
    /// When enabled, unannotated primitive fields document as required.
    pub fail_on_null_for_primitives: bool,
}

impl Default for DeserializationSettings {
    fn default() -> Self {
        Self {
            fail_on_null_for_primitives: true,
        }
    }
}

/// One row of generated field documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Dot/bracket JSON path, e.g. `a.b[].c`; unique within one generation call
    pub path: String,
    /// Serialized kind rendered in the type column
    pub json_type: JsonType,
    /// Accumulated free text; multi-source pieces are joined with [`LINE_BREAK`]
    pub description: String,
    /// Human-readable constraint strings
    pub constraints: Vec<String>,
    /// "true"/"false", or per-group qualified strings; the blanket signal
    /// comes first
    pub optional: Vec<String>,
    /// Whether any contributing member carries a deprecation marker or tag
    pub deprecated: bool,
    /// Deprecation reasons, possibly qualified with the contributing type
    pub deprecation_reasons: Vec<String>,
    /// Declared default value; only populated by the parameter drivers
    pub default_value: Option<String>,
}

/// What one declaring type contributes to a field descriptor.
struct Contribution {
    description: String,
    constraints: Vec<String>,
    optional: Vec<String>,
    deprecated: bool,
    deprecation_reasons: Vec<String>,
}

/// Call-local accumulation state: descriptors in first-visit order, plus the
/// declaring types that already contributed to each path.
struct Accumulator {
    fields: Vec<FieldDescriptor>,
    by_path: HashMap<String, usize>,
    contributors: HashMap<String, HashSet<String>>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            by_path: HashMap::new(),
            contributors: HashMap::new(),
        }
    }

    /// Records a contribution at a path. The first visit creates the
    /// descriptor; a re-visit from an already-recorded declaring type is a
    /// no-op; a re-visit from a different declaring type appends its text,
    /// qualified with the contributor's display name.
    fn upsert(
        &mut self,
        path: &str,
        json_type: JsonType,
        declared_by: &str,
        qualifier: &str,
        contribution: Contribution,
    ) {
        let seen = self.contributors.entry(path.to_string()).or_default();
        if !seen.insert(declared_by.to_string()) {
            trace!("Path {} already documented by {}", path, declared_by);
            return;
        }

        match self.by_path.get(path) {
            None => {
                self.by_path.insert(path.to_string(), self.fields.len());
                self.fields.push(FieldDescriptor {
                    path: path.to_string(),
                    json_type,
                    description: contribution.description,
                    constraints: contribution.constraints,
                    optional: contribution.optional,
                    deprecated: contribution.deprecated,
                    deprecation_reasons: contribution.deprecation_reasons,
                    default_value: None,
                });
            }
            Some(&at) => {
                debug!("Merging contribution of {} onto path {}", declared_by, path);
                self.fields[at].merge(contribution, qualifier);
            }
        }
    }
}

impl FieldDescriptor {
    fn merge(&mut self, contribution: Contribution, qualifier: &str) {
        if !contribution.description.is_empty() {
            let qualified = format!("{} [{}]", contribution.description, qualifier);
            if self.description.is_empty() {
                self.description = qualified;
            } else {
                self.description.push_str(LINE_BREAK);
                self.description.push_str(&qualified);
            }
        }

        for constraint in contribution.constraints {
            let qualified = format!("{} [{}]", constraint, qualifier);
            if !self.constraints.contains(&qualified) {
                self.constraints.push(qualified);
            }
        }

        self.deprecated |= contribution.deprecated;
        for reason in contribution.deprecation_reasons {
            let qualified = format!("{} [{}]", reason, qualifier);
            if !self.deprecation_reasons.contains(&qualified) {
                self.deprecation_reasons.push(qualified);
            }
        }
        // The optional signal of the first contributor stands.
    }
}

/// Drives one generation call over a [`TypeIndex`].
pub struct FieldDocumentationGenerator<'a> {
    index: &'a TypeIndex,
    docs: &'a DocStore,
    constraints: &'a ConstraintReader,
    settings: DeserializationSettings,
}

impl<'a> FieldDocumentationGenerator<'a> {
    pub fn new(index: &'a TypeIndex, docs: &'a DocStore, constraints: &'a ConstraintReader) -> Self {
        Self {
            index,
            docs,
            constraints,
            settings: DeserializationSettings::default(),
        }
    }

    /// Overrides the deserializer null-handling configuration.
    pub fn with_settings(mut self, settings: DeserializationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Generates the ordered field documentation for the given root type.
    ///
    /// The root type and all of its declared subtypes are visited in turn,
    /// accumulating onto shared paths. Nested object types are expanded at
    /// most once per branch, so cyclic type graphs terminate.
    ///
    /// # Arguments
    ///
    /// * `root_qualified_name` - Qualified name of a type registered in the
    ///   [`TypeIndex`]
    ///
    /// # Returns
    ///
    /// Returns one descriptor per reachable JSON path, in depth-first
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Fails when the root type, a referenced type, or a property's value type
    /// cannot be resolved.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use restdocs_from_types::generator::FieldDocumentationGenerator;
    ///
    /// let generator = FieldDocumentationGenerator::new(&index, &docs, &reader);
    /// let fields = generator.generate("com.example.Person").unwrap();
    /// for field in &fields {
    ///     println!("{}: {}", field.path, field.json_type);
    /// }
    /// ```
    pub fn generate(&self, root_qualified_name: &str) -> Result<Vec<FieldDescriptor>> {
        debug!("Generating field documentation for {}", root_qualified_name);
        let alternatives = self.fan_out(root_qualified_name)?;
        let registry = VisitedTypes::new().with_visited(alternatives.iter());

        let mut accumulator = Accumulator::new();
        for alternative in &alternatives {
            self.visit_object(alternative, "", &registry, &mut accumulator)?;
        }
        Ok(accumulator.fields)
    }

    /// Generates field documentation for an arbitrary root value type, e.g. a
    /// collection payload. Fields of array elements are documented under a
    /// leading `[]` path segment.
    ///
    /// # Errors
    ///
    /// Fails for the same reasons as [`FieldDocumentationGenerator::generate`].
    pub fn generate_for_ref(&self, root: &TypeRef) -> Result<Vec<FieldDescriptor>> {
        match root {
            TypeRef::Named(name) => self.generate(name),
            _ => {
                debug!("Generating field documentation for a {:?} root", root);
                let mut accumulator = Accumulator::new();
                self.descend(root, "", true, &VisitedTypes::new(), &mut accumulator)?;
                Ok(accumulator.fields)
            }
        }
    }

    /// Resolves the closed fan-out batch for a type: the type itself followed
    /// by its declared subtypes.
    fn fan_out(&self, qualified_name: &str) -> Result<Vec<String>> {
        let descriptor = self
            .index
            .get(qualified_name)
            .ok_or_else(|| Error::UnknownType(qualified_name.to_string()))?;

        let mut batch = vec![qualified_name.to_string()];
        batch.extend(descriptor.subtypes.iter().cloned());
        Ok(batch)
    }

    fn visit_object(
        &self,
        qualified_name: &str,
        prefix: &str,
        registry: &VisitedTypes,
        accumulator: &mut Accumulator,
    ) -> Result<()> {
        let descriptor = self
            .index
            .get(qualified_name)
            .ok_or_else(|| Error::UnknownType(qualified_name.to_string()))?;
        let TypeShape::Object(properties) = &descriptor.shape else {
            return Ok(());
        };

        for property in properties {
            if property.opaque {
                debug!(
                    "Skipping property {} of {}: no value serializer",
                    property.json_name, qualified_name
                );
                continue;
            }
            let Some(ty) = &property.ty else {
                return Err(Error::MissingPropertyType {
                    type_name: qualified_name.to_string(),
                    property: property.json_name.clone(),
                });
            };

            let path = join_path(prefix, &property.json_name);
            trace!("Visiting {} declared by {}", path, property.declared_by);
            let contribution = self.contribution_for(descriptor, property, ty);
            accumulator.upsert(
                &path,
                self.index.json_type_of(ty),
                &property.declared_by,
                self.index.display_name(&property.declared_by),
                contribution,
            );

            self.descend(ty, &path, property.expand, registry, accumulator)?;
        }
        Ok(())
    }

    /// Recurses into a property's value type. Arrays append a synthetic `[]`
    /// segment and expand their element within the parent registry scope;
    /// object types are expanded at most once per branch.
    fn descend(
        &self,
        ty: &TypeRef,
        path: &str,
        expand: bool,
        registry: &VisitedTypes,
        accumulator: &mut Accumulator,
    ) -> Result<()> {
        match ty {
            TypeRef::Scalar(_) | TypeRef::Map => Ok(()),
            TypeRef::Array(element) => {
                self.descend(element, &format!("{}[]", path), expand, registry, accumulator)
            }
            TypeRef::Named(name) => {
                let descriptor = self
                    .index
                    .get(name)
                    .ok_or_else(|| Error::UnknownType(name.clone()))?;
                if !matches!(descriptor.shape, TypeShape::Object(_)) {
                    return Ok(());
                }
                if !expand {
                    debug!("Expansion suppressed at {}", path);
                    return Ok(());
                }

                let alternatives = self.fan_out(name)?;
                if alternatives.iter().any(|t| registry.was_visited(t)) {
                    debug!("Not re-expanding {} at {}", name, path);
                    return Ok(());
                }

                let child_registry = registry.with_visited(alternatives.iter());
                for alternative in &alternatives {
                    self.visit_object(alternative, path, &child_registry, accumulator)?;
                }
                Ok(())
            }
        }
    }

    fn contribution_for(
        &self,
        owner: &TypeDescriptor,
        property: &Property,
        ty: &TypeRef,
    ) -> Contribution {
        let declared_by = &property.declared_by;
        let member = &property.member_name;

        let mut description = self.resolve_comment(declared_by, member);
        let see = self.resolve_tag(declared_by, member, "see");
        if !see.is_empty() {
            if !description.is_empty() {
                description.push_str(LINE_BREAK);
            }
            description.push_str(&format!("See {}.", see));
        }

        // Annotations sit on the getter or on the backing field; each concern
        // falls back to the bare field name on its own, so a mandatory
        // annotation on the field is still honored when the getter carries
        // other constraints.
        let mut constraints = self.constraints.constraint_messages(
            self.index,
            self.member_specs(owner, declared_by, member),
            None,
        );
        if constraints.is_empty() {
            if let Some(bare) = bare_member_name(member) {
                constraints = self.constraints.constraint_messages(
                    self.index,
                    self.member_specs(owner, declared_by, &bare),
                    None,
                );
            }
        }
        if let Some(message) = self.constraints.enum_message(self.index, ty) {
            constraints.push(message);
        }

        let optional = self.resolve_optional(owner, property);

        let deprecated_tag = self.resolve_tag(declared_by, member, "deprecated");
        let marked = self.has_deprecation_marker(owner, declared_by, member);
        let mut deprecation_reasons = Vec::new();
        if !deprecated_tag.is_empty() {
            deprecation_reasons.push(deprecated_tag.clone());
        }

        Contribution {
            description,
            constraints,
            optional,
            deprecated: marked || !deprecated_tag.is_empty(),
            deprecation_reasons,
        }
    }

    /// Comment resolution order: field comment on the declaring type, then
    /// method comment through the class hierarchy, then the field comment
    /// under the bare name derived from a getter-style member name.
    fn resolve_comment(&self, declared_by: &str, member: &str) -> String {
        let comment = self.docs.field_comment(declared_by, member);
        if !comment.is_empty() {
            return comment;
        }
        let comment = self.docs.method_comment(self.index, declared_by, member);
        if !comment.is_empty() {
            return comment;
        }
        if is_getter(member) {
            return self.docs.field_comment(declared_by, &from_getter(member));
        }
        String::new()
    }

    fn resolve_tag(&self, declared_by: &str, member: &str, tag: &str) -> String {
        let value = self.docs.field_tag(declared_by, member, tag);
        if !value.is_empty() {
            return value;
        }
        let value = self.docs.method_tag(self.index, declared_by, member, tag);
        if !value.is_empty() {
            return value;
        }
        if is_getter(member) {
            return self.docs.field_tag(declared_by, &from_getter(member), tag);
        }
        String::new()
    }

    /// Constraint metadata recorded under exactly the given member name, read
    /// from the declaring type's descriptor when it is registered.
    fn member_specs<'b>(
        &'b self,
        owner: &'b TypeDescriptor,
        declared_by: &str,
        member: &str,
    ) -> &'b [ConstraintSpec] {
        let descriptor = match self.index.get(declared_by) {
            Some(declaring) => declaring,
            None => owner,
        };
        descriptor
            .constraints
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn has_deprecation_marker(
        &self,
        owner: &TypeDescriptor,
        declared_by: &str,
        member: &str,
    ) -> bool {
        let descriptor = match self.index.get(declared_by) {
            Some(declaring) => declaring,
            None => owner,
        };
        descriptor.deprecated_members.contains(member)
            || (is_getter(member)
                && descriptor
                    .deprecated_members
                    .contains(from_getter(member).as_str()))
    }

    /// Optional resolution: the serialization framework's unconditional
    /// requirement wins, then the primitive default, then the mandatory
    /// constraint family (retried under the bare field name when the member
    /// name yields nothing), then "true".
    fn resolve_optional(&self, owner: &TypeDescriptor, property: &Property) -> Vec<String> {
        if property.required {
            return vec!["false".to_string()];
        }
        if property.primitive {
            return if self.settings.fail_on_null_for_primitives {
                vec!["false".to_string()]
            } else {
                vec!["true".to_string()]
            };
        }

        let declared_by = &property.declared_by;
        let member = &property.member_name;
        let mut messages = self
            .constraints
            .optional_messages(self.member_specs(owner, declared_by, member));
        if messages.is_empty() {
            if let Some(bare) = bare_member_name(member) {
                messages = self
                    .constraints
                    .optional_messages(self.member_specs(owner, declared_by, &bare));
            }
        }

        if messages.is_empty() {
            vec!["true".to_string()]
        } else {
            messages
        }
    }
}

/// The backing field name behind a getter-style member name, when there is one.
fn bare_member_name(member: &str) -> Option<String> {
    is_getter(member).then(|| from_getter(member))
}

fn join_path(prefix: &str, json_name: &str) -> String {
    if prefix.is_empty() {
        json_name.to_string()
    } else {
        format!("{}.{}", prefix, json_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintSpec;
    use crate::types::{Property, ScalarKind, TypeDescriptor};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_docs(dir: &TempDir, relative: &str, content: &serde_json::Value) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, serde_json::to_string(content).unwrap()).unwrap();
    }

    fn empty_docs() -> DocStore {
        DocStore::new(Vec::<String>::new())
    }

    fn generate(index: &TypeIndex, root: &str) -> Vec<FieldDescriptor> {
        let docs = empty_docs();
        let reader = ConstraintReader::new();
        FieldDocumentationGenerator::new(index, &docs, &reader)
            .generate(root)
            .unwrap()
    }

    fn paths(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_scalar_fields_with_comments_and_constraints() {
        let dir = TempDir::new().unwrap();
        write_docs(
            &dir,
            "com/example/Person.json",
            &serde_json::json!({
                "fields": {
                    "name": {"comment": "Full name"},
                    "age": {"comment": "Age in years"}
                }
            }),
        );

        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.Person",
                vec![
                    Property::new("name", "name", TypeRef::Scalar(ScalarKind::String)),
                    Property::new("age", "age", TypeRef::Scalar(ScalarKind::Integer)),
                ],
            )
            .with_constraints(
                "age",
                vec![ConstraintSpec::new("javax.validation.constraints.Min")
                    .with_value("value", 1)],
            ),
        );

        let docs = DocStore::new(vec![dir.path().to_path_buf()]);
        let reader = ConstraintReader::new();
        let fields = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Person")
            .unwrap();

        assert_eq!(paths(&fields), vec!["name", "age"]);
        assert_eq!(fields[0].json_type, JsonType::String);
        assert_eq!(fields[0].description, "Full name");
        assert_eq!(fields[0].optional, vec!["true"]);
        assert_eq!(fields[1].description, "Age in years");
        assert_eq!(fields[1].constraints, vec!["Must be at least 1"]);
        assert_eq!(fields[1].optional, vec!["true"]);
    }

    #[test]
    fn test_nested_collection_paths() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Cart",
            vec![Property::new(
                "items",
                "items",
                TypeRef::Array(Box::new(TypeRef::Named("com.example.Item".to_string()))),
            )],
        ));
        index.register(TypeDescriptor::object(
            "com.example.Item",
            vec![Property::new("id", "id", TypeRef::Scalar(ScalarKind::String))],
        ));

        let fields = generate(&index, "com.example.Cart");
        assert_eq!(paths(&fields), vec!["items", "items[].id"]);
        assert_eq!(fields[0].json_type.to_string(), "Array[Object]");
        assert_eq!(fields[1].json_type, JsonType::String);
    }

    #[test]
    fn test_collection_root_documented_under_bracket_prefix() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Item",
            vec![Property::new("id", "id", TypeRef::Scalar(ScalarKind::String))],
        ));

        let docs = empty_docs();
        let reader = ConstraintReader::new();
        let fields = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate_for_ref(&TypeRef::Array(Box::new(TypeRef::Named(
                "com.example.Item".to_string(),
            ))))
            .unwrap();

        assert_eq!(paths(&fields), vec!["[].id"]);
    }

    #[test]
    fn test_no_duplicate_paths() {
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.Shape",
                vec![Property::new("kind", "kind", TypeRef::Scalar(ScalarKind::String))],
            )
            .with_subtypes(&["com.example.Circle", "com.example.Square"]),
        );
        index.register(TypeDescriptor::object(
            "com.example.Circle",
            vec![
                Property::new("kind", "kind", TypeRef::Scalar(ScalarKind::String))
                    .declared_by("com.example.Shape"),
                Property::new("radius", "radius", TypeRef::Scalar(ScalarKind::Decimal)),
            ],
        ));
        index.register(TypeDescriptor::object(
            "com.example.Square",
            vec![
                Property::new("kind", "kind", TypeRef::Scalar(ScalarKind::String))
                    .declared_by("com.example.Shape"),
                Property::new("side", "side", TypeRef::Scalar(ScalarKind::Decimal)),
            ],
        ));

        let fields = generate(&index, "com.example.Shape");
        let mut seen = HashSet::new();
        for field in &fields {
            assert!(seen.insert(&field.path), "duplicate path {}", field.path);
        }
        assert_eq!(paths(&fields), vec!["kind", "radius", "side"]);
    }

    #[test]
    fn test_self_referential_type_terminates() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Node",
            vec![
                Property::new("self", "self", TypeRef::Named("com.example.Node".to_string())),
                Property::new(
                    "selves",
                    "selves",
                    TypeRef::Array(Box::new(TypeRef::Named("com.example.Node".to_string()))),
                ),
            ],
        ));

        let fields = generate(&index, "com.example.Node");
        assert_eq!(paths(&fields), vec!["self", "selves"]);
    }

    #[test]
    fn test_sibling_branches_expand_shared_type_independently() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Pair",
            vec![
                Property::new("left", "left", TypeRef::Named("com.example.Point".to_string())),
                Property::new("right", "right", TypeRef::Named("com.example.Point".to_string())),
            ],
        ));
        index.register(TypeDescriptor::object(
            "com.example.Point",
            vec![Property::new("x", "x", TypeRef::Scalar(ScalarKind::Integer))],
        ));

        let fields = generate(&index, "com.example.Pair");
        assert_eq!(paths(&fields), vec!["left", "left.x", "right", "right.x"]);
    }

    #[test]
    fn test_subtype_contributions_merge_with_qualifier() {
        let dir = TempDir::new().unwrap();
        write_docs(
            &dir,
            "com/example/Cat.json",
            &serde_json::json!({"fields": {"sound": {"comment": "Meow"}}}),
        );
        write_docs(
            &dir,
            "com/example/Dog.json",
            &serde_json::json!({"fields": {"sound": {"comment": "Woof"}}}),
        );

        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object("com.example.Animal", vec![])
                .with_subtypes(&["com.example.Cat", "com.example.Dog"]),
        );
        index.register(TypeDescriptor::object(
            "com.example.Cat",
            vec![Property::new("sound", "sound", TypeRef::Scalar(ScalarKind::String))],
        ));
        index.register(TypeDescriptor::object(
            "com.example.Dog",
            vec![Property::new("sound", "sound", TypeRef::Scalar(ScalarKind::String))],
        ));

        let docs = DocStore::new(vec![dir.path().to_path_buf()]);
        let reader = ConstraintReader::new();
        let fields = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Animal")
            .unwrap();

        assert_eq!(paths(&fields), vec!["sound"]);
        assert_eq!(fields[0].description, "Meow<br>Woof [Dog]");
    }

    #[test]
    fn test_required_wins_over_relaxed_annotations() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Order",
            vec![Property::new("id", "id", TypeRef::Scalar(ScalarKind::String)).required()],
        ));

        let fields = generate(&index, "com.example.Order");
        assert_eq!(fields[0].optional, vec!["false"]);
    }

    #[test]
    fn test_primitive_default_follows_null_handling() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Counter",
            vec![Property::new("count", "count", TypeRef::Scalar(ScalarKind::Integer)).primitive()],
        ));

        let strict = generate(&index, "com.example.Counter");
        assert_eq!(strict[0].optional, vec!["false"]);

        let docs = empty_docs();
        let reader = ConstraintReader::new();
        let relaxed = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .with_settings(DeserializationSettings {
                fail_on_null_for_primitives: false,
            })
            .generate("com.example.Counter")
            .unwrap();
        assert_eq!(relaxed[0].optional, vec!["true"]);
    }

    #[test]
    fn test_mandatory_constraint_drives_optional_column() {
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.User",
                vec![Property::new("email", "email", TypeRef::Scalar(ScalarKind::String))],
            )
            .with_constraints(
                "email",
                vec![ConstraintSpec::new("javax.validation.constraints.NotBlank")],
            ),
        );

        let fields = generate(&index, "com.example.User");
        assert_eq!(fields[0].optional, vec!["false"]);
        assert!(fields[0].constraints.is_empty());
    }

    #[test]
    fn test_getter_member_falls_back_to_field_constraints() {
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.User",
                vec![Property::new("age", "getAge", TypeRef::Scalar(ScalarKind::Integer))],
            )
            .with_constraints(
                "age",
                vec![ConstraintSpec::new("javax.validation.constraints.Min")
                    .with_value("value", 18)],
            ),
        );

        let fields = generate(&index, "com.example.User");
        assert_eq!(fields[0].constraints, vec!["Must be at least 18"]);
    }

    #[test]
    fn test_mandatory_annotation_on_backing_field_of_getter() {
        // Min sits on the getter, NotNull on the backing field; both must be
        // honored, each through its own fallback.
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.User",
                vec![Property::new("age", "getAge", TypeRef::Scalar(ScalarKind::Integer))],
            )
            .with_constraints(
                "getAge",
                vec![ConstraintSpec::new("javax.validation.constraints.Min")
                    .with_value("value", 18)],
            )
            .with_constraints(
                "age",
                vec![ConstraintSpec::new("javax.validation.constraints.NotNull")],
            ),
        );

        let fields = generate(&index, "com.example.User");
        assert_eq!(fields[0].constraints, vec!["Must be at least 18"]);
        assert_eq!(fields[0].optional, vec!["false"]);
    }

    #[test]
    fn test_constraint_text_from_backing_field_when_getter_only_mandatory() {
        // NotBlank on the getter drives the optional column; the constraint
        // text comes from the Size annotation on the backing field.
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.User",
                vec![Property::new("name", "getName", TypeRef::Scalar(ScalarKind::String))],
            )
            .with_constraints(
                "getName",
                vec![ConstraintSpec::new("javax.validation.constraints.NotBlank")],
            )
            .with_constraints(
                "name",
                vec![ConstraintSpec::new("javax.validation.constraints.Size")
                    .with_value("min", 1)
                    .with_value("max", 10)],
            ),
        );

        let fields = generate(&index, "com.example.User");
        assert_eq!(
            fields[0].constraints,
            vec!["Size must be between 1 and 10 inclusive"]
        );
        assert_eq!(fields[0].optional, vec!["false"]);
    }

    #[test]
    fn test_enum_field_lists_constants() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Shirt",
            vec![Property::new(
                "size",
                "size",
                TypeRef::Named("com.example.Size".to_string()),
            )],
        ));
        index.register(TypeDescriptor::enumeration("com.example.Size", &["A", "B", "C"]));

        let fields = generate(&index, "com.example.Shirt");
        assert_eq!(fields[0].json_type, JsonType::String);
        assert_eq!(fields[0].constraints, vec!["Must be one of [A, B, C]"]);
    }

    #[test]
    fn test_expansion_suppressed_field_stays_flat() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Tree",
            vec![
                Property::new("label", "label", TypeRef::Scalar(ScalarKind::String)),
                Property::new(
                    "parent",
                    "parent",
                    TypeRef::Named("com.example.Details".to_string()),
                )
                .without_expansion(),
            ],
        ));
        index.register(TypeDescriptor::object(
            "com.example.Details",
            vec![Property::new("depth", "depth", TypeRef::Scalar(ScalarKind::Integer))],
        ));

        let fields = generate(&index, "com.example.Tree");
        assert_eq!(paths(&fields), vec!["label", "parent"]);
        assert_eq!(fields[1].json_type, JsonType::Object);
    }

    #[test]
    fn test_opaque_property_is_skipped() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Wrapper",
            vec![
                Property::new("known", "known", TypeRef::Scalar(ScalarKind::String)),
                Property::new("custom", "custom", TypeRef::Map).opaque(),
            ],
        ));

        let fields = generate(&index, "com.example.Wrapper");
        assert_eq!(paths(&fields), vec!["known"]);
    }

    #[test]
    fn test_missing_property_type_is_fatal() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Broken",
            vec![Property::untyped("mystery", "mystery")],
        ));

        let docs = empty_docs();
        let reader = ConstraintReader::new();
        let error = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Broken")
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Missing type for property 'mystery' of 'com.example.Broken'"
        );
    }

    #[test]
    fn test_unknown_referenced_type_is_fatal() {
        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Holder",
            vec![Property::new(
                "value",
                "value",
                TypeRef::Named("com.example.Nowhere".to_string()),
            )],
        ));

        let docs = empty_docs();
        let reader = ConstraintReader::new();
        let error = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Holder")
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown type: com.example.Nowhere");
    }

    #[test]
    fn test_see_tag_appended_to_description() {
        let dir = TempDir::new().unwrap();
        write_docs(
            &dir,
            "com/example/Doc.json",
            &serde_json::json!({
                "fields": {
                    "ref": {"comment": "A reference", "tags": {"see": "other docs"}}
                }
            }),
        );

        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Doc",
            vec![Property::new("ref", "ref", TypeRef::Scalar(ScalarKind::String))],
        ));

        let docs = DocStore::new(vec![dir.path().to_path_buf()]);
        let reader = ConstraintReader::new();
        let fields = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Doc")
            .unwrap();
        assert_eq!(fields[0].description, "A reference<br>See other docs.");
    }

    #[test]
    fn test_deprecated_tag_sets_flag_and_reason() {
        let dir = TempDir::new().unwrap();
        write_docs(
            &dir,
            "com/example/Legacy.json",
            &serde_json::json!({
                "fields": {
                    "old": {"comment": "Old field", "tags": {"deprecated": "Use new instead"}}
                }
            }),
        );

        let mut index = TypeIndex::new();
        index.register(TypeDescriptor::object(
            "com.example.Legacy",
            vec![Property::new("old", "old", TypeRef::Scalar(ScalarKind::String))],
        ));

        let docs = DocStore::new(vec![dir.path().to_path_buf()]);
        let reader = ConstraintReader::new();
        let fields = FieldDocumentationGenerator::new(&index, &docs, &reader)
            .generate("com.example.Legacy")
            .unwrap();
        assert!(fields[0].deprecated);
        assert_eq!(fields[0].deprecation_reasons, vec!["Use new instead"]);
    }

    #[test]
    fn test_deprecation_marker_without_tag() {
        let mut index = TypeIndex::new();
        index.register(
            TypeDescriptor::object(
                "com.example.Legacy",
                vec![Property::new("old", "old", TypeRef::Scalar(ScalarKind::String))],
            )
            .with_deprecated_member("old"),
        );

        let fields = generate(&index, "com.example.Legacy");
        assert!(fields[0].deprecated);
        assert!(fields[0].deprecation_reasons.is_empty());
    }
}
