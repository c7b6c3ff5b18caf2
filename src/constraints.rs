//! Constraint resolution: turns validation-constraint metadata into
//! human-readable descriptions.
//!
//! Each constraint is resolved through a message template keyed by the
//! constraint's qualified name, with `${key}` placeholders filled from the
//! constraint's own configuration values. Constraints carrying groups expand
//! into one description per group. The not-null family of constraints is never
//! rendered as free text; it feeds the optional/required column instead.

use crate::types::{simple_name, TypeIndex, TypeRef, TypeShape};
use log::{debug, error};
use std::collections::{BTreeMap, HashMap};

/// Constraint names that mark a value as mandatory. They drive the optional
/// column and are filtered out of the constraint descriptions to avoid
/// duplicating "required" text.
pub const MANDATORY_VALUE_ANNOTATIONS: [&str; 5] = [
    "javax.validation.constraints.NotNull",
    "javax.validation.constraints.NotBlank",
    "javax.validation.constraints.NotEmpty",
    "org.hibernate.validator.constraints.NotBlank",
    "org.hibernate.validator.constraints.NotEmpty",
];

/// Configuration keys reserved by the validation framework; never substituted
/// into message templates.
const RESERVED_KEYS: [&str; 2] = ["groups", "payload"];

/// Placeholder rendered when a describable configuration value fails to
/// produce its message, keeping the problem visible in generated docs.
const ERROR_PLACEHOLDER: &str = "<error>";

/// One configuration value of a constraint.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// A plain value; arrays render as `[a, b]`
    Value(serde_json::Value),
    /// A describable payload producing its own display form. Errors are
    /// recovered locally and rendered as a visible `<error>` placeholder.
    Display(fn() -> Result<String, String>),
    /// The resolved list of constraint-group qualified names
    Groups(Vec<String>),
}

/// Validation-constraint metadata for one member or parameter: the qualified
/// constraint name plus its raw configuration. Produced by a build step and
/// consumed within one field's resolution.
#[derive(Debug, Clone)]
pub struct ConstraintSpec {
    /// Fully qualified constraint name, e.g. `javax.validation.constraints.Min`
    pub name: String,
    /// Raw configuration key -> value map
    pub configuration: BTreeMap<String, ConfigValue>,
}

impl ConstraintSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            configuration: BTreeMap::new(),
        }
    }

    /// Adds a plain configuration value.
    pub fn with_value<V: Into<serde_json::Value>>(mut self, key: &str, value: V) -> Self {
        self.configuration
            .insert(key.to_string(), ConfigValue::Value(value.into()));
        self
    }

    /// Adds a describable configuration value.
    pub fn with_display(mut self, key: &str, display: fn() -> Result<String, String>) -> Self {
        self.configuration
            .insert(key.to_string(), ConfigValue::Display(display));
        self
    }

    /// Declares the constraint groups this constraint belongs to.
    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.configuration.insert(
            "groups".to_string(),
            ConfigValue::Groups(groups.iter().map(|g| g.to_string()).collect()),
        );
        self
    }

    fn groups(&self) -> Vec<String> {
        // Anything other than the expected list-of-groups shape means no groups.
        match self.configuration.get("groups") {
            Some(ConfigValue::Groups(groups)) => groups.clone(),
            _ => Vec::new(),
        }
    }
}

/// Message templates for the snippet texts this layer synthesizes itself.
/// Swapping the table swaps the locale.
#[derive(Debug, Clone)]
pub struct Translations {
    templates: HashMap<String, String>,
}

impl Default for Translations {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            "constraints-enum".to_string(),
            "Must be one of ${value}".to_string(),
        );
        templates.insert(
            "constraints-groups".to_string(),
            "${value} (groups: [${group}])".to_string(),
        );
        Self { templates }
    }
}

impl Translations {
    /// Overrides a template, e.g. to localize the enum listing text.
    pub fn with_template(mut self, key: &str, template: &str) -> Self {
        self.templates.insert(key.to_string(), template.to_string());
        self
    }

    fn translate(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let mut text = self.templates.get(key).cloned().unwrap_or_default();
        for (name, value) in substitutions {
            text = text.replace(&format!("${{{}}}", name), value);
        }
        text
    }
}

/// Resolves constraint metadata into ordered, human-readable messages.
pub struct ConstraintReader {
    descriptions: HashMap<String, String>,
    translations: Translations,
}

impl Default for ConstraintReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintReader {
    /// Creates a reader with the default description templates and English
    /// translations.
    pub fn new() -> Self {
        Self {
            descriptions: default_descriptions(),
            translations: Translations::default(),
        }
    }

    /// Replaces the translations table, e.g. for another locale.
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    /// Registers or overrides a description template for a constraint name,
    /// a constraint-group name or an enum type's qualified name.
    pub fn with_description(mut self, name: &str, template: &str) -> Self {
        self.descriptions.insert(name.to_string(), template.to_string());
        self
    }

    /// Resolves the human-readable descriptions for the given constraint specs,
    /// skipping the mandatory-value family, and appends an enum listing when
    /// the value type is an enum. Message order follows declaration order.
    pub fn constraint_messages(
        &self,
        index: &TypeIndex,
        specs: &[ConstraintSpec],
        value_ty: Option<&TypeRef>,
    ) -> Vec<String> {
        let mut messages: Vec<String> = specs
            .iter()
            .filter(|spec| !is_mandatory(&spec.name))
            .map(|spec| self.resolve_description(spec))
            .collect();

        if let Some(message) = value_ty.and_then(|ty| self.enum_message(index, ty)) {
            messages.push(message);
        }

        messages
    }

    /// Resolves the optional-column messages contributed by the mandatory-value
    /// family: a blanket "false" for ungrouped constraints, or one resolved
    /// group description per group. Group messages are sorted lexically, with
    /// the blanket "false" first.
    pub fn optional_messages(&self, specs: &[ConstraintSpec]) -> Vec<String> {
        let mut messages = Vec::new();
        let mut blanket = None;

        for spec in specs.iter().filter(|spec| is_mandatory(&spec.name)) {
            let groups = spec.groups();
            if groups.is_empty() {
                blanket = Some("false".to_string());
            } else {
                for group in groups {
                    messages.push(self.group_description(&group, "false"));
                }
            }
        }

        messages.sort();
        if let Some(blanket) = blanket {
            messages.insert(0, blanket);
        }
        messages
    }

    /// Resolves one constraint into its description, expanding groups into one
    /// description per group joined with ", ". A blank template resolution
    /// falls back to the constraint's own name.
    pub fn resolve_description(&self, spec: &ConstraintSpec) -> String {
        let mut description = self.plain_description(spec);
        if description.trim().is_empty() {
            description = spec.name.clone();
        }

        let groups = spec.groups();
        if groups.is_empty() {
            return description;
        }

        groups
            .iter()
            .map(|group| self.group_description(group, &description))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Synthesizes the "must be one of" listing for an enum-typed value,
    /// honoring a custom description registered under the enum's qualified name.
    /// Returns `None` when the value type is not a registered enum.
    pub fn enum_message(&self, index: &TypeIndex, value_ty: &TypeRef) -> Option<String> {
        let TypeRef::Named(name) = value_ty else {
            return None;
        };
        let TypeShape::Enum(constants) = &index.get(name)?.shape else {
            return None;
        };

        let value = format!("[{}]", constants.join(", "));
        // Pretend the enum type is a constraint so a registered custom
        // description takes precedence.
        let message = self.resolve_description(
            &ConstraintSpec::new(name).with_value("value", value.clone()),
        );
        if message.trim().is_empty() || message == *name {
            return Some(self.translations.translate("constraints-enum", &[("value", &value)]));
        }
        Some(message)
    }

    /// Resolves a group's description the same way a constraint is resolved,
    /// passing the constraint description through as the `value` placeholder.
    fn group_description(&self, group: &str, constraint_description: &str) -> String {
        let spec = ConstraintSpec::new(group).with_value("value", constraint_description);
        let description = self.plain_description(&spec);
        if description.trim().is_empty() {
            return self.translations.translate(
                "constraints-groups",
                &[("value", constraint_description), ("group", simple_name(group))],
            );
        }
        description
    }

    fn plain_description(&self, spec: &ConstraintSpec) -> String {
        let Some(template) = self.descriptions.get(&spec.name) else {
            debug!("No description template for constraint {}", spec.name);
            return String::new();
        };

        let mut description = template.clone();
        for (key, value) in &spec.configuration {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            description = description.replace(&format!("${{{}}}", key), &human_readable(value));
        }
        description.trim().to_string()
    }
}

fn is_mandatory(name: &str) -> bool {
    MANDATORY_VALUE_ANNOTATIONS.contains(&name)
}

/// Renders a configuration value the way it should appear inside a message.
fn human_readable(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Value(serde_json::Value::String(s)) => s.clone(),
        ConfigValue::Value(serde_json::Value::Array(items)) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        ConfigValue::Value(other) => other.to_string(),
        ConfigValue::Display(display) => match display() {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to render describable constraint value: {}", e);
                ERROR_PLACEHOLDER.to_string()
            }
        },
        // Reserved shape; never rendered as a placeholder value.
        ConfigValue::Groups(_) => String::new(),
    }
}

fn default_descriptions() -> HashMap<String, String> {
    let entries = [
        ("javax.validation.constraints.AssertFalse", "Must be false"),
        ("javax.validation.constraints.AssertTrue", "Must be true"),
        ("javax.validation.constraints.DecimalMax", "Must be at most ${value}"),
        ("javax.validation.constraints.DecimalMin", "Must be at least ${value}"),
        (
            "javax.validation.constraints.Digits",
            "Must have at most ${integer} integral digits and ${fraction} fractional digits",
        ),
        ("javax.validation.constraints.Future", "Must be in the future"),
        ("javax.validation.constraints.Max", "Must be at most ${value}"),
        ("javax.validation.constraints.Min", "Must be at least ${value}"),
        ("javax.validation.constraints.Negative", "Must be negative"),
        ("javax.validation.constraints.Null", "Must be null"),
        ("javax.validation.constraints.Past", "Must be in the past"),
        (
            "javax.validation.constraints.Pattern",
            "Must match the regular expression ${regexp}",
        ),
        ("javax.validation.constraints.Positive", "Must be positive"),
        (
            "javax.validation.constraints.Size",
            "Size must be between ${min} and ${max} inclusive",
        ),
        ("org.hibernate.validator.constraints.Email", "Must be a valid email address"),
        (
            "org.hibernate.validator.constraints.Length",
            "Length must be between ${min} and ${max} inclusive",
        ),
        (
            "org.hibernate.validator.constraints.Range",
            "Must be at least ${min} and at most ${max}",
        ),
        ("org.hibernate.validator.constraints.URL", "Must be a valid URL"),
    ];

    entries
        .iter()
        .map(|(name, template)| (name.to_string(), template.to_string()))
        .collect()
}
