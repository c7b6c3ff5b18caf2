//! Parameter, header and path-variable documentation.
//!
//! Non-recursive counterparts of the field accumulator: one descriptor per
//! annotated formal parameter of a handler method, re-using the constraint
//! and doc-comment layers. Parameter comments come from the method's own
//! documentation, walking the declared class hierarchy.

use crate::constraints::{ConstraintReader, ConstraintSpec};
use crate::docstore::DocStore;
use crate::generator::FieldDescriptor;
use crate::types::{TypeIndex, TypeRef};
use log::debug;

/// Where a handler-method parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Bound from a path segment
    Path,
    /// Bound from the query string or form data
    Query,
    /// Bound from a request header
    Header,
}

/// Build-time description of one formal parameter of a handler method.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Formal parameter name, used for doc-comment lookup
    pub name: String,
    /// Binding name supplied by the annotation, when it differs from the
    /// formal name
    pub bound_name: Option<String>,
    pub kind: ParameterKind,
    pub ty: TypeRef,
    pub required: bool,
    /// Declared default value; a defaulted parameter is never required
    pub default_value: Option<String>,
    pub constraints: Vec<ConstraintSpec>,
    pub deprecated: bool,
}

impl ParameterSpec {
    pub fn new(name: &str, kind: ParameterKind, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            bound_name: None,
            kind,
            ty,
            required: true,
            default_value: None,
            constraints: Vec::new(),
            deprecated: false,
        }
    }

    /// Sets the binding name from the annotation.
    pub fn bound_as(mut self, name: &str) -> Self {
        self.bound_name = Some(name.to_string());
        self
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Declares a default value; this also makes the parameter optional.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self.required = false;
        self
    }

    /// Attaches constraint metadata.
    pub fn with_constraints(mut self, specs: Vec<ConstraintSpec>) -> Self {
        self.constraints.extend(specs);
        self
    }

    /// Marks the parameter as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// Build-time description of a documented handler method.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    /// Qualified name of the declaring controller type
    pub declaring_type: String,
    pub method_name: String,
    pub parameters: Vec<ParameterSpec>,
}

impl MethodSpec {
    pub fn new(declaring_type: &str, method_name: &str, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            declaring_type: declaring_type.to_string(),
            method_name: method_name.to_string(),
            parameters,
        }
    }
}

/// Documents the formal parameters of a handler method, one kind at a time.
pub struct ParameterDocumentationGenerator<'a> {
    index: &'a TypeIndex,
    docs: &'a DocStore,
    constraints: &'a ConstraintReader,
}

impl<'a> ParameterDocumentationGenerator<'a> {
    pub fn new(index: &'a TypeIndex, docs: &'a DocStore, constraints: &'a ConstraintReader) -> Self {
        Self {
            index,
            docs,
            constraints,
        }
    }

    /// Documents the method's path parameters, in declaration order.
    pub fn path_parameters(&self, method: &MethodSpec) -> Vec<FieldDescriptor> {
        self.parameters_of_kind(method, ParameterKind::Path)
    }

    /// Documents the method's query/form parameters, in declaration order.
    pub fn query_parameters(&self, method: &MethodSpec) -> Vec<FieldDescriptor> {
        self.parameters_of_kind(method, ParameterKind::Query)
    }

    /// Documents the method's request-header parameters, in declaration order.
    pub fn request_headers(&self, method: &MethodSpec) -> Vec<FieldDescriptor> {
        self.parameters_of_kind(method, ParameterKind::Header)
    }

    fn parameters_of_kind(&self, method: &MethodSpec, kind: ParameterKind) -> Vec<FieldDescriptor> {
        debug!(
            "Documenting {:?} parameters of {}.{}",
            kind, method.declaring_type, method.method_name
        );
        method
            .parameters
            .iter()
            .filter(|parameter| parameter.kind == kind)
            .map(|parameter| self.describe(method, parameter))
            .collect()
    }

    fn describe(&self, method: &MethodSpec, parameter: &ParameterSpec) -> FieldDescriptor {
        let path = parameter
            .bound_name
            .clone()
            .unwrap_or_else(|| parameter.name.clone());
        let description = self.docs.method_parameter_comment(
            self.index,
            &method.declaring_type,
            &method.method_name,
            &parameter.name,
        );

        // Constraint messages aggregated on a parameter are sorted lexically.
        let mut constraints =
            self.constraints
                .constraint_messages(self.index, &parameter.constraints, Some(&parameter.ty));
        constraints.sort();

        FieldDescriptor {
            path,
            json_type: self.index.json_type_of(&parameter.ty),
            description,
            constraints,
            optional: vec![(!parameter.required).to_string()],
            deprecated: parameter.deprecated,
            deprecation_reasons: Vec::new(),
            default_value: parameter.default_value.clone(),
        }
    }
}
