//! The per-method analysis record.

use crate::core::{Language, MethodStereotype};
use crate::model::variable::Variable;
use crate::normalize;
use serde::Serialize;

/// Everything the classifier needs to know about one method, produced by
/// the method analyser. Call lists keep the callee names so diagnostics
/// can show them; the rules only look at the counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Method {
    pub name: String,
    /// Address of the method element within its unit, used for annotation
    /// targeting and reports.
    pub xpath: String,
    pub unit_index: usize,

    pub return_type_raw: String,
    pub return_type_parsed: String,
    /// Raw parameter list text; consulted only for the copy-constructor
    /// signature check.
    pub parameters_list: String,
    pub parameters: Vec<Variable>,
    pub locals: Vec<Variable>,

    pub is_const: bool,
    pub is_constructor_destructor: bool,
    pub is_destructor: bool,
    pub is_empty: bool,

    pub attribute_used: bool,
    pub attribute_returned: bool,
    pub attribute_not_returned: bool,
    pub attributes_modified: usize,

    /// Calls to other methods of the same class.
    pub function_calls: Vec<String>,
    /// Calls dispatched through an attribute.
    pub method_calls: Vec<String>,
    pub constructor_calls: Vec<String>,
    pub external_function_calls: usize,
    pub external_method_calls: usize,

    pub is_factory: bool,
    pub is_strict_factory: bool,

    pub non_primitive_attribute_external: bool,
    pub non_primitive_local_external: bool,
    pub non_primitive_parameter_external: bool,
    pub non_primitive_return_external: bool,

    pub parameter_ref_changed: bool,
    pub non_primitive_local_or_parameter_changed: bool,

    pub stereotypes: Vec<MethodStereotype>,
}

impl Method {
    /// Whether the raw return type spells `void*` (never true for Java).
    pub fn has_void_pointer_return(&self, language: Language) -> bool {
        language.has_void_pointer() && normalize::is_void_pointer(&self.return_type_raw)
    }

    /// Whether the parsed return type is the language's boolean.
    pub fn has_boolean_return(&self, language: Language) -> bool {
        match language {
            Language::Cpp => self.return_type_parsed == "bool",
            Language::CSharp => {
                self.return_type_parsed == "bool" || self.return_type_parsed == "Boolean"
            }
            Language::Java => self.return_type_parsed == "boolean",
        }
    }

    /// Intra-class calls plus calls on data members.
    pub fn calls_within_class(&self) -> usize {
        self.function_calls.len() + self.method_calls.len()
    }

    pub fn add_stereotype(&mut self, label: MethodStereotype) {
        self.stereotypes.push(label);
    }

    /// Whether the method's label list marks it a collaborator of any kind.
    pub fn is_collaborational(&self) -> bool {
        self.stereotypes.iter().any(|s| {
            matches!(
                s,
                MethodStereotype::Collaborator
                    | MethodStereotype::Controller
                    | MethodStereotype::Wrapper
            )
        })
    }
}
