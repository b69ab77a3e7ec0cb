//! Call-site categorisation.
//!
//! Each call found in a method body is reduced to a [`CallSite`] by the
//! analyser and categorised here with a fixed decision order: ignored
//! calls first (they never reach a counter), then constructor syntax,
//! then receiver-based dispatch against the attribute set, then type-based
//! dispatch against local/parameter declarations, then the free-function
//! fallback.

use crate::core::Language;
use crate::model::Variable;
use std::collections::{BTreeMap, HashSet};

/// Calls that never count toward any counter.
const CPP_IGNORED: &[&str] = &[
    "assert",
    "sizeof",
    "typeid",
    "move",
    "forward",
    "static_cast",
    "dynamic_cast",
    "const_cast",
    "reinterpret_cast",
    "static_assert",
];
const CSHARP_IGNORED: &[&str] = &["nameof", "typeof", "sizeof", "base"];
const JAVA_IGNORED: &[&str] = &["assert", "super"];

pub fn ignored_calls(language: Language) -> &'static [&'static str] {
    match language {
        Language::Cpp => CPP_IGNORED,
        Language::CSharp => CSHARP_IGNORED,
        Language::Java => JAVA_IGNORED,
    }
}

/// A syntactic call site, reduced to what categorisation needs.
#[derive(Debug, Clone, Default)]
pub struct CallSite {
    /// Receiver base identifier, with a leading `this` qualifier already
    /// stripped. `None` for bare calls like `update()`.
    pub receiver: Option<String>,
    /// The invoked name, generics removed.
    pub name: String,
    /// Whether the name was namespace-qualified (`std::sort`).
    pub namespace_qualified: bool,
    /// Whether the call is preceded by a `new` operator.
    pub preceded_by_new: bool,
}

/// What a call turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Ignored,
    Constructor,
    /// A call to another method of the same class.
    IntraClass,
    /// A call dispatched through an attribute.
    OnAttribute,
    /// A call on a local or parameter of external non-primitive type.
    ExternalMethod,
    /// A free function (or unresolvable receiver).
    ExternalFunction,
}

/// Everything categorisation consults, borrowed from the enclosing class
/// and method under analysis.
pub struct CallContext<'a> {
    pub language: Language,
    pub class_bare_name: &'a str,
    /// Names of the enclosing class's methods.
    pub class_methods: &'a HashSet<String>,
    /// Attribute scope, including the `this` sentinel.
    pub attributes: &'a BTreeMap<String, Variable>,
    /// Locals and parameters by name.
    pub locals_and_parameters: &'a BTreeMap<String, Variable>,
    /// Base identifier of the method's return type, for C++ temporary
    /// construction (`return Widget(a);`).
    pub return_type_base: &'a str,
    pub return_type_non_primitive: bool,
}

pub fn classify_call(site: &CallSite, ctx: &CallContext) -> CallKind {
    if ignored_calls(ctx.language).contains(&site.name.as_str()) {
        return CallKind::Ignored;
    }

    if site.preceded_by_new {
        return CallKind::Constructor;
    }
    // C++ constructs temporaries with plain call syntax: the class's own
    // name, or the method's non-primitive return type.
    if ctx.language == Language::Cpp && site.receiver.is_none() && !site.namespace_qualified {
        let names_own_class = !ctx.class_bare_name.is_empty() && site.name == ctx.class_bare_name;
        let names_return_type = ctx.return_type_non_primitive
            && !ctx.return_type_base.is_empty()
            && site.name == ctx.return_type_base;
        if names_own_class || names_return_type {
            return CallKind::Constructor;
        }
    }

    match &site.receiver {
        None if site.namespace_qualified => CallKind::ExternalFunction,
        None => {
            if ctx.class_methods.contains(&site.name) {
                CallKind::IntraClass
            } else {
                CallKind::ExternalFunction
            }
        }
        Some(receiver) => {
            if site.namespace_qualified {
                return CallKind::ExternalFunction;
            }
            if ctx.attributes.contains_key(receiver) {
                return CallKind::OnAttribute;
            }
            match ctx.locals_and_parameters.get(receiver) {
                Some(var) if var.is_external_non_primitive => CallKind::ExternalMethod,
                _ => CallKind::ExternalFunction,
            }
        }
    }
}
