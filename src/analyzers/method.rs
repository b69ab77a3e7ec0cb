//! The per-method static analysis.
//!
//! Walks one method subtree and derives every field of [`Method`]: the
//! parameter/local tables, return-expression shapes, the attribute
//! read/write sets, call categorisation, and the factory flags. The walk
//! visits every `src:expr` in the body once; calls are handled where they
//! appear as direct expression children, so a `new` operator immediately
//! before a call is visible without parent traversal.

use crate::analyzers::calls::{classify_call, CallContext, CallKind, CallSite};
use crate::core::{Language, Result};
use crate::model::{Method, Variable};
use crate::normalize;
use crate::primitives::PrimitiveTypes;
use crate::xpath::{
    child_elements, compile, element_text, evaluate_elements, first_child_named, local_name,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use sxd_document::dom::Element;
use sxd_xpath::XPath;

const ASSIGNMENT_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "??=",
];

/// Fixed sub-queries run against every method subtree. Compiled once and
/// reused across all units.
pub struct MethodAnalyzer {
    local_decls: XPath,
    control_decls: XPath,
    returns: XPath,
    exprs: XPath,
}

/// One method to analyse, with the class-level context it needs.
pub struct MethodInput<'a, 'd> {
    pub element: Element<'d>,
    pub language: Language,
    pub unit_index: usize,
    pub xpath: String,
    pub class_bare_name: &'a str,
    /// Attribute names in scope, including the `this` sentinel.
    pub attribute_scope: &'a BTreeMap<String, Variable>,
    /// Names of every method of the enclosing class.
    pub class_methods: &'a HashSet<String>,
    /// C# property accessors carry the property's declared type in place
    /// of a return type of their own.
    pub property_return_type: Option<&'a str>,
}

#[derive(Default)]
struct Scan {
    attribute_used: bool,
    non_primitive_attribute_external: bool,
    modified_attributes: BTreeSet<String>,
    parameter_ref_changed: bool,
    non_primitive_local_or_parameter_changed: bool,
    /// Locals/parameters whose value came from a constructor invocation.
    constructed_names: BTreeSet<String>,
    function_calls: Vec<String>,
    method_calls: Vec<String>,
    constructor_calls: Vec<String>,
    external_function_calls: usize,
    external_method_calls: usize,
}

/// A `src:name` reduced to its identifier chain.
struct NameRef {
    /// Identifier segments with a leading `this` stripped.
    segments: Vec<String>,
    namespace_qualified: bool,
    this_prefixed: bool,
}

impl NameRef {
    /// The base identifier a value use resolves to. `None` for a bare
    /// `this`.
    fn value_base(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    fn is_bare_this(&self) -> bool {
        self.this_prefixed && self.segments.is_empty()
    }
}

impl MethodAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(MethodAnalyzer {
            local_decls: compile(".//src:decl_stmt/src:decl")?,
            control_decls: compile(".//src:control/src:init/src:decl")?,
            returns: compile(".//src:return")?,
            exprs: compile(".//src:expr")?,
        })
    }

    pub fn analyze(&self, primitives: &PrimitiveTypes, input: MethodInput<'_, '_>) -> Method {
        let element = input.element;
        let language = input.language;
        let kind = local_name(element);

        let mut method = Method {
            unit_index: input.unit_index,
            xpath: input.xpath.clone(),
            is_constructor_destructor: kind == "constructor" || kind == "destructor",
            is_destructor: kind == "destructor",
            ..Default::default()
        };

        method.name = first_child_named(element, "name")
            .map(|n| element_text(n).trim().to_string())
            .unwrap_or_default();

        method.return_type_raw = match input.property_return_type {
            Some(t) => t.trim().to_string(),
            None => first_child_named(element, "type")
                .map(|t| element_text(t).trim().to_string())
                .unwrap_or_default(),
        };
        method.return_type_parsed = normalize::parse_return_type(&method.return_type_raw, language);

        method.is_const = language == Language::Cpp
            && child_elements(element)
                .into_iter()
                .any(|c| local_name(c) == "specifier" && element_text(c).trim() == "const");

        // Parameters.
        let mut by_ref_params: BTreeSet<String> = BTreeSet::new();
        if let Some(list) = first_child_named(element, "parameter_list") {
            method.parameters_list = element_text(list).trim().to_string();
            for parameter in child_elements(list) {
                if local_name(parameter) != "parameter" {
                    continue;
                }
                let Some(decl) = first_child_named(parameter, "decl") else {
                    continue;
                };
                let type_text = first_child_named(decl, "type")
                    .map(|t| element_text(t).trim().to_string())
                    .unwrap_or_default();
                let Some(name_el) = first_child_named(decl, "name") else {
                    continue;
                };
                let name = normalize::declared_name(&element_text(name_el), language);
                if passes_by_mutable_reference(&type_text, language) {
                    by_ref_params.insert(name.clone());
                }
                method.parameters.push(Variable::typed(
                    name,
                    type_text,
                    language,
                    primitives,
                    input.class_bare_name,
                ));
            }
        }

        let body = first_child_named(element, "block");
        method.is_empty = match body {
            None => true,
            Some(block) => {
                let content = first_child_named(block, "block_content").unwrap_or(block);
                !child_elements(content)
                    .into_iter()
                    .any(|c| local_name(c) != "comment")
            }
        };

        let mut scan = Scan::default();

        // Locals, with `<type ref="prev"/>` resolved across declarator
        // sequences sharing one concrete type.
        if let Some(block) = body {
            for decls in [
                evaluate_elements(&self.local_decls, block),
                evaluate_elements(&self.control_decls, block),
            ] {
                let mut prev_type = String::new();
                for decl in decls {
                    let Some(name_el) = first_child_named(decl, "name") else {
                        continue;
                    };
                    let name = normalize::declared_name(&element_text(name_el), language);
                    let type_text = match first_child_named(decl, "type") {
                        Some(t) if t.attribute_value("ref") == Some("prev") => prev_type.clone(),
                        Some(t) => {
                            let text = element_text(t).trim().to_string();
                            prev_type = text.clone();
                            text
                        }
                        None => String::new(),
                    };
                    if local_is_constructed(decl, &type_text, language, primitives) {
                        scan.constructed_names.insert(name.clone());
                    }
                    method.locals.push(Variable::typed(
                        name,
                        type_text,
                        language,
                        primitives,
                        input.class_bare_name,
                    ));
                }
            }
        }

        let mut locals_and_parameters: BTreeMap<String, Variable> = BTreeMap::new();
        for var in method.parameters.iter().chain(method.locals.iter()) {
            locals_and_parameters.insert(var.name.clone(), var.clone());
        }

        let return_type_base = primitives
            .non_primitive_base(&method.return_type_raw, language)
            .unwrap_or_default();
        let call_ctx = CallContext {
            language,
            class_bare_name: input.class_bare_name,
            class_methods: input.class_methods,
            attributes: input.attribute_scope,
            locals_and_parameters: &locals_and_parameters,
            return_type_base: &return_type_base,
            return_type_non_primitive: !return_type_base.is_empty(),
        };

        // One pass over every expression in the body.
        if let Some(block) = body {
            for expr in evaluate_elements(&self.exprs, block) {
                self.scan_expr(
                    expr,
                    &mut scan,
                    &call_ctx,
                    input.attribute_scope,
                    &locals_and_parameters,
                    &by_ref_params,
                );
            }

            // Return expressions.
            let mut returns_with_expr = 0usize;
            let mut constructing_returns = 0usize;
            for ret in evaluate_elements(&self.returns, block) {
                let Some(expr) = first_child_named(ret, "expr") else {
                    continue;
                };
                let shape = classify_return(expr, &scan, &call_ctx, input.attribute_scope);
                if shape.yields_value {
                    returns_with_expr += 1;
                }
                if shape.simple_attribute {
                    method.attribute_returned = true;
                } else if shape.yields_value {
                    method.attribute_not_returned = true;
                }
                if shape.constructs {
                    constructing_returns += 1;
                }
            }
            if call_ctx.return_type_non_primitive && returns_with_expr > 0 {
                method.is_factory = constructing_returns > 0;
                method.is_strict_factory = constructing_returns == returns_with_expr;
            }
        }

        method.attribute_used = scan.attribute_used;
        method.non_primitive_attribute_external = scan.non_primitive_attribute_external;
        method.attributes_modified = scan.modified_attributes.len();
        method.parameter_ref_changed = scan.parameter_ref_changed;
        method.non_primitive_local_or_parameter_changed =
            scan.non_primitive_local_or_parameter_changed;
        method.function_calls = scan.function_calls;
        method.method_calls = scan.method_calls;
        method.constructor_calls = scan.constructor_calls;
        method.external_function_calls = scan.external_function_calls;
        method.external_method_calls = scan.external_method_calls;

        method.non_primitive_local_external =
            method.locals.iter().any(|v| v.is_external_non_primitive);
        method.non_primitive_parameter_external = method
            .parameters
            .iter()
            .any(|v| v.is_external_non_primitive);
        method.non_primitive_return_external = !return_type_base.is_empty()
            && normalize::split_generic(&return_type_base).0 != input.class_bare_name;

        method
    }

    fn scan_expr(
        &self,
        expr: Element<'_>,
        scan: &mut Scan,
        call_ctx: &CallContext<'_>,
        attributes: &BTreeMap<String, Variable>,
        locals_and_parameters: &BTreeMap<String, Variable>,
        by_ref_params: &BTreeSet<String>,
    ) {
        let children = child_elements(expr);
        for (i, child) in children.iter().enumerate() {
            match local_name(*child) {
                "name" => {
                    let name_ref = resolve_name(*child);
                    register_value_use(&name_ref, scan, attributes);
                }
                "operator" => {
                    let op = element_text(*child);
                    let op = op.trim();
                    if ASSIGNMENT_OPS.contains(&op) {
                        let target = children[..i]
                            .iter()
                            .rev()
                            .find(|c| local_name(**c) == "name");
                        if let Some(target) = target {
                            let rhs_has_new = children[i + 1..].iter().any(|c| {
                                local_name(*c) == "operator" && element_text(*c).trim() == "new"
                            });
                            register_assignment(
                                &resolve_name(*target),
                                rhs_has_new,
                                scan,
                                attributes,
                                locals_and_parameters,
                                by_ref_params,
                            );
                        }
                    } else if op == "++" || op == "--" {
                        let adjacent = children[..i]
                            .iter()
                            .rev()
                            .chain(children[i + 1..].iter())
                            .find(|c| local_name(**c) == "name");
                        if let Some(target) = adjacent {
                            register_assignment(
                                &resolve_name(*target),
                                false,
                                scan,
                                attributes,
                                locals_and_parameters,
                                by_ref_params,
                            );
                        }
                    }
                }
                "call" => {
                    let preceded_by_new = i > 0
                        && local_name(children[i - 1]) == "operator"
                        && element_text(children[i - 1]).trim() == "new";
                    self.register_call(*child, preceded_by_new, scan, call_ctx, attributes);
                }
                _ => {}
            }
        }
    }

    fn register_call(
        &self,
        call: Element<'_>,
        preceded_by_new: bool,
        scan: &mut Scan,
        call_ctx: &CallContext<'_>,
        attributes: &BTreeMap<String, Variable>,
    ) {
        let Some(name_el) = first_child_named(call, "name") else {
            return;
        };
        let name_ref = resolve_name(name_el);
        if name_ref.this_prefixed {
            scan.attribute_used = true;
        }

        let (receiver, invoked) = match name_ref.segments.as_slice() {
            [] => return,
            [only] => (None, only.clone()),
            [first, .., last] => (Some(first.clone()), last.clone()),
        };

        // The receiver is an expression-level use of its name.
        if let Some(receiver) = &receiver {
            if !name_ref.namespace_qualified {
                register_base_use(receiver, scan, attributes);
            }
        }

        let site = CallSite {
            receiver,
            name: invoked,
            namespace_qualified: name_ref.namespace_qualified,
            preceded_by_new,
        };
        match classify_call(&site, call_ctx) {
            CallKind::Ignored => {}
            CallKind::Constructor => scan.constructor_calls.push(site.name),
            CallKind::IntraClass => scan.function_calls.push(site.name),
            CallKind::OnAttribute => scan.method_calls.push(site.name),
            CallKind::ExternalMethod => scan.external_method_calls += 1,
            CallKind::ExternalFunction => scan.external_function_calls += 1,
        }
    }

}

/// How one return expression reads.
struct ReturnShape {
    /// The return carries an expression at all.
    yields_value: bool,
    /// The sole subexpression is an attribute name (never bare `this`).
    simple_attribute: bool,
    /// The returned value comes from a constructor invocation, directly
    /// or through a constructed local/parameter.
    constructs: bool,
}

fn classify_return(
    expr: Element<'_>,
    scan: &Scan,
    call_ctx: &CallContext<'_>,
    attributes: &BTreeMap<String, Variable>,
) -> ReturnShape {
    let children = child_elements(expr);
    let yields_value = !children.is_empty() || !element_text(expr).trim().is_empty();
    let sole_name = (children.len() == 1 && local_name(children[0]) == "name")
        .then(|| resolve_name(children[0]));

    let simple_attribute = match &sole_name {
        Some(name_ref) if !name_ref.is_bare_this() => name_ref
            .value_base()
            .map(|base| base != "this" && attributes.contains_key(base))
            .unwrap_or(false),
        _ => false,
    };

    let constructs = expr_contains_new(expr)
        || sole_name
            .as_ref()
            .and_then(|n| n.value_base())
            .map(|base| scan.constructed_names.contains(base))
            .unwrap_or(false)
        || returns_temporary(&children, call_ctx);

    ReturnShape {
        yields_value,
        simple_attribute,
        constructs,
    }
}

/// Whether a C++ return expression constructs a temporary of the method's
/// return type (or the class itself) with plain call syntax.
fn returns_temporary(expr_children: &[Element<'_>], call_ctx: &CallContext<'_>) -> bool {
    if call_ctx.language != Language::Cpp || expr_children.len() != 1 {
        return false;
    }
    let child = expr_children[0];
    if local_name(child) != "call" {
        return false;
    }
    let Some(name_el) = first_child_named(child, "name") else {
        return false;
    };
    let name_ref = resolve_name(name_el);
    if name_ref.namespace_qualified || name_ref.segments.len() != 1 {
        return false;
    }
    let name = &name_ref.segments[0];
    name == call_ctx.return_type_base
        || (!call_ctx.class_bare_name.is_empty() && name == call_ctx.class_bare_name)
}

fn register_value_use(
    name_ref: &NameRef,
    scan: &mut Scan,
    attributes: &BTreeMap<String, Variable>,
) {
    if name_ref.is_bare_this() {
        scan.attribute_used = true;
        return;
    }
    if name_ref.this_prefixed {
        scan.attribute_used = true;
    }
    if let Some(base) = name_ref.value_base() {
        register_base_use(base, scan, attributes);
    }
}

fn register_base_use(base: &str, scan: &mut Scan, attributes: &BTreeMap<String, Variable>) {
    if let Some(var) = attributes.get(base) {
        scan.attribute_used = true;
        if var.is_external_non_primitive {
            scan.non_primitive_attribute_external = true;
        }
    }
}

fn register_assignment(
    target: &NameRef,
    rhs_has_new: bool,
    scan: &mut Scan,
    attributes: &BTreeMap<String, Variable>,
    locals_and_parameters: &BTreeMap<String, Variable>,
    by_ref_params: &BTreeSet<String>,
) {
    if target.is_bare_this() {
        return;
    }
    let Some(base) = target.value_base() else {
        return;
    };
    if let Some(var) = attributes.get(base) {
        scan.modified_attributes.insert(base.to_string());
        scan.attribute_used = true;
        if var.is_external_non_primitive {
            scan.non_primitive_attribute_external = true;
        }
        if rhs_has_new {
            scan.constructed_names.insert(base.to_string());
        }
        return;
    }
    if let Some(var) = locals_and_parameters.get(base) {
        if var.is_non_primitive {
            scan.non_primitive_local_or_parameter_changed = true;
        }
        if by_ref_params.contains(base) {
            scan.parameter_ref_changed = true;
        }
        if rhs_has_new {
            scan.constructed_names.insert(base.to_string());
        }
    }
}

/// Reduces a `src:name` element to its identifier chain: segment texts
/// (generic arguments and array indexes trimmed), whether it was
/// namespace-qualified, and whether it was `this`-prefixed.
fn resolve_name(name_el: Element<'_>) -> NameRef {
    let children = child_elements(name_el);
    let mut segments: Vec<String> = Vec::new();
    let mut namespace_qualified = false;
    if children.is_empty() {
        segments.push(sanitize_segment(&element_text(name_el)));
    } else {
        for child in children {
            match local_name(child) {
                "name" => segments.push(sanitize_segment(&element_text(child))),
                "operator" if element_text(child).trim() == "::" => namespace_qualified = true,
                _ => {}
            }
        }
        if segments.is_empty() {
            segments.push(sanitize_segment(&element_text(name_el)));
        }
    }
    let this_prefixed = segments.first().map(|s| s == "this").unwrap_or(false);
    if this_prefixed {
        segments.remove(0);
    }
    NameRef {
        segments: segments.into_iter().filter(|s| !s.is_empty()).collect(),
        namespace_qualified,
        this_prefixed,
    }
}

/// Cuts a segment at generic or index brackets: `items[2]` → `items`,
/// `make<T>` → `make`.
fn sanitize_segment(raw: &str) -> String {
    let trimmed = raw.trim();
    let cut = trimmed
        .find(['<', '['])
        .map(|idx| &trimmed[..idx])
        .unwrap_or(trimmed);
    cut.trim().to_string()
}

/// Whether a local declaration's initialiser constructs its value.
fn local_is_constructed(
    decl: Element<'_>,
    type_text: &str,
    language: Language,
    primitives: &PrimitiveTypes,
) -> bool {
    // C++ direct initialisation: `Widget w(1, 2);`
    if language == Language::Cpp && first_child_named(decl, "argument_list").is_some() {
        return true;
    }
    let Some(init) = first_child_named(decl, "init") else {
        return false;
    };
    let Some(expr) = first_child_named(init, "expr") else {
        return false;
    };
    if expr_contains_new(expr) {
        return true;
    }
    // C++ copy initialisation from a temporary: `Widget w = Widget(1);`
    if language == Language::Cpp {
        if let Some(base) = primitives.non_primitive_base(type_text, language) {
            let children = child_elements(expr);
            if children.len() == 1 && local_name(children[0]) == "call" {
                if let Some(name_el) = first_child_named(children[0], "name") {
                    let name_ref = resolve_name(name_el);
                    if name_ref.segments.len() == 1 && name_ref.segments[0] == base {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Whether any `new` operator occurs in the subtree.
fn expr_contains_new(el: Element<'_>) -> bool {
    for child in child_elements(el) {
        if local_name(child) == "operator" && element_text(child).trim() == "new" {
            return true;
        }
        if expr_contains_new(child) {
            return true;
        }
    }
    false
}

/// Whether a parameter's declared type lets the callee mutate the caller's
/// argument: non-const reference in C++, `ref`/`out` in C#.
fn passes_by_mutable_reference(type_text: &str, language: Language) -> bool {
    match language {
        Language::Cpp => {
            type_text.contains('&')
                && !type_text.split_whitespace().any(|tok| tok == "const")
        }
        Language::CSharp => type_text
            .split_whitespace()
            .any(|tok| tok == "ref" || tok == "out"),
        Language::Java => false,
    }
}
