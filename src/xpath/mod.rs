//! XPath compilation and evaluation over the srcML DOM.
//!
//! Catalog expressions are compiled once per run. Evaluation failures are
//! mapped to empty results at every call site: a query that finds nothing
//! is meaningful (an anonymous class has no name, an interface has no
//! attributes), so the engine proceeds instead of aborting.

pub mod catalog;

pub use self::catalog::{xpath_for, QueryKind};

use crate::core::{Language, Result, StereomapError};
use std::collections::HashMap;
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value, XPath};

/// The srcML source namespace; registered under the `src` prefix for every
/// evaluation.
pub const SRC_NAMESPACE: &str = "http://www.srcML.org/srcML/src";

/// Compiles a single expression, surfacing failures as catalog errors.
pub fn compile(expr: &str) -> Result<XPath> {
    let factory = Factory::new();
    match factory.build(expr) {
        Ok(Some(xpath)) => Ok(xpath),
        Ok(None) => Err(StereomapError::Catalog {
            kind: expr.to_string(),
            message: "expression compiled to nothing".to_string(),
        }),
        Err(e) => Err(StereomapError::Catalog {
            kind: expr.to_string(),
            message: format!("{e:?}"),
        }),
    }
}

fn src_context<'d>() -> Context<'d> {
    let mut context = Context::new();
    context.set_namespace("src", SRC_NAMESPACE);
    context
}

/// Evaluates an expression, returning the matched nodes in document order.
/// Errors and non-nodeset results become empty.
pub fn evaluate_nodes<'d, N>(xpath: &XPath, node: N) -> Vec<Node<'d>>
where
    N: Into<Node<'d>>,
{
    let context = src_context();
    match xpath.evaluate(&context, node) {
        Ok(Value::Nodeset(nodes)) => nodes.document_order(),
        Ok(_) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = ?e, "xpath evaluation failed; treated as no results");
            Vec::new()
        }
    }
}

/// Like [`evaluate_nodes`], keeping only element nodes.
pub fn evaluate_elements<'d, N>(xpath: &XPath, node: N) -> Vec<Element<'d>>
where
    N: Into<Node<'d>>,
{
    evaluate_nodes(xpath, node)
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// The catalog with every expression compiled, built once per run and
/// shared read-only through the analysis context.
pub struct CompiledCatalog {
    queries: HashMap<(Language, QueryKind), XPath>,
}

impl CompiledCatalog {
    pub fn new() -> Result<Self> {
        let mut queries = HashMap::new();
        for language in Language::ALL {
            for kind in QueryKind::ALL {
                if let Some(expr) = xpath_for(language, kind) {
                    let xpath = compile(expr).map_err(|e| match e {
                        StereomapError::Catalog { message, .. } => StereomapError::Catalog {
                            kind: format!("{language}/{}", kind.as_str()),
                            message,
                        },
                        other => other,
                    })?;
                    queries.insert((language, kind), xpath);
                }
            }
        }
        Ok(Self { queries })
    }

    pub fn get(&self, language: Language, kind: QueryKind) -> Option<&XPath> {
        self.queries.get(&(language, kind))
    }

    /// Runs a catalog query against a context element. A kind the language
    /// lacks yields no results.
    pub fn query<'d>(
        &self,
        language: Language,
        kind: QueryKind,
        context: Element<'d>,
    ) -> Vec<Element<'d>> {
        match self.get(language, kind) {
            Some(xpath) => evaluate_elements(xpath, context),
            None => Vec::new(),
        }
    }
}

/// The root element of a parsed document, if any.
pub fn document_root<'d>(doc: &Document<'d>) -> Option<Element<'d>> {
    doc.root().children().into_iter().find_map(|c| match c {
        ChildOfRoot::Element(e) => Some(e),
        _ => None,
    })
}

/// Concatenated text of an element's subtree, in document order.
pub fn element_text(el: Element<'_>) -> String {
    let mut out = String::new();
    collect_text(el, &mut out);
    out
}

fn collect_text(el: Element<'_>, out: &mut String) {
    for child in el.children() {
        match child {
            ChildOfElement::Text(t) => out.push_str(t.text()),
            ChildOfElement::Element(e) => collect_text(e, out),
            _ => {}
        }
    }
}

/// Direct element children, in document order.
pub fn child_elements(el: Element<'_>) -> Vec<Element<'_>> {
    el.children()
        .into_iter()
        .filter_map(|c| match c {
            ChildOfElement::Element(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// First direct child element with the given srcML local name.
pub fn first_child_named<'d>(el: Element<'d>, name: &str) -> Option<Element<'d>> {
    child_elements(el)
        .into_iter()
        .find(|e| e.name().local_part() == name)
}

/// All direct child elements with the given srcML local name.
pub fn children_named<'d>(el: Element<'d>, name: &str) -> Vec<Element<'d>> {
    child_elements(el)
        .into_iter()
        .filter(|e| e.name().local_part() == name)
        .collect()
}

pub fn local_name<'d>(el: Element<'d>) -> &'d str {
    el.name().local_part()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxd_document::parser;

    const DOC: &str = r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++"><class>class <name>Foo</name> <block>{<private type="default">
<decl_stmt><decl><type><name>int</name></type> <name>x</name></decl>;</decl_stmt>
</private>}</block>;</class></unit>"#;

    #[test]
    fn queries_resolve_against_srcml_namespace() {
        let package = parser::parse(DOC).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).expect("root element");

        let classes = evaluate_elements(&compile(".//src:class").unwrap(), root);
        assert_eq!(classes.len(), 1);

        let names = evaluate_elements(&compile("src:name").unwrap(), classes[0]);
        assert_eq!(names.len(), 1);
        assert_eq!(element_text(names[0]), "Foo");
    }

    #[test]
    fn catalog_compiles_for_every_language() {
        let catalog = CompiledCatalog::new().expect("catalog compiles");
        for language in Language::ALL {
            assert!(catalog.get(language, QueryKind::ClassSearch).is_some());
        }
    }

    #[test]
    fn catalog_queries_find_attributes() {
        let package = parser::parse(DOC).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).expect("root element");
        let catalog = CompiledCatalog::new().unwrap();

        let classes = catalog.query(Language::Cpp, QueryKind::ClassSearch, root);
        assert_eq!(classes.len(), 1);

        let attr_names = catalog.query(Language::Cpp, QueryKind::AttributeName, classes[0]);
        assert_eq!(attr_names.len(), 1);
        assert_eq!(element_text(attr_names[0]), "x");
    }

    #[test]
    fn positional_filters_compose() {
        let package = parser::parse(DOC).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).expect("root element");

        let xpath = compile("(.//*[self::src:class or self::src:struct])[1]").unwrap();
        assert_eq!(evaluate_elements(&xpath, root).len(), 1);
    }

    #[test]
    fn evaluation_errors_collapse_to_empty() {
        let package = parser::parse(DOC).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).expect("root element");

        // Unbound prefix: an execution failure, not a panic.
        let xpath = compile(".//unbound:thing").unwrap();
        assert!(evaluate_elements(&xpath, root).is_empty());
    }
}
