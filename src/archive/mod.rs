//! The archive driver.
//!
//! Walks the units of a srcML archive in document order, builds class
//! models, merges inherited attributes, runs both classifiers, and writes
//! the `stereotype` attributes back through the annotation map. Units are
//! processed sequentially; all catalog and primitive-table state is
//! read-only once the run starts.

pub mod annotations;

pub use self::annotations::AnnotationMap;

use crate::analyzers::MethodAnalyzer;
use crate::builders::{ClassModelBuilder, ClassOccurrence};
use crate::classify::{classify_class, classify_methods};
use crate::core::{join_labels, InheritanceVisibility, Language, Result, StereomapError};
use crate::model::{ClassModel, Variable};
use crate::primitives::PrimitiveTypes;
use crate::taxonomy::Taxonomy;
use crate::xpath::{
    children_named, compile, document_root, evaluate_elements, local_name, xpath_for,
    CompiledCatalog, QueryKind,
};
use serde::Serialize;
use std::collections::HashMap;
use sxd_document::dom::Element;
use sxd_document::{parser, writer};
use tracing::{debug, info, warn};

/// Everything the engine needs besides the archive itself. Building the
/// context up front keeps the engine reentrant and lets tests construct
/// one directly.
pub struct AnalysisContext {
    pub primitives: PrimitiveTypes,
    pub taxonomy: Taxonomy,
    pub methods_per_class_threshold: usize,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            primitives: PrimitiveTypes::default(),
            taxonomy: Taxonomy::default(),
            methods_per_class_threshold: crate::config::DEFAULT_METHODS_PER_CLASS_THRESHOLD,
        }
    }
}

/// A unit the engine refused to analyse, surfaced as a warning.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedUnit {
    pub index: usize,
    pub language: String,
}

/// The outcome of one engine run.
pub struct EngineRun {
    /// Class models across all units, in document order of first
    /// occurrence.
    pub classes: Vec<ClassModel>,
    pub annotations: AnnotationMap,
    pub skipped_units: Vec<SkippedUnit>,
    /// The serialised annotated archive, when annotation was requested.
    pub annotated_xml: Option<String>,
}

/// Runs the full pipeline over one archive.
pub fn run_engine(xml: &str, ctx: &AnalysisContext, annotate: bool) -> Result<EngineRun> {
    ctx.primitives.validate()?;

    let package =
        parser::parse(xml).map_err(|e| StereomapError::malformed(format!("{e:?}")))?;
    let doc = package.as_document();
    let root = document_root(&doc)
        .ok_or_else(|| StereomapError::malformed("document has no root element"))?;
    if local_name(root) != "unit" {
        return Err(StereomapError::malformed(format!(
            "root element is <{}>, expected a srcML <unit>",
            local_name(root)
        )));
    }

    // An archive nests its units; a bare document is its own single unit.
    let unit_elements = {
        let nested = children_named(root, "unit");
        if nested.is_empty() {
            vec![root]
        } else {
            nested
        }
    };
    info!(units = unit_elements.len(), "processing archive");

    let mut skipped_units = Vec::new();
    let mut units: Vec<(usize, Element<'_>, Option<Language>)> = Vec::new();
    for (index, element) in unit_elements.into_iter().enumerate() {
        let Some(tag) = element.attribute_value("language") else {
            return Err(StereomapError::MissingLanguage { unit: index });
        };
        match tag.parse::<Language>() {
            Ok(language) => units.push((index, element, Some(language))),
            Err(_) => {
                warn!(unit = index, language = tag, "skipping unit with unknown language");
                skipped_units.push(SkippedUnit {
                    index,
                    language: tag.to_string(),
                });
                units.push((index, element, None));
            }
        }
    }

    let catalog = CompiledCatalog::new()?;
    let analyzer = MethodAnalyzer::new()?;
    let builder = ClassModelBuilder::new(&catalog, &ctx.primitives, &analyzer);

    // Pass 1: discover classes and build shells, accumulating repeated
    // declarations (partial classes) onto one model.
    let mut models: Vec<ClassModel> = Vec::new();
    let mut occurrences: Vec<Vec<ClassOccurrence<'_>>> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut anonymous_counter = 0usize;

    for (unit_index, unit_el, language) in &units {
        let Some(language) = *language else { continue };
        let search = xpath_for(language, QueryKind::ClassSearch).unwrap_or_default();
        let class_elements = catalog.query(language, QueryKind::ClassSearch, *unit_el);
        debug!(unit = unit_index, classes = class_elements.len(), "unit scanned");

        for (position, class_el) in class_elements.into_iter().enumerate() {
            let occurrence = ClassOccurrence {
                unit_index: *unit_index,
                element: class_el,
                xpath: format!("({search})[{}]", position + 1),
            };
            let names = builder.names_for(language, class_el);
            let key = if names.bare.is_empty() {
                anonymous_counter += 1;
                format!("{}#anonymous#{anonymous_counter}", language.display_name())
            } else {
                format!("{}#{}", language.display_name(), names.bare)
            };
            match index_by_key.get(&key) {
                Some(&i) => {
                    builder.append_declaration(&mut models[i], &occurrence);
                    occurrences[i].push(occurrence);
                }
                None => {
                    index_by_key.insert(key, models.len());
                    models.push(builder.build_shell(language, &occurrence));
                    occurrences.push(vec![occurrence]);
                }
            }
        }
    }

    // Pass 2: widen attribute scopes with parents' non-private attributes.
    merge_inherited_attributes(&mut models);

    // Pass 3: method analysis, now that scopes are complete.
    for (model, occs) in models.iter_mut().zip(&occurrences) {
        builder.build_methods(model, occs);
    }

    // Pass 4: classification.
    for model in &mut models {
        classify_methods(model);
        classify_class(model, ctx.methods_per_class_threshold);
        debug!(
            class = %model.names.bare,
            labels = %join_labels(&model.stereotypes),
            methods = model.methods.len(),
            "class classified"
        );
    }

    // Pass 5: taxonomy validation of everything about to be emitted.
    for model in &models {
        ctx.taxonomy.check_class_labels(&model.stereotypes)?;
        for method in &model.methods {
            ctx.taxonomy.check_method_labels(&method.stereotypes)?;
        }
    }

    // Pass 6: record annotations.
    let mut annotation_map = AnnotationMap::default();
    for model in &models {
        let class_labels = join_labels(&model.stereotypes);
        for (unit_index, xpaths) in &model.xpaths_by_unit {
            for xpath in xpaths {
                annotation_map.record(*unit_index, xpath.clone(), class_labels.clone());
            }
        }
        for method in &model.methods {
            annotation_map.record(
                method.unit_index,
                method.xpath.clone(),
                join_labels(&method.stereotypes),
            );
        }
    }

    // Pass 7: apply annotations and serialise the copy.
    let annotated_xml = if annotate {
        for (unit_index, unit_el, _) in &units {
            for (xpath, labels) in annotation_map.for_unit(*unit_index) {
                let compiled = compile(xpath)?;
                match evaluate_elements(&compiled, *unit_el).into_iter().next() {
                    Some(element) => {
                        element.set_attribute_value("stereotype", labels);
                    }
                    None => warn!(unit = unit_index, xpath, "annotation target not found"),
                }
            }
        }
        let mut out = Vec::new();
        writer::format_document(&doc, &mut out).map_err(|e| {
            StereomapError::malformed(format!("serialising annotated archive: {e}"))
        })?;
        Some(String::from_utf8(out).map_err(|e| {
            StereomapError::malformed(format!("annotated archive is not UTF-8: {e}"))
        })?)
    } else {
        None
    };

    info!(
        classes = models.len(),
        annotations = annotation_map.len(),
        "archive processed"
    );

    Ok(EngineRun {
        classes: models,
        annotations: annotation_map,
        skipped_units,
        annotated_xml,
    })
}

/// Adds parents' non-private attributes to each child's inherited map,
/// for parents declared in a unit the child also appears in. Runs to a
/// fixpoint so grandparent attributes flow through.
fn merge_inherited_attributes(models: &mut [ClassModel]) {
    let mut changed = true;
    while changed {
        changed = false;
        for child in 0..models.len() {
            let additions = inherited_additions(models, child);
            if additions.is_empty() {
                continue;
            }
            changed = true;
            for (name, variable) in additions {
                models[child]
                    .non_private_and_inherited
                    .insert(name, variable);
            }
        }
    }
}

fn inherited_additions(models: &[ClassModel], child: usize) -> Vec<(String, Variable)> {
    let child_model = &models[child];
    let mut additions = Vec::new();
    for (parent_name, visibility) in &child_model.parents {
        if *visibility == InheritanceVisibility::Private {
            continue;
        }
        let (parent_bare, _) = crate::normalize::split_generic(parent_name);
        let parent = models.iter().enumerate().find(|(i, m)| {
            *i != child
                && m.language == child_model.language
                && m.names.bare == parent_bare
                && m.xpaths_by_unit
                    .keys()
                    .any(|u| child_model.xpaths_by_unit.contains_key(u))
        });
        if let Some((_, parent)) = parent {
            for (name, variable) in &parent.non_private_and_inherited {
                if !child_model.attributes.contains_key(name)
                    && !child_model.non_private_and_inherited.contains_key(name)
                    && !additions.iter().any(|(n, _)| n == name)
                {
                    additions.push((name.clone(), variable.clone()));
                }
            }
        }
    }
    additions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(units: &[(&str, &str)]) -> String {
        let mut out =
            String::from(r#"<unit xmlns="http://www.srcML.org/srcML/src" revision="1.0.0">"#);
        for (language, body) in units {
            out.push_str(&format!(r#"<unit language="{language}">{body}</unit>"#));
        }
        out.push_str("</unit>");
        out
    }

    const SIMPLE_CLASS: &str = "<class>class <name>Point</name> <block>{<public>public:\
<decl_stmt><decl><type><name>int</name></type> <name>x</name></decl>;</decl_stmt>\
</public>}</block>;</class>";

    #[test]
    fn malformed_xml_is_fatal() {
        let ctx = AnalysisContext::default();
        assert!(matches!(
            run_engine("<unit", &ctx, false),
            Err(StereomapError::MalformedArchive { .. })
        ));
    }

    #[test]
    fn missing_language_is_fatal() {
        let ctx = AnalysisContext::default();
        let xml = r#"<unit xmlns="http://www.srcML.org/srcML/src"><unit><class>class <name>A</name> <block>{}</block>;</class></unit></unit>"#;
        assert!(matches!(
            run_engine(xml, &ctx, false),
            Err(StereomapError::MissingLanguage { unit: 0 })
        ));
    }

    #[test]
    fn unknown_language_units_are_skipped_with_a_warning() {
        let ctx = AnalysisContext::default();
        let xml = archive(&[("Rust", "<class/>"), ("C++", SIMPLE_CLASS)]);
        let run = run_engine(&xml, &ctx, false).unwrap();
        assert_eq!(run.skipped_units.len(), 1);
        assert_eq!(run.skipped_units[0].index, 0);
        assert_eq!(run.skipped_units[0].language, "Rust");
        assert_eq!(run.classes.len(), 1);
        assert_eq!(run.classes[0].names.bare, "Point");
    }

    #[test]
    fn non_unit_roots_are_rejected() {
        let ctx = AnalysisContext::default();
        assert!(matches!(
            run_engine("<html/>", &ctx, false),
            Err(StereomapError::MalformedArchive { .. })
        ));
    }

    #[test]
    fn single_unit_documents_work_without_nesting() {
        let ctx = AnalysisContext::default();
        let xml = format!(
            r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++">{SIMPLE_CLASS}</unit>"#
        );
        let run = run_engine(&xml, &ctx, false).unwrap();
        assert_eq!(run.classes.len(), 1);
        assert!(!run.annotations.is_empty());
    }

    #[test]
    fn inherited_non_private_attributes_reach_subclasses() {
        let base = "<class>class <name>Base</name> <block>{<protected>protected:\
<decl_stmt><decl><type><name>int</name></type> <name>shared</name></decl>;</decl_stmt>\
</protected>}</block>;</class>";
        let derived = "<class>class <name>Derived</name> <super_list>: \
<super><specifier>public</specifier> <name>Base</name></super></super_list> \
<block>{<public>public:\
<function><type><name>int</name></type> <name>peek</name><parameter_list>()</parameter_list> \
<block>{<block_content> <return>return <expr><name>shared</name></expr>;</return> \
</block_content>}</block></function>\
</public>}</block>;</class>";
        let ctx = AnalysisContext::default();
        let body = format!("{base}{derived}");
        let xml = archive(&[("C++", body.as_str())]);
        let run = run_engine(&xml, &ctx, false).unwrap();

        let derived_model = run
            .classes
            .iter()
            .find(|c| c.names.bare == "Derived")
            .unwrap();
        assert!(derived_model
            .non_private_and_inherited
            .contains_key("shared"));
        // `return shared;` reads like a getter thanks to the inherited
        // attribute.
        assert!(derived_model.methods[0].attribute_returned);
    }
}
