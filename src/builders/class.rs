//! Builds [`ClassModel`]s from class elements.
//!
//! The builder runs the catalog queries for one class occurrence and folds
//! the results into the model. Partial classes (C#) call
//! [`ClassModelBuilder::append_declaration`] once per occurrence; names and
//! types are zipped positionally per occurrence, so the accumulated
//! attribute map stays aligned. Method analysis runs in a separate phase,
//! after inherited attributes have been merged.

use crate::analyzers::{MethodAnalyzer, MethodInput};
use crate::core::{InheritanceVisibility, Language, StructureKind};
use crate::model::{ClassModel, ClassNames, Variable};
use crate::normalize;
use crate::primitives::PrimitiveTypes;
use crate::xpath::{
    element_text, first_child_named, local_name, xpath_for, CompiledCatalog, QueryKind,
};
use std::collections::{BTreeMap, HashSet};
use sxd_document::dom::Element;

/// One appearance of a class in the archive. Partial classes have several.
pub struct ClassOccurrence<'d> {
    pub unit_index: usize,
    pub element: Element<'d>,
    /// Address of this class element relative to its unit.
    pub xpath: String,
}

pub struct ClassModelBuilder<'a> {
    catalog: &'a CompiledCatalog,
    primitives: &'a PrimitiveTypes,
    analyzer: &'a MethodAnalyzer,
}

impl<'a> ClassModelBuilder<'a> {
    pub fn new(
        catalog: &'a CompiledCatalog,
        primitives: &'a PrimitiveTypes,
        analyzer: &'a MethodAnalyzer,
    ) -> Self {
        Self {
            catalog,
            primitives,
            analyzer,
        }
    }

    /// Builds the structural shell for a class's first occurrence.
    pub fn build_shell(
        &self,
        language: Language,
        occurrence: &ClassOccurrence<'_>,
    ) -> ClassModel {
        let names = self.names_for(language, occurrence.element);
        let structure = self.structure_kind(language, occurrence.element);
        let mut model = ClassModel::new(language, names, structure);
        self.append_declaration(&mut model, occurrence);
        model
    }

    /// Folds one occurrence's parents and attributes into the model and
    /// records its address.
    pub fn append_declaration(&self, model: &mut ClassModel, occurrence: &ClassOccurrence<'_>) {
        model
            .xpaths_by_unit
            .entry(occurrence.unit_index)
            .or_default()
            .push(occurrence.xpath.clone());

        self.collect_parents(model, occurrence.element);
        self.collect_attributes(
            model,
            occurrence.element,
            QueryKind::AttributeName,
            QueryKind::AttributeType,
            false,
        );
        self.collect_attributes(
            model,
            occurrence.element,
            QueryKind::NonPrivateAttributeName,
            QueryKind::NonPrivateAttributeType,
            true,
        );
    }

    /// The four name forms for a class element; the driver also uses this
    /// to key partial-class accumulation.
    pub fn names_for(&self, language: Language, class_el: Element<'_>) -> ClassNames {
        let found = self
            .catalog
            .query(language, QueryKind::ClassName, class_el)
            .into_iter()
            .next();
        let Some(name_el) = found else {
            return ClassNames::anonymous();
        };
        let raw = element_text(name_el);
        let trimmed = raw.trim().to_string();
        let (left, generic) = normalize::split_generic(&trimmed);
        let bare = normalize::remove_namespace(left, language).to_string();
        let generics_stripped = match generic {
            Some(generic) => format!("{bare}{}", normalize::strip_generic_contents(generic)),
            None => bare.clone(),
        };
        ClassNames {
            raw,
            trimmed,
            generics_stripped,
            bare,
        }
    }

    fn structure_kind(&self, language: Language, class_el: Element<'_>) -> StructureKind {
        let element = self
            .catalog
            .query(language, QueryKind::ClassType, class_el)
            .into_iter()
            .next()
            .unwrap_or(class_el);
        match local_name(element) {
            "struct" => StructureKind::Struct,
            "interface" => StructureKind::Interface,
            _ => StructureKind::Class,
        }
    }

    fn collect_parents(&self, model: &mut ClassModel, class_el: Element<'_>) {
        let language = model.language;
        for super_el in self
            .catalog
            .query(language, QueryKind::ParentName, class_el)
        {
            let Some(name_el) = first_child_named(super_el, "name") else {
                continue;
            };
            let text = element_text(name_el);
            let trimmed = text.trim();
            let (left, generic) = normalize::split_generic(trimmed);
            let key = format!(
                "{}{}",
                normalize::remove_namespace(left, language),
                generic.unwrap_or("")
            );

            let visibility = if language == Language::Cpp {
                first_child_named(super_el, "specifier")
                    .map(|s| match element_text(s).trim() {
                        "public" => InheritanceVisibility::Public,
                        "protected" => InheritanceVisibility::Protected,
                        _ => InheritanceVisibility::Private,
                    })
                    .unwrap_or_else(|| model.structure.default_inheritance())
            } else {
                InheritanceVisibility::Public
            };

            if !model.parents.iter().any(|(name, _)| name == &key) {
                model.parents.push((key, visibility));
            }
        }
    }

    fn collect_attributes(
        &self,
        model: &mut ClassModel,
        class_el: Element<'_>,
        name_kind: QueryKind,
        type_kind: QueryKind,
        non_private: bool,
    ) {
        let language = model.language;
        let names = self.catalog.query(language, name_kind, class_el);
        let types = self.catalog.query(language, type_kind, class_el);

        let mut prev_type = String::new();
        for (name_el, type_el) in names.into_iter().zip(types) {
            let name = normalize::declared_name(element_text(name_el).trim(), language);
            let type_text = if type_el.attribute_value("ref") == Some("prev") {
                prev_type.clone()
            } else {
                let text = element_text(type_el).trim().to_string();
                prev_type = text.clone();
                text
            };
            let variable = Variable::typed(
                name.clone(),
                type_text,
                language,
                self.primitives,
                &model.names.bare,
            );
            if non_private {
                model.non_private_and_inherited.insert(name, variable);
            } else {
                model.attributes.insert(name, variable);
            }
        }
    }

    /// Analyses every method of every occurrence, including C# property
    /// accessors. Call after the inherited-attribute merge so the scope is
    /// complete.
    pub fn build_methods(&self, model: &mut ClassModel, occurrences: &[ClassOccurrence<'_>]) {
        let language = model.language;
        let scope = model.attribute_scope();
        let class_methods = self.collect_method_names(language, occurrences);

        let method_query = xpath_for(language, QueryKind::Method).unwrap_or_default();
        for occurrence in occurrences {
            let elements =
                self.catalog
                    .query(language, QueryKind::Method, occurrence.element);
            for (i, element) in elements.into_iter().enumerate() {
                let xpath = format!("({}/{})[{}]", occurrence.xpath, method_query, i + 1);
                let method = self.analyzer.analyze(
                    self.primitives,
                    MethodInput {
                        element,
                        language,
                        unit_index: occurrence.unit_index,
                        xpath,
                        class_bare_name: &model.names.bare,
                        attribute_scope: &scope,
                        class_methods: &class_methods,
                        property_return_type: None,
                    },
                );
                model.methods.push(method);
            }

            self.build_property_methods(model, occurrence, &scope, &class_methods);
        }
    }

    /// C# property accessors become methods whose return type is the
    /// property's declared type and whose address nests in the property.
    fn build_property_methods(
        &self,
        model: &mut ClassModel,
        occurrence: &ClassOccurrence<'_>,
        scope: &BTreeMap<String, Variable>,
        class_methods: &HashSet<String>,
    ) {
        let language = model.language;
        let Some(property_query) = xpath_for(language, QueryKind::Property) else {
            return;
        };
        let accessor_query = xpath_for(language, QueryKind::PropertyMethod).unwrap_or_default();

        let properties = self
            .catalog
            .query(language, QueryKind::Property, occurrence.element);
        for (p, property) in properties.into_iter().enumerate() {
            let type_text = self
                .catalog
                .query(language, QueryKind::PropertyType, property)
                .into_iter()
                .next()
                .map(|t| element_text(t).trim().to_string());
            let Some(type_text) = type_text else {
                continue;
            };
            let property_xpath = format!("({}/{})[{}]", occurrence.xpath, property_query, p + 1);
            let accessors = self
                .catalog
                .query(language, QueryKind::PropertyMethod, property);
            for (j, accessor) in accessors.into_iter().enumerate() {
                let xpath = format!("({property_xpath}/{accessor_query})[{}]", j + 1);
                let method = self.analyzer.analyze(
                    self.primitives,
                    MethodInput {
                        element: accessor,
                        language,
                        unit_index: occurrence.unit_index,
                        xpath,
                        class_bare_name: &model.names.bare,
                        attribute_scope: scope,
                        class_methods,
                        property_return_type: Some(&type_text),
                    },
                );
                model.methods.push(method);
            }
        }
    }

    fn collect_method_names(
        &self,
        language: Language,
        occurrences: &[ClassOccurrence<'_>],
    ) -> HashSet<String> {
        let mut names = HashSet::new();
        for occurrence in occurrences {
            for element in self
                .catalog
                .query(language, QueryKind::Method, occurrence.element)
            {
                if let Some(name_el) = first_child_named(element, "name") {
                    let text = element_text(name_el);
                    let name = text.trim();
                    let name = name.find('<').map(|i| &name[..i]).unwrap_or(name);
                    if !name.is_empty() {
                        names.insert(name.to_string());
                    }
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xpath::{compile, document_root, evaluate_elements};
    use sxd_document::parser;

    const CPP_UNIT: &str = r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++"><class>class <name>Counter</name> <super_list>: <super><specifier>public</specifier> <name>Base</name></super></super_list> <block>{<private type="default">
<decl_stmt><decl><type><name>int</name></type> <name>count</name></decl>, <decl><type ref="prev"/><name>limit</name></decl>;</decl_stmt>
</private><public>public:
<decl_stmt><decl><type><name>bool</name></type> <name>enabled</name></decl>;</decl_stmt>
<function><type><name>int</name></type> <name>value</name><parameter_list>()</parameter_list> <specifier>const</specifier> <block>{<block_content> <return>return <expr><name>count</name></expr>;</return> </block_content>}</block></function>
<constructor><name>Counter</name><parameter_list>(<parameter><decl><type><name>int</name></type> <name>start</name></decl></parameter>)</parameter_list> <block>{<block_content> <expr_stmt><expr><name>count</name> <operator>=</operator> <name>start</name></expr>;</expr_stmt> </block_content>}</block></constructor>
</public>}</block>;</class></unit>"#;

    fn counter_occurrence<'d>(root: Element<'d>) -> ClassOccurrence<'d> {
        let search = xpath_for(Language::Cpp, QueryKind::ClassSearch).unwrap();
        let classes = evaluate_elements(&compile(search).unwrap(), root);
        assert_eq!(classes.len(), 1);
        ClassOccurrence {
            unit_index: 0,
            element: classes[0],
            xpath: format!("({search})[1]"),
        }
    }

    #[test]
    fn shell_collects_names_parents_and_attributes() {
        let package = parser::parse(CPP_UNIT).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).unwrap();
        let catalog = CompiledCatalog::new().unwrap();
        let primitives = PrimitiveTypes::default();
        let analyzer = MethodAnalyzer::new().unwrap();
        let builder = ClassModelBuilder::new(&catalog, &primitives, &analyzer);

        let occurrence = counter_occurrence(root);
        let model = builder.build_shell(Language::Cpp, &occurrence);

        assert_eq!(model.names.bare, "Counter");
        assert_eq!(model.structure, StructureKind::Class);
        assert_eq!(
            model.parents,
            vec![("Base".to_string(), InheritanceVisibility::Public)]
        );
        // this + count + limit + enabled
        assert_eq!(model.attributes.len(), 4);
        assert_eq!(model.attributes["limit"].type_name, "int");
        assert!(model.non_private_and_inherited.contains_key("enabled"));
        assert!(!model.non_private_and_inherited.contains_key("count"));
    }

    #[test]
    fn methods_are_analysed_with_the_class_scope() {
        let package = parser::parse(CPP_UNIT).expect("fixture parses");
        let doc = package.as_document();
        let root = document_root(&doc).unwrap();
        let catalog = CompiledCatalog::new().unwrap();
        let primitives = PrimitiveTypes::default();
        let analyzer = MethodAnalyzer::new().unwrap();
        let builder = ClassModelBuilder::new(&catalog, &primitives, &analyzer);

        let occurrences = vec![counter_occurrence(root)];
        let mut model = builder.build_shell(Language::Cpp, &occurrences[0]);
        builder.build_methods(&mut model, &occurrences);
        assert_eq!(model.methods.len(), 2);

        let getter = &model.methods[0];
        assert_eq!(getter.name, "value");
        assert!(getter.attribute_returned);
        assert!(getter.is_const);
        assert!(getter.xpath.starts_with("((.//*"));

        let ctor = &model.methods[1];
        assert!(ctor.is_constructor_destructor);
        assert_eq!(ctor.attributes_modified, 1);
    }
}
