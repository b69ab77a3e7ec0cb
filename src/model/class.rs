//! The per-class analysis record.

use crate::core::{ClassStereotype, InheritanceVisibility, Language, StructureKind};
use crate::model::method::Method;
use crate::model::variable::Variable;
use serde::Serialize;
use std::collections::BTreeMap;

/// The four name forms kept for every class. All empty for anonymous
/// classes, in which case the copy-constructor rule can never fire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassNames {
    pub raw: String,
    pub trimmed: String,
    pub generics_stripped: String,
    /// Name with namespace and generic arguments removed; used to
    /// recognise constructors and copy-constructor parameter types.
    pub bare: String,
}

impl ClassNames {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.bare.is_empty()
    }
}

/// One class (or struct, or interface) with everything the classifiers
/// need. Attribute maps are ordered so reports and annotations come out
/// deterministically.
#[derive(Debug, Clone, Serialize)]
pub struct ClassModel {
    pub language: Language,
    pub names: ClassNames,
    pub structure: StructureKind,
    /// Parent name → inheritance visibility, in declaration order.
    pub parents: Vec<(String, InheritanceVisibility)>,
    /// All declared attributes plus the `this` sentinel.
    pub attributes: BTreeMap<String, Variable>,
    /// Non-private attributes, later widened with parents' non-private
    /// attributes found in the same unit.
    pub non_private_and_inherited: BTreeMap<String, Variable>,
    pub methods: Vec<Method>,
    /// Unit index → class element addresses (partial classes can span
    /// several occurrences).
    pub xpaths_by_unit: BTreeMap<usize, Vec<String>>,
    pub stereotypes: Vec<ClassStereotype>,
    pub constructor_destructor_count: usize,
}

impl ClassModel {
    pub fn new(language: Language, names: ClassNames, structure: StructureKind) -> Self {
        let mut attributes = BTreeMap::new();
        // The bare `this` keyword reads as an accessor of class state.
        attributes.insert("this".to_string(), Variable::named("this"));
        ClassModel {
            language,
            names,
            structure,
            parents: Vec::new(),
            attributes,
            non_private_and_inherited: BTreeMap::new(),
            methods: Vec::new(),
            xpaths_by_unit: BTreeMap::new(),
            stereotypes: Vec::new(),
            constructor_destructor_count: 0,
        }
    }

    /// Methods that take part in class-stereotype aggregation.
    pub fn countable_methods(&self) -> usize {
        self.methods.len() - self.constructor_destructor_count
    }

    pub fn add_stereotype(&mut self, label: ClassStereotype) {
        self.stereotypes.push(label);
    }

    /// The attribute names visible to method bodies: declared attributes,
    /// the `this` sentinel, and inherited non-private attributes.
    pub fn attribute_scope(&self) -> BTreeMap<String, Variable> {
        let mut scope = self.attributes.clone();
        for (name, var) in &self.non_private_and_inherited {
            scope.entry(name.clone()).or_insert_with(|| var.clone());
        }
        scope
    }
}
