//! The class stereotype rule set.
//!
//! Aggregates method-label counts (constructors and destructors excluded)
//! and applies the class rules in a fixed order. Ratio rules guard their
//! denominators: with nothing to divide by, the rule simply does not fire.

use crate::core::{ClassStereotype, MethodStereotype};
use crate::model::ClassModel;

/// Method-label tallies over a class's countable methods.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    getters: usize,
    predicates: usize,
    properties: usize,
    void_accessors: usize,
    setters: usize,
    commands: usize,
    non_void_commands: usize,
    controllers: usize,
    collaborators_only: usize,
    factories: usize,
    incidentals: usize,
    stateless: usize,
    empties: usize,
    non_collaborators: usize,
}

fn tally(model: &ClassModel) -> Tally {
    let mut t = Tally::default();
    for method in &model.methods {
        if method.is_constructor_destructor {
            continue;
        }
        for label in &method.stereotypes {
            match label {
                MethodStereotype::Get => t.getters += 1,
                MethodStereotype::Predicate => t.predicates += 1,
                MethodStereotype::Property => t.properties += 1,
                MethodStereotype::VoidAccessor => t.void_accessors += 1,
                MethodStereotype::Set => t.setters += 1,
                MethodStereotype::Command => t.commands += 1,
                MethodStereotype::NonVoidCommand => t.non_void_commands += 1,
                MethodStereotype::Controller => t.controllers += 1,
                MethodStereotype::Collaborator | MethodStereotype::Wrapper => {
                    t.collaborators_only += 1
                }
                MethodStereotype::Factory => t.factories += 1,
                MethodStereotype::Incidental => t.incidentals += 1,
                MethodStereotype::Stateless => t.stateless += 1,
                MethodStereotype::Empty => t.empties += 1,
                _ => {}
            }
        }
        if !method.is_collaborational() {
            t.non_collaborators += 1;
        }
    }
    t
}

/// Labels the class from its method-label distribution.
pub fn classify_class(model: &mut ClassModel, methods_per_class_threshold: usize) {
    let t = tally(model);
    let all_methods = model.countable_methods();
    let m = all_methods as f64;

    let getters = t.getters;
    let accessors = getters + t.predicates + t.properties + t.void_accessors;
    let setters = t.setters;
    let commands = t.commands + t.non_void_commands;
    let mutators = setters + commands;
    let controllers = t.controllers;
    let collaborators = controllers + t.collaborators_only;
    let factories = t.factories;
    let degenerates = t.incidentals + t.stateless + t.empties;

    let collaboration_ratio = (t.non_collaborators > 0)
        .then(|| collaborators as f64 / t.non_collaborators as f64);

    // entity
    if accessors > getters
        && mutators > setters
        && controllers == 0
        && collaboration_ratio.map(|r| r >= 2.0).unwrap_or(false)
    {
        model.add_stereotype(ClassStereotype::Entity);
    }

    // minimal-entity
    if all_methods == getters + setters + commands
        && getters > 0
        && setters > 0
        && commands > 0
        && collaboration_ratio.map(|r| r >= 2.0).unwrap_or(false)
    {
        model.add_stereotype(ClassStereotype::MinimalEntity);
    }

    // data-provider
    if accessors > 2 * mutators && accessors > 2 * (controllers + factories) {
        model.add_stereotype(ClassStereotype::DataProvider);
    }

    // commander
    if mutators > 2 * accessors && mutators > 2 * (controllers + factories) {
        model.add_stereotype(ClassStereotype::Commander);
    }

    // boundary
    if collaborators > t.non_collaborators
        && (factories as f64) < 0.5 * m
        && (controllers as f64) < 0.33 * m
    {
        model.add_stereotype(ClassStereotype::Boundary);
    }

    // factory
    if factories as f64 > 0.67 * m {
        model.add_stereotype(ClassStereotype::Factory);
    }

    // controller
    if (controllers + factories) as f64 > 0.67 * m && (accessors > 0 || mutators > 0) {
        model.add_stereotype(ClassStereotype::Controller);
    }

    // pure-controller
    if controllers + factories > 0
        && accessors + mutators + t.collaborators_only == 0
        && controllers > 0
    {
        model.add_stereotype(ClassStereotype::PureController);
    }

    // large-class
    {
        let acc_plus_mut = (accessors + mutators) as f64;
        let fac_plus_con = (controllers + factories) as f64;
        if 0.2 * m < acc_plus_mut
            && acc_plus_mut < 0.67 * m
            && 0.2 * m < fac_plus_con
            && fac_plus_con < 0.67 * m
            && factories > 0
            && controllers > 0
            && accessors > 0
            && mutators > 0
            && all_methods > methods_per_class_threshold
        {
            model.add_stereotype(ClassStereotype::LargeClass);
        }
    }

    // lazy-class
    if all_methods > 0
        && getters + setters > 0
        && degenerates as f64 / m > 0.33
        && (all_methods as f64 - (degenerates + getters + setters) as f64) / m <= 0.2
    {
        model.add_stereotype(ClassStereotype::LazyClass);
    }

    // degenerate
    if all_methods > 0 && degenerates as f64 / m > 0.5 {
        model.add_stereotype(ClassStereotype::Degenerate);
    }

    // data-class
    if all_methods == getters + setters && getters + setters > 0 {
        model.add_stereotype(ClassStereotype::DataClass);
    }

    // small-class
    if all_methods > 0 && all_methods < 3 {
        model.add_stereotype(ClassStereotype::SmallClass);
    }

    // empty
    if all_methods == 0 {
        model.add_stereotype(ClassStereotype::Empty);
    }

    if model.stereotypes.is_empty() {
        model.add_stereotype(ClassStereotype::Unclassified);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Language, StructureKind};
    use crate::model::{ClassNames, Method};

    fn method_with(labels: &[MethodStereotype]) -> Method {
        Method {
            stereotypes: labels.to_vec(),
            ..Default::default()
        }
    }

    fn model_with(methods: Vec<Method>) -> ClassModel {
        let mut model = ClassModel::new(
            Language::Java,
            ClassNames {
                raw: "Sample".into(),
                trimmed: "Sample".into(),
                generics_stripped: "Sample".into(),
                bare: "Sample".into(),
            },
            StructureKind::Class,
        );
        model.methods = methods;
        model
    }

    fn classified(methods: Vec<Method>) -> Vec<ClassStereotype> {
        let mut model = model_with(methods);
        classify_class(&mut model, 21);
        model.stereotypes
    }

    #[test]
    fn pure_accessors_and_mutators_make_a_data_class() {
        let labels = classified(vec![
            method_with(&[MethodStereotype::Get]),
            method_with(&[MethodStereotype::Set]),
        ]);
        assert_eq!(
            labels,
            vec![ClassStereotype::DataClass, ClassStereotype::SmallClass]
        );
    }

    #[test]
    fn balanced_five_five_five_is_unclassified() {
        // 5 getters, 5 setters, 5 commands, no collaborators: every ratio
        // rule just misses.
        let mut methods = Vec::new();
        for _ in 0..5 {
            methods.push(method_with(&[MethodStereotype::Get]));
            methods.push(method_with(&[MethodStereotype::Set]));
            methods.push(method_with(&[MethodStereotype::Command]));
        }
        assert_eq!(classified(methods), vec![ClassStereotype::Unclassified]);
    }

    #[test]
    fn wrappers_with_no_plain_methods_are_a_boundary() {
        let labels = classified(vec![
            method_with(&[MethodStereotype::Wrapper]),
            method_with(&[MethodStereotype::Wrapper]),
            method_with(&[MethodStereotype::Wrapper]),
        ]);
        assert!(labels.contains(&ClassStereotype::Boundary));
        assert!(!labels.contains(&ClassStereotype::Entity));
    }

    #[test]
    fn single_factory_method_makes_a_factory_class() {
        let labels = classified(vec![method_with(&[
            MethodStereotype::Factory,
            MethodStereotype::Stateless,
        ])]);
        assert!(labels.contains(&ClassStereotype::Factory));
        assert!(labels.contains(&ClassStereotype::Degenerate));
        assert!(labels.contains(&ClassStereotype::SmallClass));
    }

    #[test]
    fn degenerate_heavy_classes_go_lazy() {
        // 2 degenerates, 2 getters, 1 setter: degenerates/M = 0.4 and
        // everything else is get/set.
        let labels = classified(vec![
            method_with(&[MethodStereotype::Empty]),
            method_with(&[MethodStereotype::Incidental]),
            method_with(&[MethodStereotype::Get]),
            method_with(&[MethodStereotype::Get]),
            method_with(&[MethodStereotype::Set]),
        ]);
        assert!(labels.contains(&ClassStereotype::LazyClass));
    }

    #[test]
    fn constructors_are_excluded_from_aggregation() {
        let ctor = Method {
            is_constructor_destructor: true,
            stereotypes: vec![MethodStereotype::Constructor],
            ..Default::default()
        };
        let dtor = Method {
            is_constructor_destructor: true,
            is_destructor: true,
            stereotypes: vec![MethodStereotype::Destructor],
            ..Default::default()
        };
        let mut model = model_with(vec![ctor, dtor]);
        model.constructor_destructor_count = 2;
        classify_class(&mut model, 21);
        assert_eq!(model.stereotypes, vec![ClassStereotype::Empty]);
    }

    #[test]
    fn entity_requires_a_nonzero_denominator() {
        // Every method is collaborational: nonCollaborators = 0, so the
        // ratio rules cannot fire.
        let labels = classified(vec![
            method_with(&[MethodStereotype::Predicate, MethodStereotype::Collaborator]),
            method_with(&[MethodStereotype::Command, MethodStereotype::Collaborator]),
            method_with(&[MethodStereotype::Get, MethodStereotype::Collaborator]),
            method_with(&[MethodStereotype::Set, MethodStereotype::Collaborator]),
        ]);
        assert!(!labels.contains(&ClassStereotype::Entity));
        assert!(!labels.contains(&ClassStereotype::MinimalEntity));
        assert!(labels.contains(&ClassStereotype::Boundary));
    }

    #[test]
    fn entity_fires_on_rich_state_with_collaboration() {
        // predicate + command + collaborator labels, one plain getter.
        let labels = classified(vec![
            method_with(&[MethodStereotype::Predicate, MethodStereotype::Collaborator]),
            method_with(&[MethodStereotype::Command, MethodStereotype::Collaborator]),
            method_with(&[MethodStereotype::Get]),
        ]);
        // collaborators = 2, nonCollaborators = 1, ratio = 2.
        assert!(labels.contains(&ClassStereotype::Entity));
    }

    #[test]
    fn large_class_needs_the_threshold() {
        // 8 accessors+mutators, 8 controllers+factories, 6 degenerate
        // fillers: balanced, over the method threshold of 21.
        let mut methods = Vec::new();
        for _ in 0..4 {
            methods.push(method_with(&[MethodStereotype::Get]));
            methods.push(method_with(&[MethodStereotype::Set]));
            methods.push(method_with(&[MethodStereotype::Controller]));
            methods.push(method_with(&[MethodStereotype::Factory]));
        }
        for _ in 0..6 {
            methods.push(method_with(&[MethodStereotype::Incidental]));
        }
        let mut model = model_with(methods.clone());
        classify_class(&mut model, 21);
        assert!(model.stereotypes.contains(&ClassStereotype::LargeClass));

        let mut strict = model_with(methods);
        classify_class(&mut strict, 30);
        assert!(!strict.stereotypes.contains(&ClassStereotype::LargeClass));
    }

    #[test]
    fn empty_class_only_gets_the_empty_label() {
        assert_eq!(classified(vec![]), vec![ClassStereotype::Empty]);
    }
}
