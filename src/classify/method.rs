//! The method stereotype rule set.
//!
//! Rules run in a fixed order and accumulate labels; only the
//! constructor/destructor rule preempts the rest, and the
//! wrapper/controller/collaborator trio is internally exclusive. A method
//! that no rule touches falls back to `unclassified`.

use crate::core::{Language, MethodStereotype};
use crate::model::{ClassModel, Method};

/// Labels every method of the class and tallies constructors/destructors.
pub fn classify_methods(model: &mut ClassModel) {
    let language = model.language;
    let bare_name = model.names.bare.clone();

    let mut constructor_destructor_count = 0usize;
    for method in &mut model.methods {
        if method.is_constructor_destructor {
            constructor_destructor_count += 1;
            constructor_destructor(method, &bare_name);
        } else {
            ordinary_rules(method, language);
            if method.stereotypes.is_empty() {
                method.add_stereotype(MethodStereotype::Unclassified);
            }
        }
    }
    model.constructor_destructor_count = constructor_destructor_count;
}

/// Constructors and destructors carry exactly one label and skip every
/// other rule.
fn constructor_destructor(method: &mut Method, class_bare_name: &str) {
    if method.is_destructor {
        method.add_stereotype(MethodStereotype::Destructor);
    } else if !class_bare_name.is_empty() && method.parameters_list.contains(class_bare_name) {
        method.add_stereotype(MethodStereotype::CopyConstructor);
    } else {
        method.add_stereotype(MethodStereotype::Constructor);
    }
}

fn ordinary_rules(method: &mut Method, language: Language) {
    let void_pointer = method.has_void_pointer_return(language);
    let parsed = method.return_type_parsed.clone();
    let parsed = parsed.as_str();
    let boolean_return = method.has_boolean_return(language);
    let intra_class_calls = !method.function_calls.is_empty();

    // get: at least one simple attribute return, non-void return type.
    if method.attribute_returned && parsed != "void" {
        method.add_stereotype(MethodStereotype::Get);
    }

    // predicate: boolean return, a complex return, and state involvement.
    if boolean_return
        && method.attribute_not_returned
        && (method.attribute_used || intra_class_calls)
    {
        method.add_stereotype(MethodStereotype::Predicate);
    }

    // property: a non-void, non-boolean value computed from state.
    // `void*` counts as a value. Strict factories are excluded.
    let property_return = match language {
        Language::Cpp => (parsed != "bool" && parsed != "void" && !parsed.is_empty()) || void_pointer,
        Language::CSharp => {
            (parsed != "bool"
                && parsed != "Boolean"
                && parsed != "void"
                && parsed != "Void"
                && !parsed.is_empty())
                || void_pointer
        }
        Language::Java => {
            parsed != "boolean" && parsed != "void" && parsed != "Void" && !parsed.is_empty()
        }
    };
    if !method.is_strict_factory
        && property_return
        && method.attribute_not_returned
        && (method.attribute_used || intra_class_calls)
    {
        method.add_stereotype(MethodStereotype::Property);
    }

    // void-accessor: state handed back through a mutable reference
    // parameter.
    if method.parameter_ref_changed
        && parsed == "void"
        && !void_pointer
        && (method.attribute_used || intra_class_calls)
    {
        method.add_stereotype(MethodStereotype::VoidAccessor);
    }

    // set: exactly one attribute written, at most one call within the
    // class.
    if method.attributes_modified == 1 && method.calls_within_class() <= 1 {
        method.add_stereotype(MethodStereotype::Set);
    }

    // command / non-void-command.
    let case_delegating = method.attributes_modified == 0
        && (!method.function_calls.is_empty() || !method.method_calls.is_empty());
    let case_one_write_many_calls =
        method.attributes_modified == 1 && method.calls_within_class() > 1;
    let case_many_writes = method.attributes_modified > 1;
    // A const C++ method writing several attributes implies `mutable`
    // members; it still commands.
    let mutable_case = method.is_const && case_many_writes;
    if (case_delegating || case_one_write_many_calls || case_many_writes)
        && (!method.is_const || mutable_case)
    {
        let void_like = parsed == "void" || (language == Language::CSharp && parsed == "Void");
        if void_like && !void_pointer {
            method.add_stereotype(MethodStereotype::Command);
        } else if language != Language::Java {
            method.add_stereotype(MethodStereotype::NonVoidCommand);
        }
    }

    // factory.
    if method.is_factory || method.is_strict_factory {
        method.add_stereotype(MethodStereotype::Factory);
    }

    // wrapper / controller / collaborator: mutually exclusive.
    if !method.is_empty {
        let no_state = method.attributes_modified == 0
            && method.function_calls.is_empty()
            && method.method_calls.is_empty();
        let return_external = method.non_primitive_return_external || void_pointer;

        if no_state && method.external_method_calls == 0 && method.external_function_calls > 0 {
            method.add_stereotype(MethodStereotype::Wrapper);
        } else if no_state
            && (method.external_method_calls > 0 || method.non_primitive_local_or_parameter_changed)
        {
            method.add_stereotype(MethodStereotype::Controller);
        } else if method.non_primitive_attribute_external
            || method.non_primitive_local_external
            || method.non_primitive_parameter_external
            || return_external
        {
            method.add_stereotype(MethodStereotype::Collaborator);
        }
    }

    // incidental: a body that touches nothing.
    let no_calls_at_all = method.function_calls.is_empty()
        && method.method_calls.is_empty()
        && method.constructor_calls.is_empty()
        && method.external_method_calls == 0
        && method.external_function_calls == 0;
    if !method.is_empty && !method.attribute_used && no_calls_at_all {
        method.add_stereotype(MethodStereotype::Incidental);
    }

    // stateless: work done entirely through outside collaborators.
    if !method.is_empty
        && !method.attribute_used
        && method.function_calls.is_empty()
        && method.method_calls.is_empty()
        && (method.external_function_calls > 0
            || method.external_method_calls > 0
            || !method.constructor_calls.is_empty())
    {
        method.add_stereotype(MethodStereotype::Stateless);
    }

    // empty: comments only.
    if method.is_empty {
        method.add_stereotype(MethodStereotype::Empty);
    }
}
