//! Named, typed slots: attributes, locals, parameters.

use crate::core::Language;
use crate::normalize;
use crate::primitives::PrimitiveTypes;
use serde::Serialize;

/// A declared variable with its primitivity flags resolved at construction.
///
/// *Non-primitive* means the normalised base identifier is absent from the
/// primitive table; *external* additionally means it does not name the
/// enclosing class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
    pub is_non_primitive: bool,
    pub is_external_non_primitive: bool,
}

impl Variable {
    /// An untyped entry; used for the `this` sentinel, which is neither
    /// non-primitive nor external.
    pub fn named(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A typed entry with flags computed against the primitive table and
    /// the enclosing class's bare name.
    pub fn typed(
        name: impl Into<String>,
        type_name: impl Into<String>,
        language: Language,
        primitives: &PrimitiveTypes,
        enclosing_bare_name: &str,
    ) -> Self {
        let type_name = type_name.into();
        let base = primitives.non_primitive_base(&type_name, language);
        let is_non_primitive = base.is_some();
        let is_external_non_primitive = match base {
            Some(base) => {
                let (bare, _) = normalize::split_generic(&base);
                bare != enclosing_bare_name
            }
            None => false,
        };
        Variable {
            name: name.into(),
            type_name,
            is_non_primitive,
            is_external_non_primitive,
        }
    }
}
