//! Common type definitions used across the codebase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source languages recognised inside a srcML archive.
///
/// Units whose `language` attribute is anything else are skipped with a
/// warning; see [`crate::archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Cpp,
    CSharp,
    Java,
}

impl Language {
    /// All languages, in a stable order.
    pub const ALL: [Language; 3] = [Language::Cpp, Language::CSharp, Language::Java];

    /// The display name, matching the srcML `language` attribute value.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Java => "Java",
        }
    }

    /// The namespace/package separator used in qualified names.
    pub fn namespace_separator(&self) -> &'static str {
        match self {
            Language::Cpp => "::",
            Language::CSharp | Language::Java => ".",
        }
    }

    /// Whether `void*` is a meaningful return type in this language.
    pub fn has_void_pointer(&self) -> bool {
        !matches!(self, Language::Java)
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C++" => Ok(Language::Cpp),
            "C#" => Ok(Language::CSharp),
            "Java" => Ok(Language::Java),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for a srcML `language` attribute outside {C++, C#, Java}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language tag: {}", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

/// Syntactic structure of a class-like declaration.
///
/// The distinction matters for C++ where `struct` flips the default
/// inheritance visibility to public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Class,
    Struct,
    Interface,
}

impl StructureKind {
    /// Default C++ inheritance visibility for this structure kind.
    pub fn default_inheritance(&self) -> InheritanceVisibility {
        match self {
            StructureKind::Class => InheritanceVisibility::Private,
            StructureKind::Struct | StructureKind::Interface => InheritanceVisibility::Public,
        }
    }
}

/// Visibility of an inheritance edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InheritanceVisibility {
    Public,
    Protected,
    Private,
}

/// Method-level stereotype labels.
///
/// Labels accumulate across rules in the order they are declared here;
/// the output attribute joins them with single spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodStereotype {
    Constructor,
    CopyConstructor,
    Destructor,
    Get,
    Predicate,
    Property,
    VoidAccessor,
    Set,
    Command,
    NonVoidCommand,
    Factory,
    Wrapper,
    Controller,
    Collaborator,
    Incidental,
    Stateless,
    Empty,
    Unclassified,
}

impl MethodStereotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodStereotype::Constructor => "constructor",
            MethodStereotype::CopyConstructor => "copy-constructor",
            MethodStereotype::Destructor => "destructor",
            MethodStereotype::Get => "get",
            MethodStereotype::Predicate => "predicate",
            MethodStereotype::Property => "property",
            MethodStereotype::VoidAccessor => "void-accessor",
            MethodStereotype::Set => "set",
            MethodStereotype::Command => "command",
            MethodStereotype::NonVoidCommand => "non-void-command",
            MethodStereotype::Factory => "factory",
            MethodStereotype::Wrapper => "wrapper",
            MethodStereotype::Controller => "controller",
            MethodStereotype::Collaborator => "collaborator",
            MethodStereotype::Incidental => "incidental",
            MethodStereotype::Stateless => "stateless",
            MethodStereotype::Empty => "empty",
            MethodStereotype::Unclassified => "unclassified",
        }
    }

    /// Every label, for taxonomy validation.
    pub fn all() -> &'static [MethodStereotype] {
        &[
            MethodStereotype::Constructor,
            MethodStereotype::CopyConstructor,
            MethodStereotype::Destructor,
            MethodStereotype::Get,
            MethodStereotype::Predicate,
            MethodStereotype::Property,
            MethodStereotype::VoidAccessor,
            MethodStereotype::Set,
            MethodStereotype::Command,
            MethodStereotype::NonVoidCommand,
            MethodStereotype::Factory,
            MethodStereotype::Wrapper,
            MethodStereotype::Controller,
            MethodStereotype::Collaborator,
            MethodStereotype::Incidental,
            MethodStereotype::Stateless,
            MethodStereotype::Empty,
            MethodStereotype::Unclassified,
        ]
    }
}

impl fmt::Display for MethodStereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class-level stereotype labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassStereotype {
    Entity,
    MinimalEntity,
    DataProvider,
    Commander,
    Boundary,
    Factory,
    Controller,
    PureController,
    LargeClass,
    LazyClass,
    Degenerate,
    DataClass,
    SmallClass,
    Empty,
    Unclassified,
}

impl ClassStereotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStereotype::Entity => "entity",
            ClassStereotype::MinimalEntity => "minimal-entity",
            ClassStereotype::DataProvider => "data-provider",
            ClassStereotype::Commander => "commander",
            ClassStereotype::Boundary => "boundary",
            ClassStereotype::Factory => "factory",
            ClassStereotype::Controller => "controller",
            ClassStereotype::PureController => "pure-controller",
            ClassStereotype::LargeClass => "large-class",
            ClassStereotype::LazyClass => "lazy-class",
            ClassStereotype::Degenerate => "degenerate",
            ClassStereotype::DataClass => "data-class",
            ClassStereotype::SmallClass => "small-class",
            ClassStereotype::Empty => "empty",
            ClassStereotype::Unclassified => "unclassified",
        }
    }

    /// Every label, for taxonomy validation.
    pub fn all() -> &'static [ClassStereotype] {
        &[
            ClassStereotype::Entity,
            ClassStereotype::MinimalEntity,
            ClassStereotype::DataProvider,
            ClassStereotype::Commander,
            ClassStereotype::Boundary,
            ClassStereotype::Factory,
            ClassStereotype::Controller,
            ClassStereotype::PureController,
            ClassStereotype::LargeClass,
            ClassStereotype::LazyClass,
            ClassStereotype::Degenerate,
            ClassStereotype::DataClass,
            ClassStereotype::SmallClass,
            ClassStereotype::Empty,
            ClassStereotype::Unclassified,
        ]
    }
}

impl fmt::Display for ClassStereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join an ordered label list into the attribute value emitted on elements.
pub fn join_labels<T: fmt::Display>(labels: &[T]) -> String {
    labels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_through_display() {
        for lang in Language::ALL {
            assert_eq!(lang.display_name().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!("Rust".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn struct_defaults_to_public_inheritance() {
        assert_eq!(
            StructureKind::Struct.default_inheritance(),
            InheritanceVisibility::Public
        );
        assert_eq!(
            StructureKind::Class.default_inheritance(),
            InheritanceVisibility::Private
        );
    }

    #[test]
    fn labels_join_with_single_spaces() {
        let labels = vec![MethodStereotype::Get, MethodStereotype::Collaborator];
        assert_eq!(join_labels(&labels), "get collaborator");
        let empty: Vec<MethodStereotype> = vec![];
        assert_eq!(join_labels(&empty), "");
    }
}
