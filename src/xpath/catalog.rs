//! The per-language XPath catalog.
//!
//! Every XPath the engine runs against class-level structure is defined
//! here, keyed by semantic role. This is the only module that knows what
//! the srcML AST looks like per language; the analyser and builder consume
//! query results without caring which language produced them.
//!
//! All expressions are relative location paths evaluated against a context
//! element (the unit for `ClassSearch`, the class element for most others,
//! the property element for the property sub-queries). Queries that
//! participate in composed element addresses (`ClassSearch`, `Method`,
//! `Property`, `PropertyMethod`) are single paths, never unions, so that
//! `(<prefix>/<query>)[n]` remains a well-formed XPath.

use crate::core::Language;

/// Semantic role of a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// All class-like elements of a unit.
    ClassSearch,
    /// The name of a class, relative to its element.
    ClassName,
    /// The class element itself; the structure kind is its local name.
    ClassType,
    /// Parent entries of the inheritance list.
    ParentName,
    AttributeName,
    AttributeType,
    NonPrivateAttributeName,
    NonPrivateAttributeType,
    /// Methods, constructors and destructors declared in the class body.
    Method,
    /// C# property declarations.
    Property,
    /// The declared type of a property.
    PropertyType,
    /// Accessor bodies nested in a property.
    PropertyMethod,
}

impl QueryKind {
    pub const ALL: [QueryKind; 12] = [
        QueryKind::ClassSearch,
        QueryKind::ClassName,
        QueryKind::ClassType,
        QueryKind::ParentName,
        QueryKind::AttributeName,
        QueryKind::AttributeType,
        QueryKind::NonPrivateAttributeName,
        QueryKind::NonPrivateAttributeType,
        QueryKind::Method,
        QueryKind::Property,
        QueryKind::PropertyType,
        QueryKind::PropertyMethod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::ClassSearch => "class_search",
            QueryKind::ClassName => "class_name",
            QueryKind::ClassType => "class_type",
            QueryKind::ParentName => "parent_name",
            QueryKind::AttributeName => "attribute_name",
            QueryKind::AttributeType => "attribute_type",
            QueryKind::NonPrivateAttributeName => "non_private_attribute_name",
            QueryKind::NonPrivateAttributeType => "non_private_attribute_type",
            QueryKind::Method => "method",
            QueryKind::Property => "property",
            QueryKind::PropertyType => "property_type",
            QueryKind::PropertyMethod => "property_method",
        }
    }
}

/// Returns the XPath for `(language, kind)`, or `None` when the construct
/// does not exist in the language (e.g. properties outside C#).
pub fn xpath_for(language: Language, kind: QueryKind) -> Option<&'static str> {
    match (language, kind) {
        (Language::Cpp, QueryKind::ClassSearch) => {
            Some(".//*[self::src:class or self::src:struct]")
        }
        (Language::CSharp, QueryKind::ClassSearch) => {
            Some(".//*[self::src:class or self::src:struct or self::src:interface]")
        }
        (Language::Java, QueryKind::ClassSearch) => {
            Some(".//*[self::src:class or self::src:interface]")
        }

        (_, QueryKind::ClassName) => Some("src:name"),
        (_, QueryKind::ClassType) => Some("self::*"),

        (Language::Cpp | Language::CSharp, QueryKind::ParentName) => {
            Some("src:super_list/src:super")
        }
        (Language::Java, QueryKind::ParentName) => {
            Some("src:super_list/*[self::src:extends or self::src:implements]/src:super")
        }

        (Language::Cpp, QueryKind::AttributeName) => Some(
            "src:block/*[self::src:public or self::src:private or self::src:protected]\
             /src:decl_stmt/src:decl[src:type]/src:name",
        ),
        (Language::CSharp | Language::Java, QueryKind::AttributeName) => {
            Some("src:block/src:decl_stmt/src:decl[src:type]/src:name")
        }
        (Language::Cpp, QueryKind::AttributeType) => Some(
            "src:block/*[self::src:public or self::src:private or self::src:protected]\
             /src:decl_stmt/src:decl[src:name]/src:type",
        ),
        (Language::CSharp | Language::Java, QueryKind::AttributeType) => {
            Some("src:block/src:decl_stmt/src:decl[src:name]/src:type")
        }

        (Language::Cpp, QueryKind::NonPrivateAttributeName) => Some(
            "src:block/*[self::src:public or self::src:protected]\
             /src:decl_stmt/src:decl[src:type]/src:name",
        ),
        (Language::CSharp, QueryKind::NonPrivateAttributeName) => Some(
            "src:block/src:decl_stmt[src:decl/src:type/src:specifier='public' \
             or src:decl/src:type/src:specifier='protected' \
             or src:decl/src:type/src:specifier='internal']/src:decl[src:type]/src:name",
        ),
        (Language::Java, QueryKind::NonPrivateAttributeName) => Some(
            "src:block/src:decl_stmt[src:decl/src:type/src:specifier='public' \
             or src:decl/src:type/src:specifier='protected']/src:decl[src:type]/src:name",
        ),
        (Language::Cpp, QueryKind::NonPrivateAttributeType) => Some(
            "src:block/*[self::src:public or self::src:protected]\
             /src:decl_stmt/src:decl[src:name]/src:type",
        ),
        (Language::CSharp, QueryKind::NonPrivateAttributeType) => Some(
            "src:block/src:decl_stmt[src:decl/src:type/src:specifier='public' \
             or src:decl/src:type/src:specifier='protected' \
             or src:decl/src:type/src:specifier='internal']/src:decl[src:name]/src:type",
        ),
        (Language::Java, QueryKind::NonPrivateAttributeType) => Some(
            "src:block/src:decl_stmt[src:decl/src:type/src:specifier='public' \
             or src:decl/src:type/src:specifier='protected']/src:decl[src:name]/src:type",
        ),

        (Language::Cpp, QueryKind::Method) => Some(
            "src:block/*[self::src:public or self::src:private or self::src:protected]\
             /*[self::src:function or self::src:constructor or self::src:destructor]",
        ),
        (Language::CSharp, QueryKind::Method) => Some(
            "src:block/*[self::src:function or self::src:constructor or self::src:destructor]",
        ),
        (Language::Java, QueryKind::Method) => {
            Some("src:block/*[self::src:function or self::src:constructor]")
        }

        (Language::CSharp, QueryKind::Property) => Some("src:block/src:property"),
        (Language::CSharp, QueryKind::PropertyType) => Some("src:type"),
        (Language::CSharp, QueryKind::PropertyMethod) => Some("src:block/src:function"),
        (_, QueryKind::Property | QueryKind::PropertyType | QueryKind::PropertyMethod) => None,
    }
}
