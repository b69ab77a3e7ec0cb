//! Per-language primitive type table.
//!
//! A type is *non-primitive* when, after normalisation, at least one of its
//! base identifiers is absent from this table. The table ships with
//! built-in defaults and can be replaced wholesale from a side file.
//!
//! File format: `[C++]` / `[C#]` / `[Java]` section headers, one identifier
//! per line, `#` comments and blank lines ignored.

use crate::core::{Language, Result, StereomapError};
use crate::normalize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

const CPP_DEFAULTS: &[&str] = &[
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int", "long",
    "float", "double", "signed", "unsigned", "size_t", "ptrdiff_t", "int8_t", "int16_t",
    "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "intptr_t", "uintptr_t",
    "auto",
];

const CSHARP_DEFAULTS: &[&str] = &[
    "void", "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long",
    "ulong", "short", "ushort", "nint", "nuint", "string", "object", "var",
];

const JAVA_DEFAULTS: &[&str] = &[
    "void", "boolean", "byte", "char", "short", "int", "long", "float", "double", "String",
];

/// The loaded table. Read-only after construction; built once at startup
/// and shared by reference through the analysis context.
#[derive(Debug, Clone)]
pub struct PrimitiveTypes {
    by_language: HashMap<Language, HashSet<String>>,
}

impl Default for PrimitiveTypes {
    fn default() -> Self {
        let mut by_language = HashMap::new();
        by_language.insert(Language::Cpp, to_set(CPP_DEFAULTS));
        by_language.insert(Language::CSharp, to_set(CSHARP_DEFAULTS));
        by_language.insert(Language::Java, to_set(JAVA_DEFAULTS));
        Self { by_language }
    }
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PrimitiveTypes {
    /// Replaces the built-in table with the contents of a side file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StereomapError::io(path, &e))?;
        let table = Self::parse(&text)?;
        table.validate()?;
        Ok(table)
    }

    fn parse(text: &str) -> Result<Self> {
        let mut by_language: HashMap<Language, HashSet<String>> = HashMap::new();
        let mut current: Option<Language> = None;
        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let language = header.trim().parse::<Language>().map_err(|e| {
                    StereomapError::Config(format!("primitive table: {e}"))
                })?;
                current = Some(language);
                by_language.entry(language).or_default();
                continue;
            }
            match current {
                Some(language) => {
                    by_language
                        .entry(language)
                        .or_default()
                        .insert(line.to_string());
                }
                None => {
                    return Err(StereomapError::Config(format!(
                        "primitive table entry {line:?} appears before any [language] header"
                    )));
                }
            }
        }
        Ok(Self { by_language })
    }

    /// Every supported language must have at least one entry.
    pub fn validate(&self) -> Result<()> {
        for language in Language::ALL {
            if self
                .by_language
                .get(&language)
                .map(|s| s.is_empty())
                .unwrap_or(true)
            {
                return Err(StereomapError::MissingPrimitives {
                    language: language.display_name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether a single normalised base identifier is primitive.
    pub fn is_primitive(&self, base: &str, language: Language) -> bool {
        self.by_language
            .get(&language)
            .map(|set| set.contains(base))
            .unwrap_or(false)
    }

    /// The first base identifier of `type_str` that is not in the table,
    /// if any. `None` means the whole type is primitive (an empty type,
    /// e.g. a constructor's missing return type, counts as primitive).
    pub fn non_primitive_base(&self, type_str: &str, language: Language) -> Option<String> {
        normalize::base_identifiers(type_str, language)
            .into_iter()
            .find(|base| !self.is_primitive(base, language))
    }

    /// Whether the declared type contains a non-primitive base identifier.
    pub fn is_non_primitive_type(&self, type_str: &str, language: Language) -> bool {
        self.non_primitive_base(type_str, language).is_some()
    }
}
