//! Pure name/type normalisation helpers.
//!
//! Everything the rest of the engine knows about textual type shapes lives
//! here: whitespace trimming, namespace stripping, generic-argument
//! handling, array suffixes, and the reduction of a declared type to the
//! base identifiers checked against the primitive table.

use crate::core::Language;

/// Declaration specifiers that never contribute to a type's identity.
const SPECIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "final",
    "abstract",
    "virtual",
    "override",
    "sealed",
    "synchronized",
    "native",
    "strictfp",
    "transient",
    "volatile",
    "mutable",
    "constexpr",
    "consteval",
    "inline",
    "explicit",
    "extern",
    "readonly",
    "const",
    "ref",
    "out",
    "in",
    "async",
    "default",
    "new",
];

pub fn rtrim(s: &str) -> &str {
    s.trim_end()
}

/// Drops everything up to and including the last namespace/package
/// separator. The caller is expected to have split off any generic
/// argument list first.
pub fn remove_namespace<'a>(s: &'a str, language: Language) -> &'a str {
    let sep = language.namespace_separator();
    match s.rfind(sep) {
        Some(idx) => &s[idx + sep.len()..],
        None => s,
    }
}

/// Splits a name at its generic argument list: `"Map<K,V>"` becomes
/// `("Map", Some("<K,V>"))`.
pub fn split_generic(s: &str) -> (&str, Option<&str>) {
    match s.find('<') {
        Some(idx) => (&s[..idx], Some(&s[idx..])),
        None => (s, None),
    }
}

/// Strips generic argument contents while preserving the bracket and comma
/// skeleton: `"Map<K,V>"` becomes `"Map<,>"`.
pub fn strip_generic_contents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => {
                depth += 1;
                out.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            ',' if depth > 0 => out.push(c),
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }
    out
}

/// Removes a generic argument list along with its brackets, keeping any
/// trailing sigils: `"vector<int>*"` becomes `"vector*"`.
pub fn drop_generic_arguments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Truncates a C++ declarator at the first array bracket: `"buf[16]"`
/// becomes `"buf"`.
pub fn strip_array_suffix(s: &str) -> &str {
    match s.find('[') {
        Some(idx) => rtrim(&s[..idx]),
        None => s,
    }
}

/// Whether a raw return type spells a `void*`, ignoring whitespace between
/// the keyword and the star.
pub fn is_void_pointer(raw_type: &str) -> bool {
    let collapsed: String = raw_type.chars().filter(|c| !c.is_whitespace()).collect();
    collapsed.contains("void*")
}

/// Reduces a declared type to its base identifiers: specifiers dropped,
/// generics removed, sigils and namespaces stripped. `"const std::vector<T>&"`
/// reduces to `["vector"]`, `"unsigned long long"` to
/// `["unsigned", "long", "long"]`.
pub fn base_identifiers(type_str: &str, language: Language) -> Vec<String> {
    let without_generics = drop_generic_arguments(type_str);
    without_generics
        .split_whitespace()
        .map(|tok| tok.trim_matches(|c| c == '*' || c == '&' || c == '[' || c == ']'))
        .filter(|tok| !tok.is_empty())
        .filter(|tok| !SPECIFIERS.contains(tok))
        .map(|tok| remove_namespace(tok, language).to_string())
        .filter(|tok| !tok.is_empty())
        .collect()
}

/// Parses a raw return type down to the comparable form used by the rule
/// set: specifiers and namespaces gone, generics gone, references gone,
/// pointers kept (`"void*"` must stay distinguishable from `"void"`).
pub fn parse_return_type(raw: &str, language: Language) -> String {
    let kept: Vec<&str> = raw
        .split_whitespace()
        .filter(|tok| !SPECIFIERS.contains(tok))
        .collect();
    let joined = kept.join(" ");
    let without_generics = drop_generic_arguments(&joined);
    let without_refs: String = without_generics.chars().filter(|c| *c != '&').collect();
    let trimmed = without_refs.trim();
    // Qualify only the leading identifier; "unsigned int" has no namespace.
    if trimmed.split_whitespace().count() == 1 {
        remove_namespace(trimmed, language).to_string()
    } else {
        trimmed.to_string()
    }
}

/// Splits a compound declarator name into the variable name proper,
/// handling C++ array declarators.
pub fn declared_name(raw: &str, language: Language) -> String {
    let trimmed = raw.trim();
    if language == Language::Cpp {
        strip_array_suffix(trimmed).to_string()
    } else {
        trimmed.to_string()
    }
}
