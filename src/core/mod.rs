pub mod errors;
pub mod types;

pub use self::errors::{Result, StereomapError};
pub use self::types::{
    join_labels, ClassStereotype, InheritanceVisibility, Language, MethodStereotype,
    StructureKind, UnknownLanguage,
};
