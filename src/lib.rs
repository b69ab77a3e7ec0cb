//! # Stereomap
//!
//! Stereomap assigns *stereotype* labels to the methods and classes of a
//! parsed-source archive (srcML XML covering C++, C#, and Java) and emits
//! an annotated copy of the archive, plus optional summary reports.
//!
//! Method stereotypes summarise what a method does with its class's state:
//! `get`, `set`, `predicate`, `command`, `factory`, `collaborator`, and so
//! on. Class stereotypes are computed from the distribution of method
//! labels: `data-class`, `entity`, `boundary`, `lazy-class`, …
//!
//! ## Pipeline
//!
//! ```text
//! archive ─▶ xpath catalog ─▶ class models ─▶ method analysis
//!                                   │               │
//!                                   ▼               ▼
//!                           class classifier ◀─ method classifier
//!                                   │
//!                                   ▼
//!                      annotated archive + reports
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use stereomap::archive::{run_engine, AnalysisContext};
//!
//! let xml = r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++">
//! <class>class <name>Point</name> <block>{<public>public:
//! <decl_stmt><decl><type><name>int</name></type> <name>x</name></decl>;</decl_stmt>
//! <function><type><name>int</name></type> <name>getX</name><parameter_list>()</parameter_list> <specifier>const</specifier> <block>{<block_content> <return>return <expr><name>x</name></expr>;</return> </block_content>}</block></function>
//! </public>}</block>;</class></unit>"#;
//!
//! let run = run_engine(xml, &AnalysisContext::default(), true).unwrap();
//! assert_eq!(run.classes.len(), 1);
//! assert_eq!(run.classes[0].methods[0].stereotypes[0].as_str(), "get");
//! assert!(run.annotated_xml.unwrap().contains("stereotype"));
//! ```
//!
//! The language-specific knowledge of the srcML AST lives entirely in the
//! [`xpath::catalog`] module; everything downstream works on query results.

pub mod analyzers;
pub mod archive;
pub mod builders;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod model;
pub mod normalize;
pub mod observability;
pub mod primitives;
pub mod taxonomy;
pub mod xpath;

pub use crate::archive::{run_engine, AnalysisContext, EngineRun};
pub use crate::config::StereomapConfig;
pub use crate::core::{ClassStereotype, Language, MethodStereotype, StereomapError};
pub use crate::primitives::PrimitiveTypes;
pub use crate::taxonomy::Taxonomy;
