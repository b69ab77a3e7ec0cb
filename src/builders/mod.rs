pub mod class;

pub use self::class::{ClassModelBuilder, ClassOccurrence};
