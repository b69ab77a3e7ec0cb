pub mod class;
pub mod method;
pub mod variable;

pub use self::class::{ClassModel, ClassNames};
pub use self::method::Method;
pub use self::variable::Variable;
