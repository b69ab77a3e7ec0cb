pub mod class;
pub mod method;

pub use self::class::classify_class;
pub use self::method::classify_methods;
