pub mod calls;
pub mod method;

pub use self::calls::{classify_call, ignored_calls, CallContext, CallKind, CallSite};
pub use self::method::{MethodAnalyzer, MethodInput};
