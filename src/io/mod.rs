pub mod output;

pub use self::output::{
    create_writer, ClassReport, JsonWriter, MethodReport, OutputFormat, OutputWriter,
    StereotypeReport, TerminalWriter,
};
