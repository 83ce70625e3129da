use std::fmt;
use std::io::Write;
pub use termcolor::Color;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Write a `label: message` line to stderr, with the label colored.
/// Failing to write to stderr is not worth reporting, so it's ignored.
#[doc(hidden)]
pub fn emit(color: Color, label: &str, args: fmt::Arguments) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stderr, "{label}");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {args}");
}

#[macro_export]
macro_rules! error {
    ($($toks:tt)*) => {
        $crate::color::emit($crate::color::Color::Red, "error", format_args!($($toks)*))
    }
}
#[macro_export]
macro_rules! warning {
    ($($toks:tt)*) => {
        $crate::color::emit($crate::color::Color::Yellow, "warning", format_args!($($toks)*))
    }
}
#[macro_export]
macro_rules! info {
    ($($toks:tt)*) => {
        $crate::color::emit($crate::color::Color::Green, "info", format_args!($($toks)*))
    }
}
#[macro_export]
macro_rules! note {
    ($($toks:tt)*) => {
        $crate::color::emit($crate::color::Color::Cyan, "note", format_args!($($toks)*))
    }
}
