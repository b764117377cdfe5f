use derive_more::{Deref, IntoIterator};
use std::{
    fmt::{self, Display},
    path::PathBuf,
};
use thiserror::Error as ThisError;

///
/// Location
/// 1-based line, 0-based column, as reported by proc-macro2.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column + 1)
    }
}

///
/// Level
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Error,
    Warning,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub location: Option<Location>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {location}")?;
        }

        Ok(())
    }
}

///
/// Diagnostics
///
/// Sink shared by every validator and step of one build. Reporting never
/// aborts the build; callers check `has_errors` at the end.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, ThisError)]
#[error("{}", render(.0))]
pub struct Diagnostics(#[into_iterator(owned, ref)] Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn error(&mut self, location: Option<&Location>, message: impl Into<String>) {
        self.push(Level::Error, location, message.into());
    }

    pub fn warning(&mut self, location: Option<&Location>, message: impl Into<String>) {
        self.push(Level::Warning, location, message.into());
    }

    fn push(&mut self, level: Level, location: Option<&Location>, message: String) {
        self.0.push(Diagnostic {
            level,
            message,
            location: location.cloned(),
        });
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.level == Level::Error)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.level == Level::Error).count()
    }

    /// Error messages without locations, in report order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|d| d.level == Level::Error)
            .map(|d| d.message.as_str())
            .collect()
    }

    /// `Err(self)` if any error was reported.
    pub fn result(self) -> Result<Self, Self> {
        if self.has_errors() { Err(self) } else { Ok(self) }
    }
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report a formatted error against a location.
#[macro_export]
macro_rules! err {
    ($diagnostics:expr, $location:expr, $($arg:tt)*) => {{
        $diagnostics.error(Some($location), format!($($arg)*));
    }};
}
