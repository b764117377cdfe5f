use crate::diagnostic::Location;
use std::fmt::{self, Display};

///
/// MigrationElement
/// A `#[migration(version = N)]` function returning `Migration`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MigrationElement {
    pub version: u32,
    pub qualified: String,
    pub location: Location,
}

impl Display for MigrationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.qualified, self.location)
    }
}
