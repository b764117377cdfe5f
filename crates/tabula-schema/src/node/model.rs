use crate::{diagnostic::Location, node::RepositoryElement};

///
/// ModelElement
/// A `#[table]` struct. Its columns live in the registry, keyed by `qualified`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelElement {
    pub ident: String,
    pub qualified: String,
    pub table: String,
    pub location: Location,
    pub repository: Option<RepositoryElement>,
}
