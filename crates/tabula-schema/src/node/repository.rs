use crate::diagnostic::Location;

///
/// RepositoryElement
/// A `#[repository_for(Model)]` trait implemented by the generated repository.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepositoryElement {
    pub ident: String,
    pub qualified: String,
    pub model: String,
    pub location: Location,
}
