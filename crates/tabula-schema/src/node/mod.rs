mod column;
mod migration;
mod model;
mod repository;
mod type_adapter;

pub use column::*;
pub use migration::*;
pub use model::*;
pub use repository::*;
pub use type_adapter::*;
