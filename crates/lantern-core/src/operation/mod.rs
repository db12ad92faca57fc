//! Turning a parsed query document into an operation checked against the
//! schema.

mod prepare;

pub use prepare::PreparedField;
pub use prepare::PreparedGroup;
pub use prepare::PreparedOperation;
pub use prepare::PreparedSelection;
pub use prepare::prepare;
pub use prepare::selection_shape;
