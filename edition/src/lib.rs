// Library interface for the edition modules
// This allows tests and the binary to import modules

pub mod document;
pub mod error;
pub mod markup;
pub mod pipeline;
pub mod transport;

pub use error::EditionError;
