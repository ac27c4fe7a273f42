//! Request payload models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod item;
pub mod validation;

pub use item::{ItemName, ItemPatch, NewItem};
pub use validation::ValidationError;
