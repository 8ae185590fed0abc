//! Small generic helpers.

mod binding;
mod builder;

pub use binding::Binding;
pub use builder::build;
