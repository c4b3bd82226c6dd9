//! Read-side reference resolution.

pub mod fields;
pub mod sync;

pub use fields::ReferenceFields;
pub use sync::ReferenceSync;
