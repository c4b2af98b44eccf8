//! Shared utility helpers.

pub mod error;
pub(crate) mod math;

pub use error::{NmsError, NmsResult};
pub use math::Element;
