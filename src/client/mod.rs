//! Client facade: [`Neuredge`] and its builder.

mod builder;
mod core;
pub(crate) mod endpoint;

pub use self::builder::{NeuredgeBuilder, DEFAULT_BASE_URL};
pub use self::core::Neuredge;
