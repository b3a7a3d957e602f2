//! Entity type definitions
//!
//! - [`Cinematic`] - a sequence of shots, each a camera setup plus dialog nodes

pub mod cinematic;

pub use cinematic::Cinematic;
