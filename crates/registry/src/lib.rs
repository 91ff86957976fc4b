pub mod config;
pub mod demo;
pub mod layer;
pub mod registry;
pub mod settings;

pub use config::*;
pub use layer::*;
pub use registry::*;
pub use settings::*;
