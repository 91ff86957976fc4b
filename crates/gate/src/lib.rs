pub mod controller;
pub mod gate;
pub mod sampler;

pub use controller::*;
pub use gate::*;
pub use sampler::*;
