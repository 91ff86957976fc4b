pub mod debounce;
pub mod event_bus;
pub mod idle;
pub mod rate_limit;

pub use debounce::*;
pub use event_bus::*;
pub use idle::*;
pub use rate_limit::*;
