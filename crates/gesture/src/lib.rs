pub mod cards;
pub mod headless;
pub mod router;
pub mod session;
pub mod surface;
pub mod target;
pub mod transition;

pub use cards::*;
pub use headless::*;
pub use router::*;
pub use session::*;
pub use surface::*;
pub use target::*;
pub use transition::*;
