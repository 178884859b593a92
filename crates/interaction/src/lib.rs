pub mod district;
pub mod event_bus;
pub mod pointer;
pub mod preview;
pub mod resolver;
pub mod selection;
pub mod session;

pub use district::*;
pub use event_bus::*;
pub use pointer::*;
pub use preview::*;
pub use resolver::*;
pub use selection::*;
pub use session::*;
