pub mod config;
pub mod loader;
pub mod request;
pub mod source;

pub use config::*;
pub use loader::*;
pub use request::*;
pub use source::*;
