pub mod index;
pub mod member;
pub mod source;

pub use index::*;
pub use member::*;
pub use source::*;
