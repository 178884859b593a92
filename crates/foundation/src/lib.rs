pub mod bounds;
pub mod chamber;
pub mod fips;
pub mod future;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use chamber::*;
pub use future::BoxFuture;
