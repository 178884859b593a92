use std::future::Future;
use std::pin::Pin;

/// Boxed future for async methods on dyn-compatible traits (boundary and
/// roster sources).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
