pub mod choropleth;

pub use choropleth::*;
