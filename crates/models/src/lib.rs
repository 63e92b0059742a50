pub mod errors;
pub mod beer;

pub use beer::Beer;
