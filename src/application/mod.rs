// Application layer - use cases and orchestration over the stores.

pub mod error;
pub mod filter;
pub mod reporting;
pub mod service;

pub use error::*;
pub use filter::*;
pub use reporting::*;
pub use service::*;
