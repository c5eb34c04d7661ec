mod error;
mod options;
mod pending;
mod repository;
mod strategy;

pub use error::{PolicyError, Result};
pub use options::CachePolicyOptions;
pub use pending::Pending;
pub use repository::RepositoryCachePolicy;
pub use strategy::{AllCacheStrategy, PrefixScan};
