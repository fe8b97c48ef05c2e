pub mod error;
pub mod feature_collection;
pub mod format;
pub mod ingest;
pub mod pcd;
pub mod point_set;
pub mod xyz;

pub use error::*;
pub use feature_collection::*;
pub use format::*;
pub use ingest::*;
pub use point_set::*;
