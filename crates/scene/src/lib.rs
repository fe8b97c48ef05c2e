pub mod filter;
pub mod selection;
pub mod tags;
pub mod timeline;

pub use filter::*;
pub use selection::*;
pub use tags::*;
pub use timeline::*;
