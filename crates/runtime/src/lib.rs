pub mod activity_log;
pub mod ticker;

pub use activity_log::*;
pub use ticker::*;
