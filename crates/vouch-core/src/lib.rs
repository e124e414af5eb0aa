pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod record;
pub mod store;

pub use error::{Result, VouchError};
pub use record::{Rating, VouchRecord};
pub use store::RecordStore;
