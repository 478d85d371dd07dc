//! Helper functions shared by the normalizer, generator and templates

mod date;
mod reading_time;
mod url;

pub use date::*;
pub use reading_time::*;
pub use url::*;
