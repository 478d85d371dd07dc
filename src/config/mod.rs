//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::RepositoryConfig;
pub use site::RevalidateConfig;
