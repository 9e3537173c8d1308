//! Configuration module

mod site;

pub use site::ApiConfig;
pub use site::MenuItem;
pub use site::RevalidateConfig;
pub use site::SanitizeConfig;
pub use site::SiteConfig;
