pub mod blog;
pub mod contact;
pub mod diagnostics;
pub mod health;
pub mod partners;
pub mod resources;

pub use blog::{create_blog_post, list_blog_posts};
pub use contact::create_contact_message;
pub use diagnostics::diagnostics;
pub use health::{health_check, hello, metrics_endpoint, readiness_check, root};
pub use partners::create_partner_lead;
