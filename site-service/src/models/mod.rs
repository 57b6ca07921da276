pub mod blog_post;
pub mod contact_message;
pub mod partner_lead;

pub use blog_post::{BlogPost, BlogPostRecord};
pub use contact_message::ContactMessage;
pub use partner_lead::PartnerLead;

use serde::Serialize;
use validator::Validate;

/// A validated value accepted at the API boundary and written to its own
/// collection.
pub trait Resource: Serialize + Validate + Send + Sync {
    const COLLECTION: &'static str;
}

impl Resource for BlogPost {
    const COLLECTION: &'static str = "blogpost";
}

impl Resource for PartnerLead {
    const COLLECTION: &'static str = "partnerlead";
}

impl Resource for ContactMessage {
    const COLLECTION: &'static str = "contactmessage";
}
