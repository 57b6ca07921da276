use mongodb::bson::{self, Document};
use serde::{Deserialize, Deserializer, Serialize};
use service_core::utils::{FieldKind, FieldSpec, PayloadSchema};
use validator::Validate;

pub const DEFAULT_LANG: &str = "en";

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// A blog entry. Length caps apply to incoming payloads only; posts read back
/// from the store are rebuilt through [`BlogPostRecord`] without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BlogPost {
    #[validate(length(min = 1, max = 180, message = "Title must be 1-180 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Slug must be 1-200 characters"))]
    pub slug: String,
    #[validate(length(max = 300, message = "Excerpt must be at most 300 characters"))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// "en" or "fi"; not enforced.
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl PayloadSchema for BlogPost {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("title", FieldKind::Text),
        FieldSpec::required("slug", FieldKind::Text),
        FieldSpec::optional("excerpt", FieldKind::Text),
        FieldSpec::required("content", FieldKind::Text),
        FieldSpec::optional("cover_image", FieldKind::Text),
        FieldSpec::defaulted("tags", FieldKind::TextList),
        FieldSpec::defaulted("lang", FieldKind::Text),
    ];
}

/// A key that may be missing but, when present, must hold a value.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Schema-on-read view of a stored blog document. Missing keys decode as
/// `None`; an explicit null is only accepted for `excerpt` and
/// `cover_image`. Keys the post does not know about (`_id`, timestamps)
/// are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BlogPostRecord {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub lang: Option<String>,
}

impl From<BlogPostRecord> for BlogPost {
    fn from(record: BlogPostRecord) -> Self {
        Self {
            title: record.title.unwrap_or_default(),
            slug: record.slug.unwrap_or_default(),
            excerpt: record.excerpt,
            content: record.content.unwrap_or_default(),
            cover_image: record.cover_image,
            tags: record.tags.unwrap_or_default(),
            lang: record.lang.unwrap_or_else(default_lang),
        }
    }
}

impl BlogPost {
    /// Rebuilds a post from a raw stored document, filling defaults for
    /// anything missing. Fails when a present field has the wrong type or a
    /// required one is null.
    pub fn from_document(document: Document) -> Result<Self, bson::de::Error> {
        bson::from_document::<BlogPostRecord>(document).map(BlogPost::from)
    }

    /// Rebuilds every document it can and skips the rest.
    pub fn from_documents(documents: Vec<Document>) -> Vec<Self> {
        documents
            .into_iter()
            .filter_map(|document| {
                let id = document.get("_id").map(|id| id.to_string());
                match BlogPost::from_document(document) {
                    Ok(post) => Some(post),
                    Err(e) => {
                        tracing::debug!(
                            document_id = ?id,
                            error = %e,
                            "Skipping unreadable blog post"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
