//! Domain entities - the core business objects.

mod category;
mod event;
mod media;
mod page;
mod post;
pub mod query;
mod site;
mod tag;
mod translation;
mod user;

pub use category::{
    Category, CategoryChanges, CategoryDetails, CategoryTranslation, CategoryTranslationData,
    NewCategory,
};
pub use event::{BLOG_EVENTS_CHANNEL, BlogEvent};
pub use media::{EntityKind, Image, MediaAttachment, MediaFile, MediaPayload, Zone, public_url};
pub use page::{DEFAULT_PAGE_SIZE, Listing, Page};
pub use post::{
    NewPost, Post, PostChanges, PostDetails, PostStatus, PostTranslation, PostTranslationData,
    category_set,
};
pub use site::{DEFAULT_IMAGE, SiteContext};
pub use tag::{Tag, slugify};
pub use translation::{Localized, translate, translation_for};
pub use user::User;
