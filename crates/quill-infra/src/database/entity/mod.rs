//! SeaORM entities for the blog schema.

pub mod category;
pub mod category_translation;
pub mod media_file;
pub mod media_zone;
pub mod post;
pub mod post_category;
pub mod post_tag;
pub mod post_translation;
pub mod tag;
pub mod user;
