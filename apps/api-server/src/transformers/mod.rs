//! Domain details into response DTOs.

mod category;
mod fields;
mod post;

use std::collections::BTreeMap;

use quill_core::domain::{Image, MediaAttachment, SiteContext, public_url};
use quill_shared::dto::{ImageResponse, MediaFileResponse};

pub use category::category_response;
pub use fields::sparse;
pub use post::post_response;

/// Everything a transformer needs besides the entity.
pub struct RenderContext<'a> {
    pub site: &'a SiteContext,
    pub locale: &'a str,
    /// Locales to emit as separate keys; empty unless `allTranslations`.
    pub locales: &'a [String],
}

fn image(image: Image) -> ImageResponse {
    ImageResponse {
        mime_type: image.mime_type,
        path: image.path,
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Attachments grouped by zone, each zone in position order.
fn media_files(
    media: &[MediaAttachment],
    site: &SiteContext,
) -> BTreeMap<String, Vec<MediaFileResponse>> {
    let mut zones: BTreeMap<String, Vec<MediaFileResponse>> = BTreeMap::new();
    let mut sorted: Vec<&MediaAttachment> = media.iter().collect();
    sorted.sort_by_key(|a| a.position);

    for attachment in sorted {
        zones
            .entry(attachment.zone.as_str().to_string())
            .or_default()
            .push(MediaFileResponse {
                id: attachment.file.id,
                filename: attachment.file.filename.clone(),
                path: public_url(&site.base_url, &attachment.file.path),
                mime_type: attachment.file.mimetype.clone(),
                position: attachment.position,
            });
    }
    zones
}
