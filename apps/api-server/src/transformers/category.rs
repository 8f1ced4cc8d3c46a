use quill_core::domain::{CategoryDetails, CategoryTranslation, translation_for};
use quill_shared::dto::{CategoryLocaleFields, CategoryResponse};

use super::{RenderContext, flag, image, media_files, post_response};

/// Shown instead of a link when the category has no slug in the locale.
const NO_URL: &str = "#";

fn locale_fields(translation: Option<&CategoryTranslation>) -> CategoryLocaleFields {
    translation
        .map(|t| CategoryLocaleFields {
            title: t.title.clone(),
            slug: t.slug.clone(),
            description: t.description.clone().unwrap_or_default(),
            meta_title: t.meta_title.clone().unwrap_or_default(),
            meta_description: t.meta_description.clone().unwrap_or_default(),
            meta_keywords: t.meta_keywords.clone().unwrap_or_default(),
        })
        .unwrap_or_default()
}

pub fn category_response(details: &CategoryDetails, ctx: &RenderContext<'_>) -> CategoryResponse {
    let category = &details.category;
    let site = ctx.site;
    let nested = RenderContext {
        locales: &[],
        ..*ctx
    };
    let translation = details.translation(ctx.locale, &site.default_locale);

    CategoryResponse {
        id: category.id,
        title: translation.map(|t| t.title.clone()),
        slug: translation.map(|t| t.slug.clone()),
        description: translation.and_then(|t| t.description.clone()),
        meta_title: translation.and_then(|t| t.meta_title.clone()),
        meta_description: translation.and_then(|t| t.meta_description.clone()),
        meta_keywords: translation.and_then(|t| t.meta_keywords.clone()),
        url: details
            .url(site, ctx.locale)
            .unwrap_or_else(|| NO_URL.to_string()),
        parent_id: category.parent_id,
        show_menu: category.show_menu,
        featured: flag(category.featured),
        sort_order: category.sort_order.to_string(),
        status: category.status,
        options: category.options.clone(),
        created_at: category.created_at,
        updated_at: category.updated_at,
        deleted: u8::from(category.deleted_at.is_some()),
        main_image: Some(image(details.main_image(site))),
        secondary_image: details.secondary_image(site).map(image),
        media_files: media_files(&details.media, site),
        parent: details
            .parent
            .as_deref()
            .map(|p| Box::new(category_response(p, &nested))),
        children: details
            .children
            .as_ref()
            .map(|cs| cs.iter().map(|c| category_response(c, &nested)).collect()),
        posts: details
            .posts
            .as_ref()
            .map(|ps| ps.iter().map(|p| post_response(p, &nested)).collect()),
        locales: ctx
            .locales
            .iter()
            .map(|locale| {
                (
                    locale.clone(),
                    locale_fields(translation_for(&details.translations, locale)),
                )
            })
            .collect(),
    }
}
