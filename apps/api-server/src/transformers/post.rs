use quill_core::domain::{PostDetails, PostTranslation, translation_for};
use quill_shared::dto::{PostLocaleFields, PostResponse, TagResponse, UserResponse};

use super::{RenderContext, category_response, flag, image, media_files};

fn locale_fields(translation: Option<&PostTranslation>) -> PostLocaleFields {
    let Some(t) = translation else {
        return PostLocaleFields::default();
    };
    PostLocaleFields {
        title: t.title.clone(),
        slug: t.slug.clone(),
        summary: t.summary.clone().unwrap_or_default(),
        description: t.description.clone().unwrap_or_default(),
        meta_title: t.meta_title.clone().unwrap_or_default(),
        meta_description: t.meta_description.clone().unwrap_or_default(),
        meta_keywords: t.meta_keywords.clone().unwrap_or_default(),
    }
}

pub fn post_response(details: &PostDetails, ctx: &RenderContext<'_>) -> PostResponse {
    let post = &details.post;
    let site = ctx.site;
    let nested = RenderContext {
        locales: &[],
        ..*ctx
    };
    let translation = details.translation(ctx.locale, &site.default_locale);

    PostResponse {
        id: post.id,
        title: translation.map(|t| t.title.clone()),
        slug: translation.map(|t| t.slug.clone()),
        summary: translation.and_then(|t| t.summary.clone()),
        description: translation.and_then(|t| t.description.clone()),
        meta_title: translation.and_then(|t| t.meta_title.clone()),
        meta_description: translation.and_then(|t| t.meta_description.clone()),
        meta_keywords: translation.and_then(|t| t.meta_keywords.clone()),
        translatable_options: translation.and_then(|t| t.translatable_options.clone()),
        url: details.url(site, ctx.locale),
        status: post.status.as_i16(),
        status_name: post.status.name().to_string(),
        featured: flag(post.featured),
        sort_order: post.sort_order.to_string(),
        category_id: post.category_id,
        user_id: post.user_id,
        options: post.options.clone(),
        date_available: post.date_available,
        created_at: post.created_at,
        updated_at: post.updated_at,
        deleted: u8::from(post.is_trashed()),
        main_image: Some(image(details.main_image(site))),
        secondary_image: Some(image(details.secondary_image(site))),
        gallery: details.gallery(site).into_iter().map(image).collect(),
        media_files: media_files(&details.media, site),
        category: details
            .category
            .as_ref()
            .map(|c| Box::new(category_response(c, &nested))),
        categories: details
            .categories
            .as_ref()
            .map(|cs| cs.iter().map(|c| category_response(c, &nested)).collect()),
        tags: details.tags.as_ref().map(|tags| {
            tags.iter()
                .map(|t| TagResponse {
                    id: t.id,
                    name: t.name.clone(),
                    slug: t.slug.clone(),
                })
                .collect()
        }),
        user: details.user.as_ref().map(|u| UserResponse {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            full_name: u.full_name(),
        }),
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

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::{
        Category, CategoryDetails, CategoryTranslation, Post, PostStatus, SiteContext,
    };
    use uuid::Uuid;

    fn details() -> PostDetails {
        let category = Category::new(None);
        let mut post = Post::new(category.id);
        post.status = PostStatus::Published;
        post.featured = true;
        post.sort_order = 4;

        let mut category_details = CategoryDetails::new(category.clone());
        category_details.translations.push(CategoryTranslation {
            id: Uuid::new_v4(),
            category_id: category.id,
            locale: "en".to_string(),
            title: "News".to_string(),
            slug: "news".to_string(),
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        });

        let mut details = PostDetails::new(post.clone());
        details.translations.push(PostTranslation {
            id: Uuid::new_v4(),
            post_id: post.id,
            locale: "en".to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            description: Some("Body".to_string()),
            summary: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            translatable_options: None,
        });
        details.category = Some(category_details);
        details
    }

    #[test]
    fn test_post_shape() {
        let site = SiteContext::new("https://blog.test", "en");
        let ctx = RenderContext {
            site: &site,
            locale: "en",
            locales: &[],
        };
        let json = serde_json::to_value(post_response(&details(), &ctx)).unwrap();

        assert_eq!(json["title"], "Hello");
        assert_eq!(json["featured"], "1");
        assert_eq!(json["sortOrder"], "4");
        assert_eq!(json["statusName"], "published");
        assert_eq!(json["deleted"], 0);
        assert_eq!(json["url"], "https://blog.test/en/blog/news/hello");
        assert_eq!(
            json["mainImage"]["path"],
            "https://blog.test/modules/iblog/img/post/default.jpg"
        );
        assert_eq!(json["category"]["title"], "News");
        assert!(json.get("tags").is_none());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_all_translations_fill_missing_locales() {
        let site = SiteContext::new("https://blog.test", "en");
        let locales = vec!["en".to_string(), "es".to_string()];
        let ctx = RenderContext {
            site: &site,
            locale: "en",
            locales: &locales,
        };
        let json = serde_json::to_value(post_response(&details(), &ctx)).unwrap();

        assert_eq!(json["en"]["title"], "Hello");
        assert_eq!(json["es"]["title"], "");
        assert_eq!(json["es"]["metaKeywords"], "");
        assert!(json["category"].get("es").is_none());
    }
}
