/// Public-facing settings needed to build links and resolve images.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub base_url: String,
    pub default_locale: String,
    pub default_image: String,
    pub use_old_routes: bool,
}

impl SiteContext {
    pub fn new(base_url: impl Into<String>, default_locale: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_locale: default_locale.into(),
            default_image: DEFAULT_IMAGE.to_string(),
            use_old_routes: false,
        }
    }

    pub(crate) fn link(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }
}

/// Image served when a post or category has nothing in the requested zone.
pub const DEFAULT_IMAGE: &str = "modules/iblog/img/post/default.jpg";
