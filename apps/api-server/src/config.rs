//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_core::domain::{DEFAULT_IMAGE, DEFAULT_PAGE_SIZE, SiteContext};
use quill_infra::database::DatabaseConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Blog presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogConfig {
    /// Public base URL used for links and image paths.
    pub app_url: String,
    pub posts_per_page: u64,
    pub default_locale: String,
    pub supported_locales: Vec<String>,
    pub use_old_routes: bool,
    pub default_image: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:8080".to_string(),
            posts_per_page: DEFAULT_PAGE_SIZE,
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string()],
            use_old_routes: false,
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl BlogConfig {
    pub fn site(&self) -> SiteContext {
        SiteContext {
            base_url: self.app_url.clone(),
            default_locale: self.default_locale.clone(),
            default_image: self.default_image.clone(),
            use_old_routes: self.use_old_routes,
        }
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.supported_locales.iter().any(|l| l == locale)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub blog: BlogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;
        let mut database = DatabaseConfig::new(url);
        database.max_connections = parsed(&var, "DB_MAX_CONNECTIONS", 20)?;
        database.min_connections = parsed(&var, "DB_MIN_CONNECTIONS", 2)?;
        database.sql_logging = flag(&var, "DB_SQL_LOGGING", false);

        let defaults = BlogConfig::default();
        let default_locale = var("BLOG_DEFAULT_LOCALE").unwrap_or(defaults.default_locale);
        let mut supported_locales: Vec<String> = var("BLOG_SUPPORTED_LOCALES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if !supported_locales.contains(&default_locale) {
            supported_locales.insert(0, default_locale.clone());
        }

        let blog = BlogConfig {
            app_url: var("APP_URL").unwrap_or(defaults.app_url),
            posts_per_page: parsed(&var, "BLOG_POSTS_PER_PAGE", defaults.posts_per_page)?.max(1),
            default_locale,
            supported_locales,
            use_old_routes: flag(&var, "BLOG_USE_OLD_ROUTES", false),
            default_image: var("BLOG_DEFAULT_IMAGE").unwrap_or(defaults.default_image),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&var, "PORT", 8080)?,
            database,
            blog,
        })
    }
}

fn parsed<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn flag(var: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database.url, "postgres://db");
        assert_eq!(config.blog.posts_per_page, 12);
        assert_eq!(config.blog.supported_locales, vec!["en"]);
        assert_eq!(config.blog.default_image, "modules/iblog/img/post/default.jpg");
        assert!(!config.blog.use_old_routes);
    }

    #[test]
    fn test_blog_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("BLOG_POSTS_PER_PAGE", "5"),
            ("BLOG_DEFAULT_LOCALE", "es"),
            ("BLOG_SUPPORTED_LOCALES", "en, fr"),
            ("BLOG_USE_OLD_ROUTES", "true"),
        ]))
        .unwrap();

        assert_eq!(config.blog.posts_per_page, 5);
        assert_eq!(config.blog.supported_locales, vec!["es", "en", "fr"]);
        assert!(config.blog.supports("fr"));
        assert!(config.blog.site().use_old_routes);
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn test_invalid_number() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }
}
