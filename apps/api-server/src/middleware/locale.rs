//! Request locale extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use serde::Deserialize;
use std::future::{Ready, ready};

use crate::config::BlogConfig;
use crate::middleware::error::AppError;

/// Locale a request is served in: the `locale` query parameter, then the
/// first supported `Accept-Language` tag, then the default locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub String);

impl RequestLocale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

/// Pick the request locale among the configured ones.
pub fn resolve_locale(
    requested: Option<&str>,
    accept_language: Option<&str>,
    blog: &BlogConfig,
) -> String {
    if let Some(locale) = requested.map(str::trim).filter(|l| blog.supports(l)) {
        return locale.to_string();
    }

    accept_language
        .into_iter()
        .flat_map(|value| value.split(','))
        .filter_map(|tag| tag.split(';').next())
        .map(|tag| tag.trim().to_lowercase())
        .find_map(|tag| {
            let primary = tag.split(['-', '_']).next().unwrap_or_default().to_string();
            [tag, primary].into_iter().find(|l| blog.supports(l))
        })
        .unwrap_or_else(|| blog.default_locale.clone())
}

impl FromRequest for RequestLocale {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(blog) = req.app_data::<web::Data<BlogConfig>>() else {
            tracing::error!("BlogConfig not found in app data");
            return ready(Err(AppError::Internal(
                "Server configuration error".to_string(),
            )));
        };

        let requested = web::Query::<LocaleQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().locale);
        let accept_language = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        ready(Ok(RequestLocale(resolve_locale(
            requested.as_deref(),
            accept_language,
            blog,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn blog() -> BlogConfig {
        BlogConfig {
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "es".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_query_parameter_wins() {
        assert_eq!(resolve_locale(Some("es"), Some("en"), &blog()), "es");
    }

    #[test]
    fn test_unsupported_parameter_falls_through() {
        assert_eq!(resolve_locale(Some("fr"), Some("es-ES,en;q=0.5"), &blog()), "es");
    }

    #[test]
    fn test_default_locale() {
        assert_eq!(resolve_locale(None, Some("de-DE,fr;q=0.8"), &blog()), "en");
        assert_eq!(resolve_locale(None, None, &blog()), "en");
    }

    #[actix_rt::test]
    async fn test_extractor_reads_request() {
        let req = TestRequest::get()
            .uri("/api/blog/v1/posts?locale=es")
            .app_data(web::Data::new(blog()))
            .to_http_request();

        let locale = RequestLocale::extract(&req).await.unwrap();
        assert_eq!(locale.as_str(), "es");

        let req = TestRequest::get()
            .uri("/api/blog/v1/posts")
            .insert_header((header::ACCEPT_LANGUAGE, "es-MX"))
            .app_data(web::Data::new(blog()))
            .to_http_request();
        assert_eq!(RequestLocale::extract(&req).await.unwrap().0, "es");
    }

    #[actix_rt::test]
    async fn test_extractor_without_config() {
        let req = TestRequest::get().uri("/").to_http_request();
        assert!(RequestLocale::extract(&req).await.is_err());
    }
}
