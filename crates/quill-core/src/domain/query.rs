//! Typed listing and lookup parameters.
//!
//! The HTTP layer receives loosely-typed filters; they are validated into
//! these types before a repository ever sees them, so the query builders only
//! deal with known columns and relations.

use chrono::NaiveDate;
use uuid::Uuid;

use super::media::EntityKind;
use super::post::PostStatus;
use crate::error::DomainError;

/// Which rows a query sees with respect to soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashedScope {
    #[default]
    Exclude,
    With,
    Only,
}

impl TrashedScope {
    /// `only` wins when both flags are set.
    pub fn from_flags(only_trashed: bool, with_trashed: bool) -> Self {
        if only_trashed {
            Self::Only
        } else if with_trashed {
            Self::With
        } else {
            Self::Exclude
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortWay {
    Asc,
    #[default]
    Desc,
}

impl SortWay {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::validation(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

/// Accepts both `snake_case` and `camelCase` spellings.
fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Attributes stored in the translation side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslatedField {
    Title,
    Slug,
    Description,
    Summary,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
}

impl TranslatedField {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "title" => Some(Self::Title),
            "slug" => Some(Self::Slug),
            "description" => Some(Self::Description),
            "summary" => Some(Self::Summary),
            "meta_title" => Some(Self::MetaTitle),
            "meta_description" => Some(Self::MetaDescription),
            "meta_keywords" => Some(Self::MetaKeywords),
            _ => None,
        }
    }

    pub fn applies_to(self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Post => true,
            EntityKind::Category => self != Self::Summary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Description => "description",
            Self::Summary => "summary",
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::MetaKeywords => "meta_keywords",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostColumn {
    Id,
    CategoryId,
    UserId,
    Status,
    Featured,
    SortOrder,
    DateAvailable,
    CreatedAt,
    UpdatedAt,
}

impl PostColumn {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "id" => Some(Self::Id),
            "category_id" => Some(Self::CategoryId),
            "user_id" => Some(Self::UserId),
            "status" => Some(Self::Status),
            "featured" => Some(Self::Featured),
            "sort_order" => Some(Self::SortOrder),
            "date_available" => Some(Self::DateAvailable),
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Id,
    ParentId,
    ShowMenu,
    Featured,
    SortOrder,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl CategoryColumn {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "id" => Some(Self::Id),
            "parent_id" => Some(Self::ParentId),
            "show_menu" => Some(Self::ShowMenu),
            "featured" => Some(Self::Featured),
            "sort_order" => Some(Self::SortOrder),
            "status" => Some(Self::Status),
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// A sortable field: either a column of the entity table or a translated
/// attribute, which is sorted through the translation row of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField<C> {
    Column(C),
    Translated(TranslatedField),
}

pub type PostSortField = SortField<PostColumn>;
pub type CategorySortField = SortField<CategoryColumn>;

impl PostSortField {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        if let Some(field) = TranslatedField::parse(name) {
            return Ok(Self::Translated(field));
        }
        PostColumn::parse(name)
            .map(Self::Column)
            .ok_or_else(|| DomainError::validation(format!("cannot sort posts by '{name}'")))
    }
}

impl CategorySortField {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        if let Some(field) = TranslatedField::parse(name) {
            if field.applies_to(EntityKind::Category) {
                return Ok(Self::Translated(field));
            }
        }
        CategoryColumn::parse(name)
            .map(Self::Column)
            .ok_or_else(|| DomainError::validation(format!("cannot sort categories by '{name}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub way: SortWay,
}

impl<F> SortSpec<F> {
    pub fn new(field: F, way: SortWay) -> Self {
        Self { field, way }
    }
}

/// Date column a date range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostDateField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DateAvailable,
}

impl PostDateField {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match normalize_name(name).as_str() {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "date_available" => Ok(Self::DateAvailable),
            other => Err(DomainError::validation(format!(
                "cannot filter posts by date field '{other}'"
            ))),
        }
    }
}

/// Inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub field: PostDateField,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Named relations a caller may ask to be loaded.
pub trait Include: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];
    /// Relations that are always loaded; naming them is accepted and ignored.
    const ALWAYS_LOADED: &'static [&'static str];

    fn parse(name: &str) -> Option<Self>;

    /// Parse a comma separated include list. `*` selects every relation.
    fn parse_list(csv: &str) -> Result<Vec<Self>, DomainError> {
        let mut includes = Vec::new();
        for raw in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if raw == "*" {
                return Ok(Self::ALL.to_vec());
            }
            if Self::ALWAYS_LOADED.contains(&raw) {
                continue;
            }
            let include = Self::parse(raw)
                .ok_or_else(|| DomainError::validation(format!("unknown include '{raw}'")))?;
            if !includes.contains(&include) {
                includes.push(include);
            }
        }
        Ok(includes)
    }
}

/// Optional post relations. Translations, media and the primary category are
/// always loaded since links and images depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostInclude {
    Categories,
    Tags,
    User,
}

impl Include for PostInclude {
    const ALL: &'static [Self] = &[Self::Categories, Self::Tags, Self::User];
    const ALWAYS_LOADED: &'static [&'static str] =
        &["translations", "files", "mediaFiles", "category"];

    fn parse(name: &str) -> Option<Self> {
        match name {
            "categories" => Some(Self::Categories),
            "tags" => Some(Self::Tags),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryInclude {
    Parent,
    Children,
    Posts,
}

impl Include for CategoryInclude {
    const ALL: &'static [Self] = &[Self::Parent, Self::Children, Self::Posts];
    const ALWAYS_LOADED: &'static [&'static str] = &["translations", "files", "mediaFiles"];

    fn parse(name: &str) -> Option<Self> {
        match name {
            "parent" => Some(Self::Parent),
            "children" => Some(Self::Children),
            "posts" => Some(Self::Posts),
            _ => None,
        }
    }
}

/// Filters accepted by the post listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    /// Posts in any of these categories, as primary or secondary category.
    pub categories: Vec<Uuid>,
    /// Posts in this category or any of its descendants.
    pub category: Option<Uuid>,
    pub only_trashed: bool,
    pub with_trashed: bool,
    pub featured: Option<bool>,
    pub tag_id: Option<Uuid>,
    /// Tag slugs; every slug must be present on the post.
    pub tag_slugs: Vec<String>,
    pub users: Vec<Uuid>,
    pub include: Vec<Uuid>,
    pub exclude: Vec<Uuid>,
    pub exclude_categories: Vec<Uuid>,
    pub exclude_users: Vec<Uuid>,
    pub search: Option<String>,
    /// Locale used for search; defaults to the request locale.
    pub locale: Option<String>,
    pub date: Option<DateRange>,
    pub order: Option<SortSpec<PostSortField>>,
    pub status: Option<PostStatus>,
    pub no_sort_order: bool,
}

impl PostFilter {
    pub fn trashed_scope(&self) -> TrashedScope {
        TrashedScope::from_flags(self.only_trashed, self.with_trashed)
    }
}

/// Everything a post listing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PostListParams {
    pub includes: Vec<PostInclude>,
    pub filter: PostFilter,
    pub order: Vec<SortSpec<PostSortField>>,
    /// 1-based page; `None` returns a plain list.
    pub page: Option<u64>,
    pub take: Option<u64>,
    /// Skips the public pre-filters (availability date and published status).
    pub from_admin: bool,
    /// Request locale, used to sort by translated attributes.
    pub locale: String,
}

impl PostListParams {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            includes: Vec::new(),
            filter: PostFilter::default(),
            order: Vec::new(),
            page: None,
            take: None,
            from_admin: false,
            locale: locale.into(),
        }
    }

    pub fn search_locale(&self) -> &str {
        self.filter.locale.as_deref().unwrap_or(&self.locale)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    pub parent_id: Option<Uuid>,
    pub featured: Option<bool>,
    pub show_menu: Option<bool>,
    pub search: Option<String>,
    pub locale: Option<String>,
    pub include: Vec<Uuid>,
    pub exclude: Vec<Uuid>,
    pub only_trashed: bool,
    pub with_trashed: bool,
    pub order: Option<SortSpec<CategorySortField>>,
}

impl CategoryFilter {
    pub fn trashed_scope(&self) -> TrashedScope {
        TrashedScope::from_flags(self.only_trashed, self.with_trashed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListParams {
    pub includes: Vec<CategoryInclude>,
    pub filter: CategoryFilter,
    pub order: Vec<SortSpec<CategorySortField>>,
    pub page: Option<u64>,
    pub take: Option<u64>,
    pub locale: String,
}

impl CategoryListParams {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            includes: Vec::new(),
            filter: CategoryFilter::default(),
            order: Vec::new(),
            page: None,
            take: None,
            locale: locale.into(),
        }
    }

    pub fn search_locale(&self) -> &str {
        self.filter.locale.as_deref().unwrap_or(&self.locale)
    }
}

/// How a single record is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(Uuid),
    Translated {
        field: TranslatedField,
        value: String,
        locale: String,
    },
}

impl Lookup {
    /// `field` defaults to `id`; translated fields are matched in `locale`.
    pub fn parse(
        criteria: &str,
        field: Option<&str>,
        locale: &str,
        kind: EntityKind,
    ) -> Result<Self, DomainError> {
        match field.map(str::trim).filter(|f| !f.is_empty()) {
            None | Some("id") => Uuid::parse_str(criteria)
                .map(Self::Id)
                .map_err(|_| DomainError::not_found(kind.as_str(), criteria)),
            Some(name) => match TranslatedField::parse(name) {
                Some(field) if field.applies_to(kind) => Ok(Self::Translated {
                    field,
                    value: criteria.to_string(),
                    locale: locale.to_string(),
                }),
                _ => Err(DomainError::validation(format!(
                    "cannot look up a {} by '{name}'",
                    kind.as_str()
                ))),
            },
        }
    }
}

/// Options for a single-record read.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemParams<I> {
    pub includes: Vec<I>,
    pub trashed: TrashedScope,
    pub from_admin: bool,
}

impl<I> Default for ItemParams<I> {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            trashed: TrashedScope::Exclude,
            from_admin: false,
        }
    }
}

/// Options for a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteParams {
    /// Remove the row instead of marking it deleted.
    pub force: bool,
}

/// Search input reduced to matchable terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    pub phrase: String,
    /// Terms of at least three characters; all of them must match.
    pub required: Vec<String>,
}

impl SearchTerms {
    /// Patterns every matching title must contain.
    pub fn patterns(&self) -> Vec<String> {
        if self.required.is_empty() {
            vec![self.phrase.to_lowercase()]
        } else {
            self.required.iter().map(|t| t.to_lowercase()).collect()
        }
    }
}

/// Strip punctuation and split a search string into terms.
/// Returns `None` when nothing searchable is left.
pub fn normalize_search(text: &str) -> Option<SearchTerms> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    Some(SearchTerms {
        phrase: words.join(" "),
        required: words
            .iter()
            .filter(|w| w.chars().count() >= 3)
            .map(|w| w.to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_trashed_wins() {
        assert_eq!(TrashedScope::from_flags(true, true), TrashedScope::Only);
        assert_eq!(TrashedScope::from_flags(false, true), TrashedScope::With);
        assert_eq!(TrashedScope::from_flags(false, false), TrashedScope::Exclude);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(
            PostSortField::parse("title").unwrap(),
            SortField::Translated(TranslatedField::Title)
        );
        assert_eq!(
            PostSortField::parse("createdAt").unwrap(),
            SortField::Column(PostColumn::CreatedAt)
        );
        assert_eq!(
            PostSortField::parse("sort_order").unwrap(),
            SortField::Column(PostColumn::SortOrder)
        );
        assert!(PostSortField::parse("password; drop table").is_err());
        assert!(CategorySortField::parse("summary").is_err());
        assert_eq!(
            CategorySortField::parse("parentId").unwrap(),
            SortField::Column(CategoryColumn::ParentId)
        );
    }

    #[test]
    fn test_sort_way_is_case_insensitive() {
        assert_eq!(SortWay::parse("ASC").unwrap(), SortWay::Asc);
        assert_eq!(SortWay::parse("desc").unwrap(), SortWay::Desc);
        assert!(SortWay::parse("sideways").is_err());
    }

    #[test]
    fn test_include_list() {
        assert_eq!(
            PostInclude::parse_list("tags, user,tags,translations").unwrap(),
            vec![PostInclude::Tags, PostInclude::User]
        );
        assert_eq!(PostInclude::parse_list("*").unwrap(), PostInclude::ALL.to_vec());
        assert!(PostInclude::parse_list("comments").is_err());
        assert!(PostInclude::parse_list("").unwrap().is_empty());
        assert_eq!(
            CategoryInclude::parse_list("children,parent").unwrap(),
            vec![CategoryInclude::Children, CategoryInclude::Parent]
        );
    }

    #[test]
    fn test_normalize_search() {
        let terms = normalize_search("Rust's async, in 2024!").unwrap();
        assert_eq!(terms.phrase, "Rust s async in 2024");
        assert_eq!(terms.required, vec!["Rust", "async", "2024"]);
        assert_eq!(terms.patterns(), vec!["rust", "async", "2024"]);

        let short = normalize_search("go ai").unwrap();
        assert!(short.required.is_empty());
        assert_eq!(short.patterns(), vec!["go ai"]);

        assert!(normalize_search(" -- !! ").is_none());
    }

    #[test]
    fn test_lookup_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(
            Lookup::parse(&id.to_string(), None, "en", EntityKind::Post).unwrap(),
            Lookup::Id(id)
        );
        assert_eq!(
            Lookup::parse("hello", Some("slug"), "es", EntityKind::Post).unwrap(),
            Lookup::Translated {
                field: TranslatedField::Slug,
                value: "hello".into(),
                locale: "es".into()
            }
        );
        assert!(matches!(
            Lookup::parse("not-a-uuid", Some("id"), "en", EntityKind::Post),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            Lookup::parse("x", Some("summary"), "en", EntityKind::Category),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Lookup::parse("x", Some("user_id"), "en", EntityKind::Post),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_date_field_parsing() {
        assert_eq!(
            PostDateField::parse("dateAvailable").unwrap(),
            PostDateField::DateAvailable
        );
        assert!(PostDateField::parse("deleted_at").is_err());
    }
}
