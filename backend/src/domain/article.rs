//! Article data model and the listing visibility rules.
//!
//! [`ListSelection::resolve`] is the single place that decides which article
//! statuses a caller may see when listing. Handlers parse the status filter,
//! this module turns it into a store predicate (or short-circuits to an empty
//! page), and the repository translates the predicate into SQL.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum allowed length for an article title.
pub const TITLE_MAX: usize = 200;
/// Maximum allowed length for article content.
pub const CONTENT_MAX: usize = 50_000;
/// Character count above which list views truncate content.
pub const PREVIEW_CHARS: usize = 50;

/// Validation errors raised by the article field newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooLong { max: usize },
    InvalidStatus,
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title cannot exceed {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "content cannot exceed {max} characters")
            }
            Self::InvalidStatus => write!(f, "status must be draft or published"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Article headline, trimmed, at most [`TITLE_MAX`] characters.
///
/// Unique per author among non-deleted articles (enforced by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`].
    pub fn new(title: impl AsRef<str>) -> Result<Self, ArticleValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

/// Article body, at most [`CONTENT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    /// Validate and construct a [`Content`].
    pub fn new(content: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ArticleValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(ArticleValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self(content))
    }

    /// List-view preview: the first [`PREVIEW_CHARS`] characters plus an
    /// ellipsis once the content reaches that length, verbatim below it.
    pub fn preview(&self) -> String {
        if self.0.chars().count() >= PREVIEW_CHARS {
            let head: String = self.0.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            self.0.clone()
        }
    }
}

impl AsRef<str> for Content {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Content> for String {
    fn from(value: Content) -> Self {
        value.0
    }
}

/// Publication state of an article.
///
/// `Deleted` is terminal and only ever set by the soft-delete path; create
/// and update payloads accept `Draft` and `Published` exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleStatus {
    Draft,
    Published,
    Deleted,
}

impl ArticleStatus {
    /// Lowercase identifier used on the wire and in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Deleted => "deleted",
        }
    }

    /// Whether create/update payloads may set this status.
    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Draft | Self::Published)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = ArticleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ArticleValidationError::InvalidStatus),
        }
    }
}

/// Component parts of a stored article, as loaded from the store.
#[derive(Debug, Clone)]
pub struct ArticleParts {
    pub id: Uuid,
    pub title: Title,
    pub content: Content,
    pub status: ArticleStatus,
    pub author: UserId,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Published or draft article owned by a single author.
///
/// ## Invariants
/// - `(author, title)` is unique among non-deleted articles.
/// - `deleted` and `status == Deleted` are set together by soft delete.
#[derive(Debug, Clone)]
pub struct Article {
    id: Uuid,
    title: Title,
    content: Content,
    status: ArticleStatus,
    author: UserId,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Assemble an article from validated parts.
    pub fn from_parts(parts: ArticleParts) -> Self {
        let ArticleParts {
            id,
            title,
            content,
            status,
            author,
            tags,
            created_at,
            updated_at,
            deleted,
            deleted_at,
        } = parts;
        Self {
            id,
            title,
            content,
            status,
            author,
            tags,
            created_at,
            updated_at,
            deleted,
            deleted_at,
        }
    }

    /// Stable article identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Article headline.
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Article body.
    pub const fn content(&self) -> &Content {
        &self.content
    }

    /// Publication state.
    pub const fn status(&self) -> ArticleStatus {
        self.status
    }

    /// Owning author.
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// Free-form tags. Persisted but not exposed through the API.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Creation timestamp; listing sorts descending on this.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Soft-delete flag.
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Soft-delete timestamp, when deleted.
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Whether `user` owns this article.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.author == user
    }

    /// Whether `viewer` may read this article directly.
    ///
    /// Drafts are visible only to their author; published articles to anyone.
    /// Deleted articles are invisible on every read path.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        if self.deleted {
            return false;
        }
        match self.status {
            ArticleStatus::Published => true,
            ArticleStatus::Draft => viewer.is_some_and(|id| self.is_owned_by(id)),
            ArticleStatus::Deleted => false,
        }
    }
}

/// Status predicate handed to the store when listing articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPredicate {
    /// `status IN (...)`, any author.
    AnyOf(Vec<ArticleStatus>),
    /// The caller's own drafts, unioned with `status IN (statuses)` for any
    /// author. `statuses` may be empty (drafts only were requested).
    OwnDraftsOr {
        author: UserId,
        statuses: Vec<ArticleStatus>,
    },
}

/// Outcome of resolving a listing request against the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSelection {
    /// The filter can match nothing; answer with an empty page and skip the
    /// store entirely.
    Empty,
    /// Query the store with this predicate.
    Query(StatusPredicate),
}

impl ListSelection {
    /// Resolve the caller identity and optional status filter into a store
    /// selection.
    ///
    /// `statuses` is the already-validated filter: `None` when the caller
    /// supplied no status parameter, otherwise a non-empty set drawn from
    /// {draft, published}.
    ///
    /// Anonymous callers only ever see published articles; requesting drafts
    /// alone yields [`ListSelection::Empty`]. Authenticated callers see
    /// published articles by default, and their own drafts only when the
    /// filter names "draft" explicitly.
    pub fn resolve(caller: Option<&UserId>, statuses: Option<&[ArticleStatus]>) -> Self {
        match (caller, statuses) {
            (None, None) => Self::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published])),
            (None, Some(requested)) => {
                let allowed: Vec<ArticleStatus> = requested
                    .iter()
                    .copied()
                    .filter(|status| *status != ArticleStatus::Draft)
                    .collect();
                if allowed.is_empty() {
                    Self::Empty
                } else {
                    Self::Query(StatusPredicate::AnyOf(allowed))
                }
            }
            // The caller's own drafts are intentionally not merged into the
            // unfiltered listing; only an explicit draft filter surfaces them.
            (Some(_), None) => {
                Self::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published]))
            }
            (Some(caller_id), Some(requested)) => {
                if requested.contains(&ArticleStatus::Draft) {
                    let others: Vec<ArticleStatus> = requested
                        .iter()
                        .copied()
                        .filter(|status| *status != ArticleStatus::Draft)
                        .collect();
                    Self::Query(StatusPredicate::OwnDraftsOr {
                        author: *caller_id,
                        statuses: others,
                    })
                } else {
                    Self::Query(StatusPredicate::AnyOf(requested.to_vec()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user() -> UserId {
        UserId::new("11111111-1111-1111-1111-111111111111").expect("fixture user id")
    }

    fn other_user() -> UserId {
        UserId::new("22222222-2222-2222-2222-222222222222").expect("fixture user id")
    }

    fn article(status: ArticleStatus, author: UserId, deleted: bool) -> Article {
        let now = Utc::now();
        Article::from_parts(ArticleParts {
            id: Uuid::new_v4(),
            title: Title::new("A title").expect("title"),
            content: Content::new("Some body").expect("content"),
            status,
            author,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted,
            deleted_at: deleted.then(|| now),
        })
    }

    #[rstest]
    #[case("", ArticleValidationError::EmptyTitle)]
    #[case("   ", ArticleValidationError::EmptyTitle)]
    fn title_rejects_blank(#[case] raw: &str, #[case] expected: ArticleValidationError) {
        assert_eq!(Title::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn title_rejects_overlong() {
        let long = "t".repeat(TITLE_MAX + 1);
        assert_eq!(
            Title::new(long).expect_err("overlong"),
            ArticleValidationError::TitleTooLong { max: TITLE_MAX }
        );
    }

    #[test]
    fn content_short_preview_is_verbatim() {
        let content = Content::new("short body").expect("content");
        assert_eq!(content.preview(), "short body");
    }

    #[test]
    fn content_at_preview_length_is_truncated() {
        let exactly_fifty = "a".repeat(PREVIEW_CHARS);
        let content = Content::new(exactly_fifty.clone()).expect("content");
        assert_eq!(content.preview(), format!("{exactly_fifty}..."));
    }

    #[test]
    fn content_preview_counts_characters_not_bytes() {
        let body: String = "é".repeat(60);
        let content = Content::new(body).expect("content");
        let expected: String = "é".repeat(PREVIEW_CHARS);
        assert_eq!(content.preview(), format!("{expected}..."));
    }

    #[rstest]
    #[case("draft", ArticleStatus::Draft)]
    #[case("published", ArticleStatus::Published)]
    #[case("deleted", ArticleStatus::Deleted)]
    fn status_parses(#[case] raw: &str, #[case] expected: ArticleStatus) {
        assert_eq!(raw.parse::<ArticleStatus>().expect("status"), expected);
    }

    #[test]
    fn status_rejects_unknown() {
        assert_eq!(
            "archived".parse::<ArticleStatus>().expect_err("must fail"),
            ArticleValidationError::InvalidStatus
        );
    }

    #[test]
    fn anonymous_without_filter_sees_published_only() {
        let selection = ListSelection::resolve(None, None);
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published]))
        );
    }

    #[test]
    fn anonymous_draft_only_filter_is_empty() {
        let selection = ListSelection::resolve(None, Some(&[ArticleStatus::Draft]));
        assert_eq!(selection, ListSelection::Empty);
    }

    #[test]
    fn anonymous_filter_intersects_with_published() {
        let selection =
            ListSelection::resolve(None, Some(&[ArticleStatus::Draft, ArticleStatus::Published]));
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published]))
        );
    }

    #[test]
    fn authenticated_without_filter_excludes_own_drafts() {
        let caller = user();
        let selection = ListSelection::resolve(Some(&caller), None);
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published]))
        );
    }

    #[test]
    fn authenticated_draft_filter_scopes_drafts_to_caller() {
        let caller = user();
        let selection = ListSelection::resolve(Some(&caller), Some(&[ArticleStatus::Draft]));
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::OwnDraftsOr {
                author: caller,
                statuses: vec![],
            })
        );
    }

    #[test]
    fn authenticated_mixed_filter_unions_own_drafts_with_requested() {
        let caller = user();
        let selection = ListSelection::resolve(
            Some(&caller),
            Some(&[ArticleStatus::Draft, ArticleStatus::Published]),
        );
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::OwnDraftsOr {
                author: caller,
                statuses: vec![ArticleStatus::Published],
            })
        );
    }

    #[test]
    fn authenticated_published_filter_passes_through() {
        let caller = user();
        let selection = ListSelection::resolve(Some(&caller), Some(&[ArticleStatus::Published]));
        assert_eq!(
            selection,
            ListSelection::Query(StatusPredicate::AnyOf(vec![ArticleStatus::Published]))
        );
    }

    #[rstest]
    #[case(ArticleStatus::Published, None, true)]
    #[case(ArticleStatus::Draft, None, false)]
    fn visibility_for_anonymous(
        #[case] status: ArticleStatus,
        #[case] viewer: Option<UserId>,
        #[case] expected: bool,
    ) {
        let subject = article(status, user(), false);
        assert_eq!(subject.is_visible_to(viewer.as_ref()), expected);
    }

    #[test]
    fn draft_visible_to_author_only() {
        let author = user();
        let subject = article(ArticleStatus::Draft, author, false);
        assert!(subject.is_visible_to(Some(&author)));
        assert!(!subject.is_visible_to(Some(&other_user())));
    }

    #[test]
    fn soft_deleted_article_is_invisible_even_to_author() {
        let author = user();
        let subject = article(ArticleStatus::Deleted, author, true);
        assert!(!subject.is_visible_to(Some(&author)));
    }
}
