//! Article domain service.
//!
//! Implements the [`ArticlesQuery`] and [`ArticleCommand`] driving ports:
//! visibility resolution, offset pagination, author display joining, the
//! title-per-author conflict rules, and soft deletion.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use uuid::Uuid;

use crate::domain::article::{Article, ListSelection};
use crate::domain::error::Error;
use crate::domain::ports::{
    ArticleChanges, ArticleChangesRecord, ArticleCommand, ArticleDraft, ArticleListQuery,
    ArticleListRequest, ArticleRepository, ArticleRepositoryError, ArticleSummary, ArticleView,
    ArticlesQuery, AuthorDisplay, NewArticleRecord, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserId};

const TITLE_TAKEN: &str = "An article with this title already exists.";

fn map_article_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => Error::service_unavailable(message),
        ArticleRepositoryError::Query { message } => Error::internal(message),
        ArticleRepositoryError::DuplicateTitle => Error::conflict(TITLE_TAKEN),
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { .. } | UserRepositoryError::DuplicateUsername => {
            Error::internal(error.to_string())
        }
    }
}

/// Article service implementing the article driving ports.
#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    users: Arc<dyn UserRepository>,
}

impl ArticleService {
    /// Create the service over the article and user repositories.
    pub fn new(articles: Arc<dyn ArticleRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { articles, users }
    }

    /// Resolve display fields for every author appearing in `rows`.
    async fn author_displays(
        &self,
        rows: &[Article],
    ) -> Result<HashMap<UserId, AuthorDisplay>, Error> {
        let mut author_ids: Vec<UserId> = Vec::new();
        for article in rows {
            if !author_ids.contains(article.author()) {
                author_ids.push(*article.author());
            }
        }
        let authors = self
            .users
            .find_by_ids(&author_ids)
            .await
            .map_err(map_user_repository_error)?;
        Ok(authors
            .into_iter()
            .map(|user| {
                (
                    *user.id(),
                    AuthorDisplay {
                        name: user.name().as_ref().to_owned(),
                        username: user.username().as_ref().to_owned(),
                    },
                )
            })
            .collect())
    }

    async fn author_name(&self, author: &UserId) -> Result<Option<String>, Error> {
        let user = self
            .users
            .find_by_id(author)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user.map(|user| user.name().as_ref().to_owned()))
    }
}

fn to_summary(article: &Article, author: Option<&AuthorDisplay>) -> ArticleSummary {
    ArticleSummary {
        id: article.id(),
        title: article.title().as_ref().to_owned(),
        preview: article.content().preview(),
        status: article.status(),
        author: author.cloned(),
        created_at: article.created_at(),
        updated_at: article.updated_at(),
    }
}

#[async_trait]
impl ArticlesQuery for ArticleService {
    async fn list_articles(
        &self,
        caller: Option<&UserId>,
        request: ArticleListRequest,
    ) -> Result<Page<ArticleSummary>, Error> {
        let ArticleListRequest {
            statuses,
            author,
            page,
        } = request;

        let predicate = match ListSelection::resolve(caller, statuses.as_deref()) {
            ListSelection::Empty => return Ok(Page::empty(page)),
            ListSelection::Query(predicate) => predicate,
        };

        let total = self
            .articles
            .count(&predicate, author.as_ref())
            .await
            .map_err(map_article_repository_error)?;

        let rows = self
            .articles
            .list(ArticleListQuery {
                predicate,
                author,
                offset: page.offset(),
                limit: i64::from(page.limit()),
            })
            .await
            .map_err(map_article_repository_error)?;

        let displays = self.author_displays(&rows).await?;
        let summaries = rows
            .iter()
            .map(|article| to_summary(article, displays.get(article.author())))
            .collect();

        Ok(Page::new(summaries, page, total))
    }

    async fn get_article(
        &self,
        caller: Option<&UserId>,
        id: Uuid,
    ) -> Result<ArticleView, Error> {
        let article = self
            .articles
            .find_visible_by_id(id)
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found("Article not found"))?;

        if !article.is_visible_to(caller) {
            return Err(Error::forbidden("Access denied"));
        }

        let author_name = self.author_name(article.author()).await?;
        Ok(ArticleView {
            article,
            author_name,
        })
    }
}

#[async_trait]
impl ArticleCommand for ArticleService {
    async fn create_article(
        &self,
        caller: &User,
        draft: ArticleDraft,
    ) -> Result<ArticleView, Error> {
        let taken = self
            .articles
            .title_exists_for_author(caller.id(), &draft.title, None)
            .await
            .map_err(map_article_repository_error)?;
        if taken {
            return Err(Error::conflict(TITLE_TAKEN));
        }

        let article = self
            .articles
            .insert(NewArticleRecord {
                id: Uuid::new_v4(),
                title: draft.title,
                content: draft.content,
                status: draft.status,
                author: *caller.id(),
            })
            .await
            .map_err(map_article_repository_error)?;

        Ok(ArticleView {
            article,
            author_name: Some(caller.name().as_ref().to_owned()),
        })
    }

    async fn update_article(
        &self,
        caller: &User,
        id: Uuid,
        changes: ArticleChanges,
    ) -> Result<ArticleView, Error> {
        let existing = self
            .articles
            .find_any_by_id(id)
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found("Article not found"))?;

        if !existing.is_owned_by(caller.id()) {
            return Err(Error::forbidden("Access denied"));
        }

        let taken = self
            .articles
            .title_exists_for_author(caller.id(), &changes.title, Some(id))
            .await
            .map_err(map_article_repository_error)?;
        if taken {
            return Err(Error::conflict(TITLE_TAKEN));
        }

        let article = self
            .articles
            .update(
                id,
                ArticleChangesRecord {
                    title: changes.title,
                    content: changes.content,
                    status: changes.status,
                },
            )
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found("Article not found"))?;

        Ok(ArticleView {
            article,
            author_name: Some(caller.name().as_ref().to_owned()),
        })
    }

    async fn delete_article(&self, caller: &UserId, id: Uuid) -> Result<(), Error> {
        let existing = self
            .articles
            .find_any_by_id(id)
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found("Article not found"))?;

        if !existing.is_owned_by(caller) {
            return Err(Error::forbidden("Access denied"));
        }

        let deleted = self
            .articles
            .soft_delete(id)
            .await
            .map_err(map_article_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("Article not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{ArticleStatus, Content, Title, PREVIEW_CHARS};
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::NewUserRecord;
    use crate::domain::test_support::{InMemoryArticles, InMemoryUsers};
    use crate::domain::user::{PersonName, Username};
    use pagination::PageRequest;
    use rstest::rstest;

    struct Fixture {
        service: ArticleService,
        articles: Arc<InMemoryArticles>,
        users: Arc<InMemoryUsers>,
    }

    fn fixture() -> Fixture {
        let articles = Arc::new(InMemoryArticles::new());
        let users = Arc::new(InMemoryUsers::new());
        Fixture {
            service: ArticleService::new(articles.clone(), users.clone()),
            articles,
            users,
        }
    }

    async fn seeded_user(fixture: &Fixture, name: &str, username: &str) -> User {
        fixture
            .users
            .insert(NewUserRecord {
                id: Uuid::new_v4(),
                name: PersonName::new(name).expect("name"),
                username: Username::new(username).expect("username"),
                password_hash: "hashed:pw".to_owned(),
            })
            .await
            .expect("insert user")
    }

    fn draft(title: &str, content: &str, status: ArticleStatus) -> ArticleDraft {
        ArticleDraft {
            title: Title::new(title).expect("title"),
            content: Content::new(content).expect("content"),
            status,
        }
    }

    fn list_request(
        statuses: Option<Vec<ArticleStatus>>,
        author: Option<UserId>,
        page: u32,
        limit: u32,
    ) -> ArticleListRequest {
        ArticleListRequest {
            statuses,
            author,
            page: PageRequest::clamped(page, limit),
        }
    }

    async fn seed_article(
        fixture: &Fixture,
        author: &User,
        title: &str,
        status: ArticleStatus,
    ) -> Article {
        fixture
            .service
            .create_article(author, draft(title, "Body text", status))
            .await
            .expect("create article")
            .article
    }

    #[tokio::test]
    async fn anonymous_listing_shows_only_published() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        seed_article(&fixture, &author, "Published one", ArticleStatus::Published).await;
        seed_article(&fixture, &author, "Hidden draft", ArticleStatus::Draft).await;

        let page = fixture
            .service
            .list_articles(None, list_request(None, None, 1, 10))
            .await
            .expect("list succeeds");

        assert_eq!(page.pagination.total_items, 1);
        assert!(
            page.data
                .iter()
                .all(|summary| summary.status == ArticleStatus::Published)
        );
    }

    #[tokio::test]
    async fn anonymous_draft_filter_returns_empty_page() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        seed_article(&fixture, &author, "Hidden draft", ArticleStatus::Draft).await;

        let page = fixture
            .service
            .list_articles(
                None,
                list_request(Some(vec![ArticleStatus::Draft]), None, 1, 10),
            )
            .await
            .expect("list succeeds");

        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.pagination.total_items, 0);
    }

    #[tokio::test]
    async fn draft_filter_scopes_drafts_to_caller() {
        let fixture = fixture();
        let caller = seeded_user(&fixture, "Ada", "ada").await;
        let other = seeded_user(&fixture, "Grace", "grace").await;
        seed_article(&fixture, &caller, "My draft", ArticleStatus::Draft).await;
        seed_article(&fixture, &other, "Foreign draft", ArticleStatus::Draft).await;

        let page = fixture
            .service
            .list_articles(
                Some(caller.id()),
                list_request(Some(vec![ArticleStatus::Draft]), None, 1, 10),
            )
            .await
            .expect("list succeeds");

        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.data[0].title, "My draft");
    }

    #[tokio::test]
    async fn mixed_filter_unions_own_drafts_with_anyones_published() {
        let fixture = fixture();
        let caller = seeded_user(&fixture, "Ada", "ada").await;
        let other = seeded_user(&fixture, "Grace", "grace").await;
        seed_article(&fixture, &caller, "My draft", ArticleStatus::Draft).await;
        seed_article(&fixture, &other, "Foreign draft", ArticleStatus::Draft).await;
        seed_article(&fixture, &other, "Foreign published", ArticleStatus::Published).await;

        let page = fixture
            .service
            .list_articles(
                Some(caller.id()),
                list_request(
                    Some(vec![ArticleStatus::Draft, ArticleStatus::Published]),
                    None,
                    1,
                    10,
                ),
            )
            .await
            .expect("list succeeds");

        let titles: Vec<&str> = page.data.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(page.pagination.total_items, 2);
        assert!(titles.contains(&"My draft"));
        assert!(titles.contains(&"Foreign published"));
        assert!(!titles.contains(&"Foreign draft"));
    }

    #[tokio::test]
    async fn author_filter_restricts_results() {
        let fixture = fixture();
        let first = seeded_user(&fixture, "Ada", "ada").await;
        let second = seeded_user(&fixture, "Grace", "grace").await;
        seed_article(&fixture, &first, "By Ada", ArticleStatus::Published).await;
        seed_article(&fixture, &second, "By Grace", ArticleStatus::Published).await;

        let page = fixture
            .service
            .list_articles(None, list_request(None, Some(*second.id()), 1, 10))
            .await
            .expect("list succeeds");

        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.data[0].title, "By Grace");
    }

    #[tokio::test]
    async fn listing_paginates_newest_first() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        for index in 0..5 {
            seed_article(
                &fixture,
                &author,
                &format!("Article {index}"),
                ArticleStatus::Published,
            )
            .await;
        }

        let page = fixture
            .service
            .list_articles(None, list_request(None, None, 2, 2))
            .await
            .expect("list succeeds");

        assert_eq!(page.pagination.total_items, 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
        let titles: Vec<&str> = page.data.iter().map(|s| s.title.as_str()).collect();
        // Newest first: page 2 of [4,3,2,1,0] is [2,1].
        assert_eq!(titles, vec!["Article 2", "Article 1"]);
    }

    #[tokio::test]
    async fn listing_truncates_long_content_and_joins_author() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada Lovelace", "ada").await;
        let long_body = "b".repeat(PREVIEW_CHARS + 20);
        fixture
            .service
            .create_article(&author, draft("Long", &long_body, ArticleStatus::Published))
            .await
            .expect("create");
        fixture
            .service
            .create_article(&author, draft("Short", "tiny", ArticleStatus::Published))
            .await
            .expect("create");

        let page = fixture
            .service
            .list_articles(None, list_request(None, None, 1, 10))
            .await
            .expect("list succeeds");

        let long = page
            .data
            .iter()
            .find(|summary| summary.title == "Long")
            .expect("long article listed");
        assert_eq!(long.preview, format!("{}...", "b".repeat(PREVIEW_CHARS)));
        let short = page
            .data
            .iter()
            .find(|summary| summary.title == "Short")
            .expect("short article listed");
        assert_eq!(short.preview, "tiny");
        let display = long.author.as_ref().expect("author joined");
        assert_eq!(display.name, "Ada Lovelace");
        assert_eq!(display.username, "ada");
    }

    #[tokio::test]
    async fn get_published_article_returns_full_content() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let long_body = "b".repeat(PREVIEW_CHARS + 20);
        let created = fixture
            .service
            .create_article(&author, draft("Long", &long_body, ArticleStatus::Published))
            .await
            .expect("create");

        let view = fixture
            .service
            .get_article(None, created.article.id())
            .await
            .expect("get succeeds");
        assert_eq!(view.article.content().as_ref(), long_body);
        assert_eq!(view.author_name.as_deref(), Some("Ada"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(()))]
    #[tokio::test]
    async fn draft_article_is_forbidden_to_non_authors(#[case] authenticated: Option<()>) {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let stranger = seeded_user(&fixture, "Grace", "grace").await;
        let created = seed_article(&fixture, &author, "Draft", ArticleStatus::Draft).await;

        let caller = authenticated.map(|()| *stranger.id());
        let err = fixture
            .service
            .get_article(caller.as_ref(), created.id())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn draft_article_is_visible_to_its_author() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let created = seed_article(&fixture, &author, "Draft", ArticleStatus::Draft).await;

        let view = fixture
            .service
            .get_article(Some(author.id()), created.id())
            .await
            .expect("get succeeds");
        assert_eq!(view.article.id(), created.id());
    }

    #[tokio::test]
    async fn duplicate_title_for_same_author_conflicts() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        seed_article(&fixture, &author, "Same title", ArticleStatus::Published).await;

        let err = fixture
            .service
            .create_article(&author, draft("Same title", "Other body", ArticleStatus::Draft))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn same_title_under_different_authors_both_succeed() {
        let fixture = fixture();
        let first = seeded_user(&fixture, "Ada", "ada").await;
        let second = seeded_user(&fixture, "Grace", "grace").await;

        seed_article(&fixture, &first, "Same title", ArticleStatus::Published).await;
        let result = fixture
            .service
            .create_article(&second, draft("Same title", "Body", ArticleStatus::Published))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let stranger = seeded_user(&fixture, "Grace", "grace").await;
        let created = seed_article(&fixture, &author, "Mine", ArticleStatus::Published).await;

        let err = fixture
            .service
            .update_article(
                &stranger,
                created.id(),
                ArticleChanges {
                    title: Title::new("Stolen").expect("title"),
                    content: Content::new("Body").expect("content"),
                    status: None,
                },
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_missing_article_is_not_found() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;

        let err = fixture
            .service
            .update_article(
                &author,
                Uuid::new_v4(),
                ArticleChanges {
                    title: Title::new("Anything").expect("title"),
                    content: Content::new("Body").expect("content"),
                    status: None,
                },
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_to_another_articles_title_conflicts() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        seed_article(&fixture, &author, "First", ArticleStatus::Published).await;
        let second = seed_article(&fixture, &author, "Second", ArticleStatus::Published).await;

        let err = fixture
            .service
            .update_article(
                &author,
                second.id(),
                ArticleChanges {
                    title: Title::new("First").expect("title"),
                    content: Content::new("Body").expect("content"),
                    status: None,
                },
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_keeping_own_title_succeeds() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let created = seed_article(&fixture, &author, "Keep me", ArticleStatus::Draft).await;

        let view = fixture
            .service
            .update_article(
                &author,
                created.id(),
                ArticleChanges {
                    title: Title::new("Keep me").expect("title"),
                    content: Content::new("Fresh body").expect("content"),
                    status: Some(ArticleStatus::Published),
                },
            )
            .await
            .expect("update succeeds");
        assert_eq!(view.article.status(), ArticleStatus::Published);
        assert_eq!(view.article.content().as_ref(), "Fresh body");
    }

    #[tokio::test]
    async fn delete_soft_deletes_and_hides_from_listing() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let created = seed_article(&fixture, &author, "Doomed", ArticleStatus::Published).await;

        fixture
            .service
            .delete_article(author.id(), created.id())
            .await
            .expect("delete succeeds");

        let stored = fixture
            .articles
            .find_any_by_id(created.id())
            .await
            .expect("lookup succeeds")
            .expect("row kept");
        assert!(stored.is_deleted());
        assert_eq!(stored.status(), ArticleStatus::Deleted);
        assert!(stored.deleted_at().is_some());

        let page = fixture
            .service
            .list_articles(None, list_request(None, None, 1, 10))
            .await
            .expect("list succeeds");
        assert_eq!(page.pagination.total_items, 0);

        let err = fixture
            .service
            .get_article(Some(author.id()), created.id())
            .await
            .expect_err("read must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let stranger = seeded_user(&fixture, "Grace", "grace").await;
        let created = seed_article(&fixture, &author, "Mine", ArticleStatus::Published).await;

        let err = fixture
            .service
            .delete_article(stranger.id(), created.id())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn reusing_a_soft_deleted_title_succeeds() {
        let fixture = fixture();
        let author = seeded_user(&fixture, "Ada", "ada").await;
        let created = seed_article(&fixture, &author, "Recycled", ArticleStatus::Published).await;
        fixture
            .service
            .delete_article(author.id(), created.id())
            .await
            .expect("delete succeeds");

        let result = fixture
            .service
            .create_article(&author, draft("Recycled", "Body", ArticleStatus::Published))
            .await;
        assert!(result.is_ok());
    }
}
