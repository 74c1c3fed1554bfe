//! In-memory port implementations shared by service and handler tests.
//!
//! These doubles reproduce the store contracts faithfully enough for
//! behavioural tests: unique indexes raise the duplicate variants, listing
//! applies the status predicate, and the revocation set can be flipped into
//! a failing state to exercise degradation paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::analytics::{ArticleRef, RecordedView};
use crate::domain::article::{Article, ArticleParts, ArticleStatus, StatusPredicate, Title};
use crate::domain::page_view::PageView;
use crate::domain::ports::{
    ArticleChangesRecord, ArticleListQuery, ArticleRepository, ArticleRepositoryError,
    NewArticleRecord, NewPageViewRecord, NewUserRecord, PageViewRepository,
    PageViewRepositoryError, PasswordHashError, PasswordHasher, RevocationSet,
    RevocationSetError, TokenIssuer, TokenIssuerError, UserProfileChanges, UserRepository,
    UserRepositoryError, ViewFilter,
};
use crate::domain::user::{User, UserId};

/// Monotonic timestamps so creation-order sorting is deterministic in tests.
fn ticked_now(seq: &AtomicI64) -> DateTime<Utc> {
    let tick = seq.fetch_add(1, Ordering::Relaxed);
    Utc::now() + Duration::microseconds(tick)
}

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    seq: AtomicI64,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, record: NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        if rows
            .iter()
            .any(|user| user.username() == &record.username)
        {
            return Err(UserRepositoryError::DuplicateUsername);
        }
        let now = ticked_now(&self.seq);
        let user = User::new(
            UserId::from_uuid(record.id),
            record.name,
            record.username,
            record.password_hash,
            now,
            now,
        );
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let rows = self.rows.lock().expect("users lock");
        Ok(rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let rows = self.rows.lock().expect("users lock");
        Ok(rows
            .iter()
            .filter(|user| ids.contains(user.id()))
            .cloned()
            .collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let rows = self.rows.lock().expect("users lock");
        Ok(rows
            .iter()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.rows.lock().expect("users lock").clone())
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserProfileChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        if let Some(username) = &changes.username {
            if rows
                .iter()
                .any(|user| user.id() != id && user.username() == username)
            {
                return Err(UserRepositoryError::DuplicateUsername);
            }
        }
        let now = ticked_now(&self.seq);
        let Some(position) = rows.iter().position(|user| user.id() == id) else {
            return Ok(None);
        };
        let current = rows.remove(position);
        let updated = User::new(
            *current.id(),
            changes.name.unwrap_or_else(|| current.name().clone()),
            changes.username.unwrap_or_else(|| current.username().clone()),
            current.password_hash(),
            current.created_at(),
            now,
        );
        rows.insert(position, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        let before = rows.len();
        rows.retain(|user| user.id() != id);
        Ok(rows.len() < before)
    }
}

/// In-memory [`ArticleRepository`].
#[derive(Default)]
pub struct InMemoryArticles {
    rows: Mutex<Vec<Article>>,
    seq: AtomicI64,
}

fn matches(article: &Article, predicate: &StatusPredicate, author: Option<&UserId>) -> bool {
    if article.is_deleted() {
        return false;
    }
    if let Some(author_id) = author {
        if !article.is_owned_by(author_id) {
            return false;
        }
    }
    match predicate {
        StatusPredicate::AnyOf(statuses) => statuses.contains(&article.status()),
        StatusPredicate::OwnDraftsOr { author: owner, statuses } => {
            (article.status() == ArticleStatus::Draft && article.is_owned_by(owner))
                || statuses.contains(&article.status())
        }
    }
}

impl InMemoryArticles {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticles {
    async fn insert(&self, record: NewArticleRecord) -> Result<Article, ArticleRepositoryError> {
        let mut rows = self.rows.lock().expect("articles lock");
        if rows.iter().any(|article| {
            !article.is_deleted()
                && article.is_owned_by(&record.author)
                && article.title().as_ref() == record.title.as_ref()
        }) {
            return Err(ArticleRepositoryError::DuplicateTitle);
        }
        let now = ticked_now(&self.seq);
        let article = Article::from_parts(ArticleParts {
            id: record.id,
            title: record.title,
            content: record.content,
            status: record.status,
            author: record.author,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
        });
        rows.push(article.clone());
        Ok(article)
    }

    async fn find_any_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        let rows = self.rows.lock().expect("articles lock");
        Ok(rows.iter().find(|article| article.id() == id).cloned())
    }

    async fn find_visible_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let rows = self.rows.lock().expect("articles lock");
        Ok(rows
            .iter()
            .find(|article| article.id() == id && !article.is_deleted())
            .cloned())
    }

    async fn title_exists_for_author(
        &self,
        author: &UserId,
        title: &Title,
        exclude: Option<Uuid>,
    ) -> Result<bool, ArticleRepositoryError> {
        let rows = self.rows.lock().expect("articles lock");
        Ok(rows.iter().any(|article| {
            !article.is_deleted()
                && article.is_owned_by(author)
                && article.title().as_ref() == title.as_ref()
                && exclude != Some(article.id())
        }))
    }

    async fn count(
        &self,
        predicate: &StatusPredicate,
        author: Option<&UserId>,
    ) -> Result<u64, ArticleRepositoryError> {
        let rows = self.rows.lock().expect("articles lock");
        Ok(rows
            .iter()
            .filter(|article| matches(article, predicate, author))
            .count() as u64)
    }

    async fn list(&self, query: ArticleListQuery) -> Result<Vec<Article>, ArticleRepositoryError> {
        let rows = self.rows.lock().expect("articles lock");
        let mut selected: Vec<Article> = rows
            .iter()
            .filter(|article| matches(article, &query.predicate, query.author.as_ref()))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(selected
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChangesRecord,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let now = ticked_now(&self.seq);
        let mut rows = self.rows.lock().expect("articles lock");
        let Some(position) = rows.iter().position(|article| article.id() == id) else {
            return Ok(None);
        };
        let current = rows.remove(position);
        let updated = Article::from_parts(ArticleParts {
            id: current.id(),
            title: changes.title,
            content: changes.content,
            status: changes.status.unwrap_or(current.status()),
            author: *current.author(),
            tags: current.tags().to_vec(),
            created_at: current.created_at(),
            updated_at: now,
            deleted: current.is_deleted(),
            deleted_at: current.deleted_at(),
        });
        rows.insert(position, updated.clone());
        Ok(Some(updated))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError> {
        let now = ticked_now(&self.seq);
        let mut rows = self.rows.lock().expect("articles lock");
        let Some(position) = rows.iter().position(|article| article.id() == id) else {
            return Ok(false);
        };
        let current = rows.remove(position);
        let deleted = Article::from_parts(ArticleParts {
            id: current.id(),
            title: current.title().clone(),
            content: current.content().clone(),
            status: ArticleStatus::Deleted,
            author: *current.author(),
            tags: current.tags().to_vec(),
            created_at: current.created_at(),
            updated_at: now,
            deleted: true,
            deleted_at: Some(now),
        });
        rows.insert(position, deleted);
        Ok(true)
    }
}

/// In-memory [`PageViewRepository`], joining against an article store.
pub struct InMemoryPageViews {
    articles: Arc<InMemoryArticles>,
    rows: Mutex<Vec<PageView>>,
}

impl InMemoryPageViews {
    pub fn new(articles: Arc<InMemoryArticles>) -> Self {
        Self {
            articles,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Insert a view with an explicit timestamp, for aggregation fixtures.
    pub fn seed_at(&self, record: NewPageViewRecord, viewed_at: DateTime<Utc>) {
        let view = PageView::new(
            record.id,
            record.article_id,
            viewed_at,
            record.ip_address,
            record.user_agent,
            record.device,
        );
        self.rows.lock().expect("views lock").push(view);
    }

    /// Number of stored view records.
    pub fn len(&self) -> usize {
        self.rows.lock().expect("views lock").len()
    }
}

#[async_trait]
impl PageViewRepository for InMemoryPageViews {
    async fn insert(
        &self,
        record: NewPageViewRecord,
    ) -> Result<PageView, PageViewRepositoryError> {
        let view = PageView::new(
            record.id,
            record.article_id,
            Utc::now(),
            record.ip_address,
            record.user_agent,
            record.device,
        );
        self.rows.lock().expect("views lock").push(view.clone());
        Ok(view)
    }

    async fn load_views(
        &self,
        filter: &ViewFilter,
    ) -> Result<Vec<RecordedView>, PageViewRepositoryError> {
        let rows = self.rows.lock().expect("views lock");
        let articles = self
            .articles
            .rows
            .lock()
            .expect("articles lock")
            .clone();
        Ok(rows
            .iter()
            .filter(|view| {
                filter.article.is_none_or(|id| view.article_id() == id)
                    && filter.start_at.is_none_or(|start| view.viewed_at() >= start)
                    && filter.end_at.is_none_or(|end| view.viewed_at() <= end)
            })
            .filter_map(|view| {
                articles
                    .iter()
                    .find(|article| article.id() == view.article_id())
                    .map(|article| RecordedView {
                        article: ArticleRef {
                            id: article.id(),
                            title: article.title().as_ref().to_owned(),
                            status: article.status(),
                        },
                        viewed_at: view.viewed_at(),
                    })
            })
            .collect())
    }
}

/// Deterministic [`PasswordHasher`] double.
#[derive(Default)]
pub struct StubHasher {
    fail: AtomicBool,
}

impl StubHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail, for fault-path tests.
    pub fn break_hasher(&self) {
        self.fail.store(true, Ordering::Relaxed);
    }
}

impl PasswordHasher for StubHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(PasswordHashError::new("hasher offline"));
        }
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(PasswordHashError::new("hasher offline"));
        }
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Transparent [`TokenIssuer`] double: tokens are `token-<user uuid>`.
#[derive(Default)]
pub struct StubTokens;

impl StubTokens {
    pub fn new() -> Self {
        Self
    }

    /// The token this double would issue for `user`.
    pub fn token_for(user: &UserId) -> String {
        format!("token-{user}")
    }
}

impl TokenIssuer for StubTokens {
    fn issue(&self, user: &UserId) -> Result<String, TokenIssuerError> {
        Ok(Self::token_for(user))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError> {
        let raw = token.strip_prefix("token-").ok_or(TokenIssuerError::Invalid)?;
        UserId::new(raw).map_err(|_| TokenIssuerError::Invalid)
    }
}

/// In-memory [`RevocationSet`] with switchable failure modes.
#[derive(Default)]
pub struct StubRevocations {
    revoked: Mutex<HashSet<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl StubRevocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::Relaxed);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::Relaxed);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.revoked.lock().expect("revocations lock").contains(token)
    }
}

#[async_trait]
impl RevocationSet for StubRevocations {
    async fn revoke(&self, token: &str) -> Result<(), RevocationSetError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(RevocationSetError::connection("cache down"));
        }
        self.revoked
            .lock()
            .expect("revocations lock")
            .insert(token.to_owned());
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationSetError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(RevocationSetError::connection("cache down"));
        }
        Ok(self.contains(token))
    }
}
