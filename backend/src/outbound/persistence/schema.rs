//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations/`
//! exactly; regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Unique lowercase handle (3-30 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Articles, soft-deleted in place.
    articles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Headline, unique per author among non-deleted rows.
        title -> Varchar,
        /// Body (max 50000 characters).
        content -> Text,
        /// draft, published, or deleted.
        status -> Varchar,
        /// Owning author.
        author_id -> Uuid,
        /// Free-form tags.
        tags -> Array<Text>,
        /// Record creation timestamp; listings sort descending on this.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Soft-delete timestamp.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Immutable page-view records.
    page_views (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The viewed article.
        article_id -> Uuid,
        /// When the view happened.
        viewed_at -> Timestamptz,
        /// Derived client address, or "unknown".
        ip_address -> Varchar,
        /// Raw user-agent header, when present.
        user_agent -> Nullable<Text>,
        /// mobile, tablet, desktop, or unknown.
        device_type -> Varchar,
        /// Parsed operating system name.
        device_os -> Nullable<Varchar>,
        /// Parsed browser name.
        device_browser -> Nullable<Varchar>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, articles, page_views);
