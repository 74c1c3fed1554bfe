//! Page-view data model.
//!
//! A page view is an immutable fact: once recorded it is never updated or
//! deleted, so the entity is a plain carrier with no mutation surface.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Coarse device category derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    #[default]
    Unknown,
}

impl DeviceType {
    /// Lowercase identifier persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            "desktop" => Ok(Self::Desktop),
            "unknown" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

/// Device descriptor captured with each view.
///
/// Parsing failures degrade to `device_type == Unknown` with empty
/// OS/browser rather than failing the record operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub os: Option<String>,
    pub browser: Option<String>,
}

/// One recorded view of a published article.
#[derive(Debug, Clone)]
pub struct PageView {
    id: Uuid,
    article_id: Uuid,
    viewed_at: DateTime<Utc>,
    ip_address: String,
    user_agent: Option<String>,
    device: DeviceInfo,
}

impl PageView {
    /// Assemble a view record.
    pub fn new(
        id: Uuid,
        article_id: Uuid,
        viewed_at: DateTime<Utc>,
        ip_address: impl Into<String>,
        user_agent: Option<String>,
        device: DeviceInfo,
    ) -> Self {
        Self {
            id,
            article_id,
            viewed_at,
            ip_address: ip_address.into(),
            user_agent,
            device,
        }
    }

    /// Stable record identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The viewed article.
    pub const fn article_id(&self) -> Uuid {
        self.article_id
    }

    /// When the view happened.
    pub const fn viewed_at(&self) -> DateTime<Utc> {
        self.viewed_at
    }

    /// Client address derived from forwarding headers, or "unknown".
    pub fn ip_address(&self) -> &str {
        self.ip_address.as_str()
    }

    /// Raw user-agent header, when present.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Parsed device descriptor.
    pub const fn device(&self) -> &DeviceInfo {
        &self.device
    }
}
