//! Domain models for the publikasi catalog.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// IDENTITY
// =============================================================================

/// Account role as issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// The authenticated caller of an operation.
///
/// The catalog never authenticates; it only authorizes against this tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::User,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin capability used for publication mutation.
    pub fn can_modify(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

/// Account record exposed by the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Level of a root category.
pub const ROOT_LEVEL: i32 = 0;

/// Level of a sub-category. Nothing may live below it.
pub const SUB_LEVEL: i32 = 1;

/// A category in the two-level hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Parent category ID (None = root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    /// 0 for roots, 1 for sub-categories
    pub level: i32,
    pub display_order: i32,
    pub created_at_utc: DateTime<Utc>,
    /// Number of publications filed under this category (computed)
    #[serde(default)]
    pub publication_count: i64,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.level == ROOT_LEVEL
    }
}

/// A root category together with its ordered sub-categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub sub_categories: Vec<Category>,
}

/// Create/update payload for a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub display_order: Option<i32>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Trimmed name, rejecting blank or over-long values.
    pub fn validated_name(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Category name is required".into()));
        }
        if name.chars().count() > defaults::CATEGORY_NAME_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "Category name must not exceed {} characters",
                defaults::CATEGORY_NAME_MAX_LEN
            )));
        }
        Ok(name.to_string())
    }
}

/// Row-level values for inserting a category, after validation.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub level: i32,
    pub display_order: i32,
}

// =============================================================================
// PUBLICATIONS
// =============================================================================

/// A catalogued statistical publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub catalog_number: Option<String>,
    pub publication_number: Option<String>,
    pub issn_isbn: Option<String>,
    pub release_frequency: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub year: i32,
    pub author: Option<String>,
    /// Blob reference of the rendered cover, absent until rendering succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_ref: Option<String>,
    /// Blob reference of the publication file
    pub file_ref: String,
    /// Sanitized original upload name
    pub file_name: String,
    pub file_size: i64,
    pub views: i64,
    pub downloads: i64,
    pub category_id: Uuid,
    pub uploaded_by: Uuid,
    pub is_flagship: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Descriptive metadata supplied on upload and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationMetadata {
    pub title: String,
    pub description: Option<String>,
    pub catalog_number: Option<String>,
    pub publication_number: Option<String>,
    pub issn_isbn: Option<String>,
    pub release_frequency: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub year: i32,
    pub author: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub is_flagship: bool,
}

impl PublicationMetadata {
    pub fn new(title: impl Into<String>, year: i32, category_id: Uuid) -> Self {
        Self {
            title: title.into(),
            year,
            category_id,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn flagship(mut self) -> Self {
        self.is_flagship = true;
        self
    }

    /// Field-level checks: title/author lengths and release-date year.
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Title is required".into()));
        }
        if title.chars().count() > defaults::TITLE_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "Title must not exceed {} characters",
                defaults::TITLE_MAX_LEN
            )));
        }
        if let Some(author) = &self.author {
            if author.chars().count() > defaults::AUTHOR_MAX_LEN {
                return Err(Error::InvalidInput(format!(
                    "Author name must not exceed {} characters",
                    defaults::AUTHOR_MAX_LEN
                )));
            }
        }
        if let Some(date) = self.release_date {
            if date.year() != self.year {
                return Err(Error::YearMismatch {
                    release_year: date.year(),
                    year: self.year,
                });
            }
        }
        Ok(())
    }
}

/// Row-level values for inserting a publication.
#[derive(Debug, Clone)]
pub struct NewPublication {
    pub metadata: PublicationMetadata,
    pub file_ref: String,
    pub file_name: String,
    pub file_size: i64,
    pub cover_image_ref: Option<String>,
    pub uploaded_by: Uuid,
}

/// An uploaded file as received from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Some(crate::file_safety::PDF_MIME.to_string()),
            bytes,
        }
    }
}

/// Bytes handed back for a download or cover fetch.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Sort applied after filtering a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationSort {
    /// Newest first
    Latest,
    /// Oldest first
    Oldest,
}

impl PublicationSort {
    /// Parse a client-supplied sort; unrecognized values yield `None`
    /// (underlying order is preserved).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Some(Self::Latest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Conjunctive search filters over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    /// Case-insensitive substring of title or description
    pub keyword: Option<String>,
    pub category_id: Option<Uuid>,
    pub year: Option<i32>,
}

impl PublicationFilter {
    /// Keyword with blank values treated as absent.
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.effective_keyword().is_none() && self.category_id.is_none() && self.year.is_none()
    }

    /// In-process evaluation of the filter, mirroring the SQL predicate.
    pub fn matches(&self, publication: &Publication) -> bool {
        if let Some(keyword) = self.effective_keyword() {
            let needle = keyword.to_lowercase();
            let in_title = publication.title.to_lowercase().contains(&needle);
            let in_description = publication
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if publication.category_id != category_id {
                return false;
            }
        }
        if let Some(year) = self.year {
            if publication.year != year {
                return false;
            }
        }
        true
    }
}

/// A search request as issued by a client.
#[derive(Debug, Clone, Default)]
pub struct PublicationQuery {
    pub filter: PublicationFilter,
    /// Raw sort string ("latest" / "oldest"); anything else is ignored
    pub sort: Option<String>,
}

impl PublicationQuery {
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.filter.keyword = Some(keyword.into());
        self
    }

    pub fn category(mut self, category_id: Uuid) -> Self {
        self.filter.category_id = Some(category_id);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.filter.year = Some(year);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn parsed_sort(&self) -> Option<PublicationSort> {
        self.sort.as_deref().and_then(PublicationSort::parse)
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Kind of event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    NewPublication,
    ProfileUpdated,
    PasswordChanged,
    AdminNewUser,
    AdminMilestone,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::NewPublication => "NEW_PUBLICATION",
            NotificationType::ProfileUpdated => "PROFILE_UPDATED",
            NotificationType::PasswordChanged => "PASSWORD_CHANGED",
            NotificationType::AdminNewUser => "ADMIN_NEW_USER",
            NotificationType::AdminMilestone => "ADMIN_MILESTONE",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW_PUBLICATION" => Ok(Self::NewPublication),
            "PROFILE_UPDATED" => Ok(Self::ProfileUpdated),
            "PASSWORD_CHANGED" => Ok(Self::PasswordChanged),
            "ADMIN_NEW_USER" => Ok(Self::AdminNewUser),
            "ADMIN_MILESTONE" => Ok(Self::AdminMilestone),
            _ => Err(format!("Invalid notification type: {}", s)),
        }
    }
}

/// Security-relevant account changes reported to the affected user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEventKind {
    ProfileUpdated,
    PasswordChanged,
}

impl From<SecurityEventKind> for NotificationType {
    fn from(kind: SecurityEventKind) -> Self {
        match kind {
            SecurityEventKind::ProfileUpdated => NotificationType::ProfileUpdated,
            SecurityEventKind::PasswordChanged => NotificationType::PasswordChanged,
        }
    }
}

/// Related-entity tag for publication notifications.
pub const ENTITY_PUBLICATION: &str = "Publication";

/// Related-entity tag for account notifications.
pub const ENTITY_USER: &str = "User";

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at_utc: DateTime<Utc>,
}

/// A notification about to be inserted as part of a fan-out batch.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<Uuid>,
}

/// One page of a user's notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    /// Zero-based page index
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// =============================================================================
// SEARCH HISTORY
// =============================================================================

/// A remembered search keyword, unique per (user, keyword).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub keyword: String,
    pub searched_at_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_publication(title: &str, description: Option<&str>, year: i32) -> Publication {
        let now = Utc::now();
        Publication {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(String::from),
            catalog_number: None,
            publication_number: None,
            issn_isbn: None,
            release_frequency: None,
            release_date: None,
            language: None,
            year,
            author: None,
            cover_image_ref: None,
            file_ref: "blobs/00/00/x.pdf".to_string(),
            file_name: "x.pdf".to_string(),
            file_size: 10,
            views: 0,
            downloads: 0,
            category_id: Uuid::nil(),
            uploaded_by: Uuid::nil(),
            is_flagship: false,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    #[test]
    fn test_actor_capabilities() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(Actor::user(owner).can_modify(owner));
        assert!(!Actor::user(other).can_modify(owner));
        assert!(Actor::admin(other).can_modify(owner));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "USER");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_category_input_name_validation() {
        assert_eq!(
            CategoryInput::new("  Economy ").validated_name().unwrap(),
            "Economy"
        );
        assert!(matches!(
            CategoryInput::new("   ").validated_name(),
            Err(Error::InvalidInput(_))
        ));
        let long = "x".repeat(defaults::CATEGORY_NAME_MAX_LEN + 1);
        assert!(CategoryInput::new(long).validated_name().is_err());
    }

    #[test]
    fn test_metadata_year_mismatch() {
        let meta = PublicationMetadata::new("Census", 2020, Uuid::nil())
            .with_release_date(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        match meta.validate() {
            Err(Error::YearMismatch { release_year, year }) => {
                assert_eq!(release_year, 2021);
                assert_eq!(year, 2020);
            }
            other => panic!("expected YearMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_matching_release_year_is_valid() {
        let meta = PublicationMetadata::new("Census", 2020, Uuid::nil())
            .with_release_date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_metadata_rejects_blank_title() {
        let meta = PublicationMetadata::new("  ", 2020, Uuid::nil());
        assert!(matches!(meta.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(PublicationSort::parse("latest"), Some(PublicationSort::Latest));
        assert_eq!(PublicationSort::parse("OLDEST"), Some(PublicationSort::Oldest));
        assert_eq!(PublicationSort::parse("popular"), None);
    }

    #[test]
    fn test_filter_blank_keyword_is_absent() {
        let filter = PublicationFilter {
            keyword: Some("   ".into()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&sample_publication("Anything", None, 2020)));
    }

    #[test]
    fn test_filter_keyword_matches_title_or_description() {
        let filter = PublicationFilter {
            keyword: Some("CENSUS".into()),
            ..Default::default()
        };
        assert!(filter.matches(&sample_publication("Population Census 2020", None, 2020)));
        assert!(filter.matches(&sample_publication(
            "Statistical Yearbook",
            Some("includes census tables"),
            2020
        )));
        assert!(!filter.matches(&sample_publication("Trade Balance", Some("exports"), 2020)));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let category = Uuid::new_v4();
        let filter = PublicationFilter {
            keyword: Some("census".into()),
            category_id: Some(category),
            year: Some(2020),
        };
        let mut hit = sample_publication("Census", None, 2020);
        hit.category_id = category;
        assert!(filter.matches(&hit));

        let mut wrong_year = hit.clone();
        wrong_year.year = 2019;
        assert!(!filter.matches(&wrong_year));

        let mut wrong_category = hit.clone();
        wrong_category.category_id = Uuid::new_v4();
        assert!(!filter.matches(&wrong_category));
    }

    #[test]
    fn test_notification_type_serde() {
        let json = serde_json::to_string(&NotificationType::AdminMilestone).unwrap();
        assert_eq!(json, "\"ADMIN_MILESTONE\"");
        assert_eq!(
            "new_publication".parse::<NotificationType>().unwrap(),
            NotificationType::NewPublication
        );
    }

    #[test]
    fn test_security_event_maps_to_type() {
        assert_eq!(
            NotificationType::from(SecurityEventKind::PasswordChanged),
            NotificationType::PasswordChanged
        );
    }
}
