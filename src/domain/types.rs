//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, trimmed
//! non-empty labels, normalized emails and phones, sanitized rich text) so
//! that once a value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Storage key contained path separators or traversal segments.
    #[error("invalid storage key")]
    InvalidStorageKey,
    /// End of a time range precedes its start.
    #[error("end must not precede start")]
    InvalidRange,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(HubId, "Unique identifier for a hub (franchise network).");
id_newtype!(BranchId, "Unique identifier for a branch office.");
id_newtype!(CompanyId, "Unique identifier for an insurance company.");
id_newtype!(ProductId, "Unique identifier for a knowledge-base product.");
id_newtype!(DocumentId, "Unique identifier for an uploaded document.");
id_newtype!(NewsId, "Unique identifier for a news post.");
id_newtype!(EventId, "Unique identifier for a calendar event.");
id_newtype!(UserId, "Unique identifier for a portal user.");
id_newtype!(AlertId, "Unique identifier for a dashboard alert.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(BranchName, "Branch office name enforcing non-empty values.");
non_empty_string_newtype!(CityName, "City label used to group branches.");
non_empty_string_newtype!(CompanyName, "Insurance company name enforcing non-empty values.");
non_empty_string_newtype!(ProductTitle, "Knowledge-base article title.");
non_empty_string_newtype!(DocumentTitle, "Document title shown in the library.");
non_empty_string_newtype!(NewsTitle, "News headline enforcing non-empty values.");
non_empty_string_newtype!(EventTitle, "Calendar event title.");
non_empty_string_newtype!(UserName, "Display name of a portal user.");
non_empty_string_newtype!(AlertTitle, "Dashboard alert title.");
non_empty_string_newtype!(
    CategoryName,
    "Free-form category label shared by products, documents and news."
);

/// HTML fragment sanitized with `ammonia`, enforcing non-empty output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RichText(String);

impl RichText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RichText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RichText {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RichText {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-empty, trimmed absolute URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WebsiteUrl(String);

impl WebsiteUrl {
    /// Ensures a trimmed URL is non-empty and well formed before wrapping.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?;

        if !url.as_str().validate_url() {
            Err(TypeConstraintError::InvalidUrl)
        } else {
            Ok(Self(url.into_inner()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for WebsiteUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized tag list: lower-cased, trimmed, deduplicated, first-seen order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Parses a comma separated list. Blank entries are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for tag in raw.split(',') {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Storage representation (`a,b,c`).
    pub fn to_storage(&self) -> String {
        self.0.join(",")
    }
}

/// Object storage key: a single path segment produced by the storage layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let key = NonEmptyString::new(value)?.into_inner();
        if key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(TypeConstraintError::InvalidStorageKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trims an optional input and maps blank values to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(BranchId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(NewsId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(HubId::new(7).map(HubId::get), Ok(7));
    }

    #[test]
    fn email_is_normalized() {
        let email = EmailAddress::new("  Agent@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "agent@example.com");
        assert!(EmailAddress::new("not-an-email").is_err());
    }

    #[test]
    fn names_reject_blank_values() {
        assert_eq!(
            BranchName::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
        assert_eq!(BranchName::new(" Central ").unwrap().as_str(), "Central");
    }

    #[test]
    fn rich_text_is_sanitized() {
        let text = RichText::new("<p>Hello</p><script>alert(1)</script>").unwrap();
        assert_eq!(text.as_str(), "<p>Hello</p>");
        assert!(RichText::new("<script>alert(1)</script>").is_err());
    }

    #[test]
    fn phone_is_normalized_to_e164() {
        let phone = PhoneNumber::new("+1 (415) 555-2671").unwrap();
        assert_eq!(phone.as_str(), "+14155552671");
        assert_eq!(
            PhoneNumber::new("call me"),
            Err(TypeConstraintError::InvalidPhone)
        );
    }

    #[test]
    fn website_requires_valid_url() {
        assert!(WebsiteUrl::new("https://insurer.example.com").is_ok());
        assert_eq!(
            WebsiteUrl::new("insurer"),
            Err(TypeConstraintError::InvalidUrl)
        );
    }

    #[test]
    fn tags_are_trimmed_lowercased_and_deduplicated() {
        let tags = Tags::parse(" Auto, home ,AUTO,, Life ");
        assert_eq!(tags.as_slice(), ["auto", "home", "life"]);
        assert_eq!(tags.to_storage(), "auto,home,life");
        assert!(Tags::parse(" , ").is_empty());
    }

    #[test]
    fn storage_key_rejects_paths() {
        assert!(StorageKey::new("abc.pdf").is_ok());
        assert_eq!(
            StorageKey::new("../etc/passwd"),
            Err(TypeConstraintError::InvalidStorageKey)
        );
        assert_eq!(
            StorageKey::new("dir/file.pdf"),
            Err(TypeConstraintError::InvalidStorageKey)
        );
    }
}
