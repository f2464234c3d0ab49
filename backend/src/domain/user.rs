//! User data model.
//!
//! Registration input is validated here so adapters never hand unchecked
//! strings to a repository. Stored users are trusted and built directly from
//! their persisted columns.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Error;
use super::auth::{Password, PasswordValidationError};

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 20;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 150;

/// Validation errors for user registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyFirstName,
    FirstNameTooLong { max: usize },
    EmptyLastName,
    LastNameTooLong { max: usize },
    Password(PasswordValidationError),
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::EmptyUsername
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters => "username",
            Self::EmptyFirstName | Self::FirstNameTooLong { .. } => "first_name",
            Self::EmptyLastName | Self::LastNameTooLong { .. } => "last_name",
            Self::Password(_) => "password",
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyUsername | Self::EmptyFirstName | Self::EmptyLastName => {
                "required"
            }
            Self::EmailTooLong { .. }
            | Self::UsernameTooLong { .. }
            | Self::FirstNameTooLong { .. }
            | Self::LastNameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::UsernameInvalidCharacters => "invalid_username",
            Self::Password(err) => err.code(),
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "enter a valid email address"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters",
            ),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::FirstNameTooLong { max } => {
                write!(f, "first name must be at most {max} characters")
            }
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::LastNameTooLong { max } => {
                write!(f, "last name must be at most {max} characters")
            }
            Self::Password(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<PasswordValidationError> for UserValidationError {
    fn from(value: PasswordValidationError) -> Self {
        Self::Password(value)
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Error::field(value.field(), value.code(), value.to_string())
    }
}

/// Database identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login identifier, kept exactly as typed apart from surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate an email address.
    ///
    /// Only the `local@domain` shape is checked; deliverability is not.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !trimmed.contains(char::is_whitespace) =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Public handle shown next to recipes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !raw.is_ascii() || !username_regex().is_match(&raw) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn person_name(
    raw: String,
    empty: UserValidationError,
    too_long: UserValidationError,
) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > PERSON_NAME_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Stored user account.
///
/// Built from persisted rows, so the fields are trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

/// User as seen by a particular actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the actor follows this user. Always false for anonymous actors.
    pub is_subscribed: bool,
}

/// Validated registration request.
///
/// ## Invariants
/// - every field has passed its own validation;
/// - the password is held in zeroizing storage until it is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    email: Email,
    username: Username,
    first_name: String,
    last_name: String,
    password: Password,
}

/// Raw registration fields as received from an adapter.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl NewUser {
    /// Validate each field in declaration order and stop at the first failure.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{NewUser, RegistrationDraft};
    ///
    /// let user = NewUser::try_from_draft(RegistrationDraft {
    ///     email: "vpupkin@yandex.ru".into(),
    ///     username: "vasya.pupkin".into(),
    ///     first_name: "Vasya".into(),
    ///     last_name: "Pupkin".into(),
    ///     password: "Qwerty123".into(),
    /// })
    /// .expect("valid registration");
    /// assert_eq!(user.username().as_str(), "vasya.pupkin");
    /// ```
    pub fn try_from_draft(draft: RegistrationDraft) -> Result<Self, UserValidationError> {
        let email = Email::new(draft.email)?;
        let username = Username::new(draft.username)?;
        let first_name = person_name(
            draft.first_name,
            UserValidationError::EmptyFirstName,
            UserValidationError::FirstNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )?;
        let last_name = person_name(
            draft.last_name,
            UserValidationError::EmptyLastName,
            UserValidationError::LastNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )?;
        let password = Password::new(draft.password)?;
        Ok(Self {
            email,
            username,
            first_name,
            last_name,
            password,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}
