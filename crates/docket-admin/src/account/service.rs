//! Account service implementation
//!
//! Provides the account record, the role each account holds and the checks
//! run before an account is created.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use docket_core::{
    Actor, DATE_FORMAT, DocketError, FormData, FromForm, Permission, PermissionSet, Record,
    RecordId, RecordSchema, Result as DocketResult, Value,
};
use docket_forms::{FieldConfig, is_valid_email};
use docket_records::Entity;
use docket_table::{Align, ColumnDef, ColumnEntry, FilterField, FilterSchema, SortConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9._\-]{2,31}$").expect("valid regex"));

/// Default minimum password length
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// The role an account holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including deleting records
    Admin,
    /// Can view, add and edit records
    Clerk,
    /// Read-only access
    #[default]
    Viewer,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Clerk, Role::Viewer]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Clerk => "Clerk",
            Role::Viewer => "Viewer",
        }
    }

    /// Capabilities granted by this role
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Role::Admin => PermissionSet::full(),
            Role::Clerk => PermissionSet::read_only()
                .with(Permission::Create)
                .with(Permission::Edit),
            Role::Viewer => PermissionSet::read_only(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::all()
            .iter()
            .copied()
            .find(|role| role.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AccountError::UnknownRole(s.to_string()))
    }
}

/// A stored user account
///
/// Passwords are never stored on the account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: RecordId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    #[serde(default)]
    pub created_on: Option<NaiveDate>,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl Record for UserAccount {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "username" => self.username.as_str().into(),
            "full_name" => self.full_name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.label().into(),
            "active" => yes_no(self.active).into(),
            "created_on" => self.created_on.into(),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for UserAccount {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "full_name",
        "email",
        "role",
        "active",
        "created_on",
    ];
}

impl FromForm for UserAccount {
    fn from_form(id: RecordId, form: &FormData) -> DocketResult<Self> {
        let role = form
            .get("role")
            .parse::<Role>()
            .map_err(|e| DocketError::InvalidValue(e.to_string()))?;
        let active = match form.get("active").trim().to_ascii_lowercase().as_str() {
            "" | "yes" | "true" => true,
            "no" | "false" => false,
            other => {
                return Err(DocketError::InvalidValue(format!(
                    "active: expected Yes or No, got '{}'",
                    other
                )));
            }
        };
        Ok(Self {
            id,
            username: form.required_text("username")?.to_lowercase(),
            full_name: form.required_text("full_name")?,
            email: form.required_text("email")?,
            role,
            active,
            created_on: form.date("created_on")?,
        })
    }
}

impl Entity for UserAccount {
    const TITLE: &'static str = "Account";
    const PLURAL: &'static str = "accounts";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("username", "Username").sortable().into(),
            ColumnDef::new("full_name", "Name").sortable().into(),
            ColumnDef::new("email", "Email").into(),
            ColumnDef::new("role", "Role").sortable().align(Align::Center).into(),
            ColumnDef::new("active", "Active").align(Align::Center).into(),
            ColumnDef::new("created_on", "Created").sortable().align(Align::Center).into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::text("username", "Username").required(),
            FieldConfig::text("full_name", "Full Name").required(),
            FieldConfig::email("email", "Email").required(),
            FieldConfig::select("role", "Role", Role::all().iter().map(Role::label)).required(),
            FieldConfig::select("active", "Active", ["Yes", "No"]).required(),
            FieldConfig::date("created_on", "Created On"),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("role", "Role"),
            FilterField::text("active", "Active"),
            FilterField::date_range("created_on", "Created On"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::ascending("username"))
    }

    fn unique_field() -> Option<&'static str> {
        Some("username")
    }
}

/// Specification for creating a new account
///
/// # Examples
///
/// ```
/// use docket_admin::{AccountSpec, Role};
///
/// let spec = AccountSpec::new("jsantos")
///     .with_full_name("Juan Santos")
///     .with_role(Role::Clerk);
/// assert_eq!(spec.username(), "jsantos");
/// assert_eq!(spec.role(), Role::Clerk);
/// assert!(spec.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    username: String,
    full_name: String,
    email: String,
    role: Role,
    password: Option<String>,
    active: bool,
}

impl AccountSpec {
    /// Create a new account specification
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: String::new(),
            email: String::new(),
            role: Role::default(),
            password: None,
            active: true,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the role (default: viewer)
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the initial password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set whether the account can act (default: true)
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The create payload for this account, stamped with `created_on`
    pub fn to_form(&self, created_on: NaiveDate) -> FormData {
        [
            ("username", self.username.trim().to_lowercase()),
            ("full_name", self.full_name.clone()),
            ("email", self.email.clone()),
            ("role", self.role.label().to_string()),
            ("active", yes_no(self.active).to_string()),
            ("created_on", created_on.format(DATE_FORMAT).to_string()),
        ]
        .into_iter()
        .collect()
    }
}

/// Error type for account operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error(
        "Username '{0}' must start with a letter and use 3-32 lowercase letters, digits, '.', '_' or '-'"
    )]
    InvalidUsername(String),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),
}

/// Validates accounts and maps them to actors
///
/// # Examples
///
/// ```
/// use docket_admin::{AccountService, AccountSpec};
///
/// let service = AccountService::new();
/// let spec = AccountSpec::new("mreyes")
///     .with_email("mreyes@example.com")
///     .with_password("correct horse");
/// assert!(service.validate(&spec, &[]).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AccountService {
    min_password_length: usize,
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountService {
    pub fn new() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Validate a new account against the accounts that already exist
    pub fn validate(&self, spec: &AccountSpec, existing: &[UserAccount]) -> Result<(), AccountError> {
        let username = spec.username.trim().to_lowercase();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        if !USERNAME_REGEX.is_match(&username) {
            return Err(AccountError::InvalidUsername(spec.username.clone()));
        }
        if !is_valid_email(&spec.email) {
            return Err(AccountError::InvalidEmail(spec.email.clone()));
        }

        let password_length = spec.password.as_deref().map_or(0, |p| p.chars().count());
        if password_length < self.min_password_length {
            return Err(AccountError::PasswordTooShort {
                min: self.min_password_length,
            });
        }

        if Self::find(existing, &username).is_some() {
            return Err(AccountError::DuplicateUsername(username));
        }

        Ok(())
    }

    /// Look up an account by username, ignoring case
    pub fn find<'a>(accounts: &'a [UserAccount], username: &str) -> Option<&'a UserAccount> {
        let username = username.trim();
        accounts
            .iter()
            .find(|account| account.username.eq_ignore_ascii_case(username))
    }

    /// The actor a signed-in account acts as; inactive accounts get no
    /// capabilities
    pub fn actor_for(&self, account: &UserAccount) -> Actor {
        let permissions = if account.active {
            account.role.permissions()
        } else {
            PermissionSet::none()
        };
        Actor::new(account.username.clone(), permissions)
    }
}
