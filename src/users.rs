use crate::error::Error;
use crate::store::RecordStore;
use crate::types::{Role, User};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SLUG_PATTERN: Regex = Regex::new("^[a-z0-9-]+$").unwrap();
}

/// Profile fields an account may change about itself. Id, email and role are
/// fixed by the identity provider and never client-writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub timezone: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserDirectory<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> UserDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Accounts are created lazily on first authenticated contact; the auth
    /// provider has already verified the subject id. The initial url slug is
    /// the email local part.
    pub fn find_or_create(&self, id: &str, email: &str, name: &str) -> Result<User, Error> {
        if let Some(user) = self.store.find_user(id)? {
            return Ok(user);
        }

        let slug = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            slug,
            role: Role::User,
            timezone: "UTC".into(),
            logo: None,
            primary_color: None,
            secondary_color: None,
        };
        self.store.insert_user(user.clone())?;
        tracing::info!(user_id = id, "account created on first contact");
        Ok(user)
    }

    pub fn update(&self, id: &str, update: ProfileUpdate) -> Result<User, Error> {
        let mut user = self.store.find_user(id)?.ok_or(Error::NotFound)?;

        if let Some(slug) = update.slug {
            if !SLUG_PATTERN.is_match(&slug) {
                return Err(Error::Validation(
                    "slug may only contain lowercase letters, digits and dashes".into(),
                ));
            }
            user.slug = slug;
        }
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(timezone) = update.timezone {
            user.timezone = timezone;
        }
        if update.logo.is_some() {
            user.logo = update.logo;
        }
        if update.primary_color.is_some() {
            user.primary_color = update.primary_color;
        }
        if update.secondary_color.is_some() {
            user.secondary_color = update.secondary_color;
        }

        self.store.update_user(user.clone())?;
        Ok(user)
    }
}
