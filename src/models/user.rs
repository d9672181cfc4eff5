use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Announcement filter preferences attached to a user document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilters {
    #[serde(default)]
    pub scrips: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub email: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub filters: UserFilters,
}

/// The authenticated identity injected into request extensions by the
/// auth middleware. Handlers that mutate user-owned data require it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(u: User) -> Self {
        CurrentUser {
            id: u.id,
            username: u.username.clone().unwrap_or_else(|| u.email.clone()),
            email: u.email,
        }
    }
}
