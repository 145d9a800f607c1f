//! The record written after a successful signup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::SignupForm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn from_signup(form: &SignupForm, created_at: DateTime<Utc>) -> Self {
        Self {
            first_name: form.first_name.as_text().trim().to_string(),
            last_name: form.last_name.as_text().trim().to_string(),
            email: form.email.as_text().trim().to_string(),
            created_at,
        }
    }
}
