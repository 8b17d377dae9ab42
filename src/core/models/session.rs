use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::account::AccountId;

/// Identity context handed to every operation acting on behalf of a user.
/// Created by a successful login and ended by logout.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub account_id: AccountId,
    pub username: String,
    pub started_at: DateTime<Utc>,
}
