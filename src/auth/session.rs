use crate::auth::jwt::{Claims, JwtService};
use crate::core::constants::MAX_SESSIONS_PER_ACCOUNT;
use crate::core::errors::LoanError;
use crate::core::models::{Account, AccountId, Session};
use chrono::Utc;
use log::debug;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Registry of live sessions. A token resolves only while its session is
/// registered here, so logout takes effect immediately.
pub struct SessionManager {
    jwt_service: JwtService,
    active: HashMap<Uuid, Session>,
    // Login order per account, oldest first.
    by_account: HashMap<AccountId, VecDeque<Uuid>>,
}

impl SessionManager {
    pub fn new(jwt_secret: &str) -> Self {
        SessionManager {
            jwt_service: JwtService::new(jwt_secret),
            active: HashMap::new(),
            by_account: HashMap::new(),
        }
    }

    /// Opens a session for `account` and returns it with its bearer token.
    /// At most [`MAX_SESSIONS_PER_ACCOUNT`] stay live per account.
    pub fn start(&mut self, account: &Account) -> Result<(Session, String), LoanError> {
        let session = Session {
            id: Uuid::new_v4(),
            account_id: account.id,
            username: account.username.clone(),
            started_at: Utc::now(),
        };

        let token = self.jwt_service.generate_token(&Claims {
            sub: account.id.0,
            sid: session.id.to_string(),
            username: account.username.clone(),
            iat: session.started_at.timestamp(),
        })?;

        let order = self.by_account.entry(account.id).or_default();
        while order.len() >= MAX_SESSIONS_PER_ACCOUNT {
            if let Some(oldest) = order.pop_front() {
                self.active.remove(&oldest);
                debug!("Evicted session {} of account {}", oldest, account.id);
            }
        }
        order.push_back(session.id);
        self.active.insert(session.id, session.clone());
        Ok((session, token))
    }

    pub fn resolve(&self, token: &str) -> Result<Session, LoanError> {
        let claims = self.jwt_service.validate_token(token)?;
        let session_id = Uuid::parse_str(&claims.sid)
            .map_err(|_| LoanError::Unauthorized("Malformed session id".to_string()))?;

        self.active
            .get(&session_id)
            .filter(|session| session.account_id.0 == claims.sub)
            .cloned()
            .ok_or_else(|| LoanError::Unauthorized("Session has ended".to_string()))
    }

    /// Returns whether the session was still active.
    pub fn end(&mut self, session_id: Uuid) -> bool {
        let Some(session) = self.active.remove(&session_id) else {
            return false;
        };
        if let Some(order) = self.by_account.get_mut(&session.account_id) {
            order.retain(|id| *id != session_id);
            if order.is_empty() {
                self.by_account.remove(&session.account_id);
            }
        }
        true
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
