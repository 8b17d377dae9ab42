use crate::core::errors::LoanError;
use crate::core::models::{Account, AccountId, LoanOffer, Profile};
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use std::collections::HashMap;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    accounts: HashMap<AccountId, Account>,
    accounts_by_username: HashMap<String, AccountId>,
    profiles: HashMap<AccountId, Profile>,
    loan_offers: Vec<LoanOffer>,
    next_account_id: i64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            next_account_id: 1,
            ..Default::default()
        }
    }
}

impl Storage for InMemoryStorage {
    fn create_account(&mut self, username: &str, password_hash: &str) -> Result<Account, LoanError> {
        if self.accounts_by_username.contains_key(username) {
            return Err(LoanError::DuplicateUsername(username.to_string()));
        }
        let account = Account {
            id: AccountId(self.next_account_id),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.next_account_id += 1;
        self.accounts_by_username.insert(account.username.clone(), account.id);
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, LoanError> {
        Ok(self.accounts.get(&account_id).cloned())
    }

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, LoanError> {
        Ok(self
            .accounts_by_username
            .get(username)
            .and_then(|id| self.accounts.get(id))
            .cloned())
    }

    fn upsert_profile(&mut self, profile: &Profile) -> Result<(), LoanError> {
        if !self.accounts.contains_key(&profile.account_id) {
            return Err(LoanError::AccountNotFound(profile.account_id));
        }
        self.profiles.insert(profile.account_id, profile.clone());
        Ok(())
    }

    fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, LoanError> {
        Ok(self.profiles.get(&account_id).cloned())
    }

    fn count_loan_offers(&self) -> Result<usize, LoanError> {
        Ok(self.loan_offers.len())
    }

    fn insert_loan_offers(&mut self, offers: &[LoanOffer]) -> Result<usize, LoanError> {
        self.loan_offers.extend_from_slice(offers);
        Ok(offers.len())
    }

    fn find_loan_offers(&self, amount: i64) -> Result<Vec<LoanOffer>, LoanError> {
        Ok(self
            .loan_offers
            .iter()
            .filter(|offer| offer.max_loan_amount >= amount)
            .cloned()
            .collect())
    }
}
