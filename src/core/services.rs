use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SessionManager;
use crate::core::constants::{
    ALLOWED_DOCUMENT_EXTENSIONS, MAX_AGE, MAX_DOCUMENTS, MAX_GPA, MAX_USERNAME_LENGTH, MIN_AGE, MIN_GPA,
};
use crate::core::errors::LoanError;
use crate::core::models::{
    Account, AccountId, CasteCategory, DocumentKind, DocumentRef, LoanOffer, Profile, ProfileForm, Session,
};
use crate::core::recommendation::{Recommendation, recommend};
use crate::infrastructure::catalog::read_loan_offers;
use crate::infrastructure::storage::Storage;
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct LoanService<S: Storage> {
    storage: S,
    sessions: SessionManager,
    bcrypt_cost: u32,
}

impl<S: Storage> LoanService<S> {
    pub fn new(storage: S, jwt_secret: &str, bcrypt_cost: u32) -> Self {
        info!("Initializing LoanService");
        LoanService {
            storage,
            sessions: SessionManager::new(jwt_secret),
            bcrypt_cost,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LoanError> {
        if value.trim().is_empty() {
            return Err(LoanError::invalid(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(LoanError::invalid(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(LoanError::invalid(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    /// Checks ranges and enum membership, returning the parsed category.
    fn validate_profile(&self, form: &ProfileForm) -> Result<CasteCategory, LoanError> {
        if !(MIN_AGE..=MAX_AGE).contains(&form.age) {
            return Err(LoanError::invalid(
                "age",
                "Invalid Age",
                format!("Age must be between {} and {}", MIN_AGE, MAX_AGE),
            ));
        }

        if !form.gpa.is_finite() || !(MIN_GPA..=MAX_GPA).contains(&form.gpa) {
            return Err(LoanError::invalid(
                "gpa",
                "Invalid GPA",
                format!("GPA must be between {:.1} and {:.1}", MIN_GPA, MAX_GPA),
            ));
        }

        let caste_category = form.caste_category.parse::<CasteCategory>().map_err(|_| {
            LoanError::invalid(
                "caste_category",
                "Invalid Caste Category",
                format!(
                    "`{}` is not one of {}",
                    form.caste_category,
                    CasteCategory::ALL.map(|c| c.as_str()).join(", ")
                ),
            )
        })?;

        self.validate_documents(&form.documents)?;
        Ok(caste_category)
    }

    fn validate_documents(&self, documents: &[DocumentRef]) -> Result<(), LoanError> {
        if documents.len() > MAX_DOCUMENTS {
            return Err(LoanError::invalid(
                "documents",
                "Too Many Documents",
                format!("At most {} documents can be attached", MAX_DOCUMENTS),
            ));
        }

        for kind in [DocumentKind::TenthMarksheet, DocumentKind::TwelfthMarksheet] {
            if documents.iter().filter(|d| d.kind == kind).count() > 1 {
                return Err(LoanError::invalid(
                    "documents",
                    "Duplicate Marksheet",
                    format!("Only one {} can be attached", kind),
                ));
            }
        }

        for document in documents {
            let extension = Path::new(document.file_name.trim())
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase());
            let allowed = extension
                .as_deref()
                .is_some_and(|ext| ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext));
            if !allowed {
                return Err(LoanError::invalid(
                    "documents",
                    "Unsupported Document",
                    format!(
                        "`{}` must be one of: {}",
                        document.file_name,
                        ALLOWED_DOCUMENT_EXTENSIONS.join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }

    // CREDENTIALS

    pub fn register(&mut self, username: &str, password: &str) -> Result<AccountId, LoanError> {
        info!("Registering account {}", username);
        self.validate_string_input("username", username, MAX_USERNAME_LENGTH)?;
        if password.is_empty() {
            return Err(LoanError::invalid(
                "password",
                "Invalid password",
                "Password cannot be empty",
            ));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let account = self.storage.create_account(username, &password_hash).inspect_err(|err| {
            if let LoanError::DuplicateUsername(_) = err {
                warn!("Registration rejected, username {} is taken", username);
            }
        })?;

        debug!("Account created with ID: {}", account.id);
        Ok(account.id)
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Result<Account, LoanError> {
        let account = self
            .storage
            .get_account_by_username(username)?
            .ok_or(LoanError::InvalidCredentials)?;

        if verify_password(password, &account.password_hash)? {
            Ok(account)
        } else {
            Err(LoanError::InvalidCredentials)
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<AccountId, LoanError> {
        self.verify_credentials(username, password)
            .map(|account| account.id)
            .inspect_err(|_| warn!("Failed authentication for {}", username))
    }

    // SESSIONS

    /// Authenticates and opens a session, returning it with its bearer token.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(Session, String), LoanError> {
        let account = self
            .verify_credentials(username, password)
            .inspect_err(|_| warn!("Failed login for {}", username))?;
        let (session, token) = self.sessions.start(&account)?;
        info!("Account {} logged in (session {})", account.id, session.id);
        Ok((session, token))
    }

    pub fn resolve_session(&self, token: &str) -> Result<Session, LoanError> {
        self.sessions.resolve(token)
    }

    /// Ends the session. Returns false if it had already ended.
    pub fn logout(&mut self, session: &Session) -> bool {
        let ended = self.sessions.end(session.id);
        info!("Account {} logged out (session {})", session.account_id, session.id);
        ended
    }

    // PROFILES

    pub fn save_profile(&mut self, account_id: AccountId, form: ProfileForm) -> Result<Profile, LoanError> {
        info!("Saving profile for account {}", account_id);
        let caste_category = self.validate_profile(&form)?;

        if self.storage.get_account(account_id)?.is_none() {
            return Err(LoanError::AccountNotFound(account_id));
        }

        let profile = Profile::from_form(account_id, form, caste_category);
        self.storage.upsert_profile(&profile)?;
        debug!("Profile saved: {:?}", profile);
        Ok(profile)
    }

    pub fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, LoanError> {
        self.storage.get_profile(account_id)
    }

    // RECOMMENDATIONS

    pub fn recommend_for_account(&self, account_id: AccountId) -> Result<Recommendation, LoanError> {
        let profile = self
            .storage
            .get_profile(account_id)?
            .ok_or(LoanError::MissingProfile(account_id))?;

        let labels = recommend(&profile);
        debug!("Recommended {:?} for account {}", labels, account_id);

        Ok(Recommendation {
            account_id,
            student_name: profile.name,
            labels,
        })
    }

    // CATALOG

    /// Loads the catalog from `source` unless it already holds offers.
    /// Returns the number of offers inserted, zero when nothing was loaded.
    pub fn ensure_catalog_loaded(&mut self, source: &Path) -> Result<usize, LoanError> {
        if self.catalog_populated()? {
            return Ok(0);
        }
        let file = File::open(source)
            .map_err(|e| LoanError::CatalogError(format!("Cannot open {}: {}", source.display(), e)))?;
        self.load_catalog(file)
    }

    pub fn ensure_catalog_loaded_from<R: Read>(&mut self, reader: R) -> Result<usize, LoanError> {
        if self.catalog_populated()? {
            return Ok(0);
        }
        self.load_catalog(reader)
    }

    fn catalog_populated(&self) -> Result<bool, LoanError> {
        let existing = self.storage.count_loan_offers()?;
        if existing > 0 {
            debug!("Catalog already holds {} offers, skipping load", existing);
        }
        Ok(existing > 0)
    }

    fn load_catalog<R: Read>(&mut self, reader: R) -> Result<usize, LoanError> {
        let offers = read_loan_offers(reader)?;
        let inserted = self.storage.insert_loan_offers(&offers)?;
        info!("Loan catalog loaded with {} offers", inserted);
        Ok(inserted)
    }

    /// Offers able to cover `max_amount`, in catalog order.
    pub fn find_offers(&self, max_amount: i64) -> Result<Vec<LoanOffer>, LoanError> {
        if max_amount < 0 {
            return Err(LoanError::invalid(
                "max_amount",
                "Invalid Amount",
                "Requested amount cannot be negative",
            ));
        }
        self.storage.find_loan_offers(max_amount)
    }
}
