use crate::core::errors::LoanError;
use crate::core::models::{Account, AccountId, CasteCategory, DocumentKind, DocumentRef, LoanOffer, Profile};
use crate::infrastructure::storage::{schema, Storage};
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{ffi, named_params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite-backed store. Owns its connection; dropping the storage closes it.
pub struct SqliteStorage {
    connection: Connection,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoanError> {
        log::debug!("[open] opening database at {}", path.as_ref().display());
        Self::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, LoanError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self, LoanError> {
        connection.pragma_update(None, "foreign_keys", true)?;
        for table in schema::ALL_SCHEMAS {
            connection.execute(table, [])?;
        }
        log::debug!("[initialize] schema ready");
        Ok(SqliteStorage { connection })
    }

    fn query_documents(&self, account_id: AccountId) -> Result<Vec<DocumentRef>, LoanError> {
        let mut stmt = self.connection.prepare(
            "SELECT kind, file_name
             FROM profile_documents
             WHERE account_id = :account_id
             ORDER BY position",
        )?;
        let documents = stmt
            .query_map(named_params! { ":account_id": account_id }, |row| {
                Ok(DocumentRef {
                    kind: row.get("kind")?,
                    file_name: row.get("file_name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }
}

/////*============== COLUMN CONVERSIONS ==============*/
impl ToSql for AccountId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for AccountId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(AccountId)
    }
}

impl ToSql for CasteCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CasteCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

impl ToSql for DocumentKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DocumentKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/////*============== ROW CONVERSIONS ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for Account {
    type Error = rusqlite::Error;

    fn try_from(row: &'a rusqlite::Row<'a>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }
}

// Documents live in their own table and are attached afterwards.
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for Profile {
    type Error = rusqlite::Error;

    fn try_from(row: &'a rusqlite::Row<'a>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            account_id: row.get("account_id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            date_of_birth: row.get("date_of_birth")?,
            contact: row.get("contact")?,
            address: row.get("address")?,
            caste_category: row.get("caste_category")?,
            gpa: row.get("gpa")?,
            transaction_history: row.get("transaction_history")?,
            certifications: row.get("certifications")?,
            exam_scores: row.get("exam_scores")?,
            documents: Vec::new(),
            updated_at: row.get("updated_at")?,
        })
    }
}

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for LoanOffer {
    type Error = rusqlite::Error;

    fn try_from(row: &'a rusqlite::Row<'a>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            bank_name: row.get("bank_name")?,
            loan_name: row.get("loan_name")?,
            interest_rate: row.get("interest_rate")?,
            max_loan_amount: row.get("max_loan_amount")?,
            eligibility_criteria: row.get("eligibility_criteria")?,
            repayment_period: row.get("repayment_period")?,
            processing_fee: row.get("processing_fee")?,
            required_documents: row.get("required_documents")?,
        })
    }
}

/// Whether `err` is the given extended constraint failure, e.g. `SQLITE_CONSTRAINT_UNIQUE`.
fn is_constraint_violation(err: &rusqlite::Error, extended_code: i32) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation && failure.extended_code == extended_code
    )
}

impl Storage for SqliteStorage {
    fn create_account(&mut self, username: &str, password_hash: &str) -> Result<Account, LoanError> {
        log::trace!("[create_account] inserting account {username}");
        let created_at = Utc::now();

        self.connection
            .prepare(
                "INSERT INTO accounts ( username,  password_hash,  created_at)
                 VALUES               (:username, :password_hash, :created_at)",
            )?
            .execute(named_params! {
                ":username": username,
                ":password_hash": password_hash,
                ":created_at": created_at,
            })
            .map_err(|err| {
                if is_constraint_violation(&err, ffi::SQLITE_CONSTRAINT_UNIQUE) {
                    LoanError::DuplicateUsername(username.to_string())
                } else {
                    LoanError::from(err)
                }
            })?;

        Ok(Account {
            id: AccountId(self.connection.last_insert_rowid()),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, LoanError> {
        Ok(self
            .connection
            .prepare("SELECT * FROM accounts WHERE id = :id")?
            .query_row(named_params! { ":id": account_id }, |row| Account::try_from(row))
            .optional()?)
    }

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, LoanError> {
        Ok(self
            .connection
            .prepare("SELECT * FROM accounts WHERE username = :username")?
            .query_row(named_params! { ":username": username }, |row| Account::try_from(row))
            .optional()?)
    }

    fn upsert_profile(&mut self, profile: &Profile) -> Result<(), LoanError> {
        let account_id = profile.account_id;
        log::trace!("[upsert_profile] replacing profile for account {account_id}");

        // Rolled back on drop unless committed.
        let tx = self.connection.transaction()?;

        tx.execute(
            "INSERT INTO profiles ( account_id,  name,  age,  date_of_birth,  contact,  address,
                                    caste_category,  gpa,  transaction_history,  certifications,
                                    exam_scores,  updated_at)
             VALUES               (:account_id, :name, :age, :date_of_birth, :contact, :address,
                                   :caste_category, :gpa, :transaction_history, :certifications,
                                   :exam_scores, :updated_at)
             ON CONFLICT(account_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                date_of_birth = excluded.date_of_birth,
                contact = excluded.contact,
                address = excluded.address,
                caste_category = excluded.caste_category,
                gpa = excluded.gpa,
                transaction_history = excluded.transaction_history,
                certifications = excluded.certifications,
                exam_scores = excluded.exam_scores,
                updated_at = excluded.updated_at",
            named_params! {
                ":account_id": account_id,
                ":name": profile.name,
                ":age": profile.age,
                ":date_of_birth": profile.date_of_birth,
                ":contact": profile.contact,
                ":address": profile.address,
                ":caste_category": profile.caste_category,
                ":gpa": profile.gpa,
                ":transaction_history": profile.transaction_history,
                ":certifications": profile.certifications,
                ":exam_scores": profile.exam_scores,
                ":updated_at": profile.updated_at,
            },
        )
        .map_err(|err| {
            if is_constraint_violation(&err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                LoanError::AccountNotFound(account_id)
            } else {
                LoanError::from(err)
            }
        })?;

        tx.execute(
            "DELETE FROM profile_documents WHERE account_id = :account_id",
            named_params! { ":account_id": account_id },
        )?;

        {
            let mut insert_document = tx.prepare(
                "INSERT INTO profile_documents ( account_id,  position,  kind,  file_name)
                 VALUES                        (:account_id, :position, :kind, :file_name)",
            )?;
            for (position, document) in profile.documents.iter().enumerate() {
                insert_document.execute(named_params! {
                    ":account_id": account_id,
                    ":position": position as i64,
                    ":kind": document.kind,
                    ":file_name": document.file_name,
                })?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, LoanError> {
        let profile = self
            .connection
            .prepare("SELECT * FROM profiles WHERE account_id = :account_id")?
            .query_row(named_params! { ":account_id": account_id }, |row| Profile::try_from(row))
            .optional()?;

        match profile {
            Some(mut profile) => {
                profile.documents = self.query_documents(account_id)?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    fn count_loan_offers(&self) -> Result<usize, LoanError> {
        let count: i64 = self
            .connection
            .query_row("SELECT COUNT(*) FROM loan_offers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_loan_offers(&mut self, offers: &[LoanOffer]) -> Result<usize, LoanError> {
        let tx = self.connection.transaction()?;
        {
            let mut insert_offer = tx.prepare(
                "INSERT INTO loan_offers ( bank_name,  loan_name,  interest_rate,  max_loan_amount,
                                           eligibility_criteria,  repayment_period,  processing_fee,
                                           required_documents)
                 VALUES                  (:bank_name, :loan_name, :interest_rate, :max_loan_amount,
                                          :eligibility_criteria, :repayment_period, :processing_fee,
                                          :required_documents)",
            )?;
            for offer in offers {
                insert_offer.execute(named_params! {
                    ":bank_name": offer.bank_name,
                    ":loan_name": offer.loan_name,
                    ":interest_rate": offer.interest_rate,
                    ":max_loan_amount": offer.max_loan_amount,
                    ":eligibility_criteria": offer.eligibility_criteria,
                    ":repayment_period": offer.repayment_period,
                    ":processing_fee": offer.processing_fee,
                    ":required_documents": offer.required_documents,
                })?;
            }
        }
        tx.commit()?;

        log::info!("Inserted {} loan offers into the catalog.", offers.len());
        Ok(offers.len())
    }

    fn find_loan_offers(&self, amount: i64) -> Result<Vec<LoanOffer>, LoanError> {
        let mut stmt = self.connection.prepare(
            "SELECT bank_name, loan_name, interest_rate, max_loan_amount, eligibility_criteria,
                    repayment_period, processing_fee, required_documents
             FROM loan_offers
             WHERE max_loan_amount >= :amount
             ORDER BY id",
        )?;

        let offers = stmt
            .query_map(named_params! { ":amount": amount }, |row| LoanOffer::try_from(row))?
            .collect::<Result<Vec<LoanOffer>, _>>()?;

        Ok(offers)
    }
}
