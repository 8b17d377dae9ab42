pub const ACCOUNTS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS accounts (
        id              INTEGER     PRIMARY KEY AUTOINCREMENT,
        username        TEXT        NOT NULL    UNIQUE,
        password_hash   TEXT        NOT NULL,
        created_at      TEXT        NOT NULL
    )";

pub const PROFILES_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS profiles (
        account_id          INTEGER     PRIMARY KEY     REFERENCES accounts(id),

        name                TEXT        NOT NULL,
        age                 INTEGER     NOT NULL,
        date_of_birth       TEXT        NOT NULL,
        contact             TEXT        NOT NULL,
        address             TEXT        NOT NULL,
        caste_category      TEXT        NOT NULL
            CHECK (caste_category IN ('General', 'OBC', 'SC', 'ST', 'Other')),
        gpa                 REAL        NOT NULL
            CHECK (gpa BETWEEN 0.0 AND 10.0),

        transaction_history TEXT        NOT NULL,
        certifications      TEXT        NOT NULL,
        exam_scores         TEXT        NOT NULL,

        updated_at          TEXT        NOT NULL
    )";

pub const PROFILE_DOCUMENTS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS profile_documents (
        account_id      INTEGER     NOT NULL    REFERENCES profiles(account_id) ON DELETE CASCADE,
        position        INTEGER     NOT NULL,
        kind            TEXT        NOT NULL,
        file_name       TEXT        NOT NULL,

        PRIMARY KEY (account_id, position)
    )";

pub const LOAN_OFFERS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS loan_offers (
        id                      INTEGER     PRIMARY KEY AUTOINCREMENT,
        bank_name               TEXT        NOT NULL,
        loan_name               TEXT        NOT NULL,
        interest_rate           REAL        NOT NULL,
        max_loan_amount         INTEGER     NOT NULL,
        eligibility_criteria    TEXT        NOT NULL,
        repayment_period        INTEGER     NOT NULL,
        processing_fee          REAL        NOT NULL,
        required_documents      TEXT        NOT NULL
    )";

pub const ALL_SCHEMAS: [&str; 4] = [
    ACCOUNTS_SCHEMA,
    PROFILES_SCHEMA,
    PROFILE_DOCUMENTS_SCHEMA,
    LOAN_OFFERS_SCHEMA,
];
