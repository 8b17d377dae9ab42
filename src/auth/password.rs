use crate::core::errors::LoanError;

/// Salted one-way hash of `password`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, LoanError> {
    bcrypt::hash(password, cost)
        .map_err(|e| LoanError::InternalServerError(format!("Password hashing error: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, LoanError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| LoanError::InternalServerError(format!("Password verification error: {}", e)))
}
