pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 100;

pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 10.0;
pub const HIGH_GPA_THRESHOLD: f64 = 8.0;

pub const NO_DEFAULTS_MARKER: &str = "No Defaults";

pub const MAX_DOCUMENTS: usize = 3;
pub const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "jpg", "png"];

pub const MAX_USERNAME_LENGTH: usize = 50;

/// Live sessions kept per account; logging in past this ends the oldest.
pub const MAX_SESSIONS_PER_ACCOUNT: usize = 5;
