use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use super::account::AccountId;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum CasteCategory {
    General,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    Other,
}

impl CasteCategory {
    pub const ALL: [CasteCategory; 5] = [
        CasteCategory::General,
        CasteCategory::Obc,
        CasteCategory::Sc,
        CasteCategory::St,
        CasteCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CasteCategory::General => "General",
            CasteCategory::Obc => "OBC",
            CasteCategory::Sc => "SC",
            CasteCategory::St => "ST",
            CasteCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for CasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown caste category `{0}`")]
pub struct ParseCasteCategoryError(pub String);

impl FromStr for CasteCategory {
    type Err = ParseCasteCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CasteCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| ParseCasteCategoryError(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    TenthMarksheet,
    TwelfthMarksheet,
    Certification,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::TenthMarksheet => "tenth_marksheet",
            DocumentKind::TwelfthMarksheet => "twelfth_marksheet",
            DocumentKind::Certification => "certification",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown document kind `{0}`")]
pub struct ParseDocumentKindError(pub String);

impl FromStr for DocumentKind {
    type Err = ParseDocumentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tenth_marksheet" => Ok(DocumentKind::TenthMarksheet),
            "twelfth_marksheet" => Ok(DocumentKind::TwelfthMarksheet),
            "certification" => Ok(DocumentKind::Certification),
            other => Err(ParseDocumentKindError(other.to_string())),
        }
    }
}

/// Reference to an uploaded file. The bytes live with the upload collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub file_name: String,
}

/// Student details as submitted, before validation.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileForm {
    pub name: String,
    pub age: u32,
    #[schema(value_type = String, format = Date, example = "2004-05-17")]
    pub date_of_birth: NaiveDate,
    pub contact: String,
    pub address: String,
    /// One of General, OBC, SC, ST, Other.
    pub caste_category: String,
    pub gpa: f64,
    #[serde(default)]
    pub transaction_history: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub exam_scores: String,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Profile {
    pub account_id: AccountId,
    pub name: String,
    pub age: u32,
    #[schema(value_type = String, format = Date, example = "2004-05-17")]
    pub date_of_birth: NaiveDate,
    pub contact: String,
    pub address: String,
    pub caste_category: CasteCategory,
    pub gpa: f64,
    pub transaction_history: String,
    pub certifications: String,
    pub exam_scores: String,
    pub documents: Vec<DocumentRef>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Builds the stored record from an already validated form.
    pub fn from_form(account_id: AccountId, form: ProfileForm, caste_category: CasteCategory) -> Self {
        Profile {
            account_id,
            name: form.name,
            age: form.age,
            date_of_birth: form.date_of_birth,
            contact: form.contact,
            address: form.address,
            caste_category,
            gpa: form.gpa,
            transaction_history: form.transaction_history,
            certifications: form.certifications,
            exam_scores: form.exam_scores,
            documents: form.documents,
            updated_at: Utc::now(),
        }
    }
}
