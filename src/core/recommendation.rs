//! Rule-based loan recommendation.
//!
//! Rules are independent and evaluated in a fixed order; every rule that
//! holds contributes its label. A profile matching none gets the general
//! student loan.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::constants::{HIGH_GPA_THRESHOLD, NO_DEFAULTS_MARKER};
use crate::core::models::{AccountId, CasteCategory, Profile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanLabel {
    #[serde(rename = "High GPA Loan")]
    HighGpa,
    #[serde(rename = "Premium Bank Loan")]
    PremiumBank,
    #[serde(rename = "Government Subsidized Loan")]
    GovernmentSubsidized,
    #[serde(rename = "Skill-Based Education Loan")]
    SkillBasedEducation,
    #[serde(rename = "General Student Loan")]
    GeneralStudent,
}

impl LoanLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanLabel::HighGpa => "High GPA Loan",
            LoanLabel::PremiumBank => "Premium Bank Loan",
            LoanLabel::GovernmentSubsidized => "Government Subsidized Loan",
            LoanLabel::SkillBasedEducation => "Skill-Based Education Loan",
            LoanLabel::GeneralStudent => "General Student Loan",
        }
    }

    /// Short terms shown next to the label, where the product has any.
    pub fn detail(&self) -> Option<&'static str> {
        match self {
            LoanLabel::HighGpa => Some("0% Interest for Top Students"),
            LoanLabel::PremiumBank => Some("Low Interest for Good Transactions"),
            LoanLabel::GeneralStudent => Some("Standard Rate"),
            LoanLabel::GovernmentSubsidized | LoanLabel::SkillBasedEducation => None,
        }
    }
}

impl std::fmt::Display for LoanLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct Rule {
    label: LoanLabel,
    applies: fn(&Profile) -> bool,
}

const RULES: [Rule; 4] = [
    Rule {
        label: LoanLabel::HighGpa,
        applies: has_high_gpa,
    },
    Rule {
        label: LoanLabel::PremiumBank,
        applies: has_clean_repayment_history,
    },
    Rule {
        label: LoanLabel::GovernmentSubsidized,
        applies: is_reserved_category,
    },
    Rule {
        label: LoanLabel::SkillBasedEducation,
        applies: has_skill_evidence,
    },
];

fn has_high_gpa(profile: &Profile) -> bool {
    profile.gpa > HIGH_GPA_THRESHOLD
}

fn has_clean_repayment_history(profile: &Profile) -> bool {
    profile.transaction_history.contains(NO_DEFAULTS_MARKER)
}

fn is_reserved_category(profile: &Profile) -> bool {
    matches!(profile.caste_category, CasteCategory::Sc | CasteCategory::St)
}

// Any uploaded document counts, whatever its kind.
fn has_skill_evidence(profile: &Profile) -> bool {
    !profile.certifications.is_empty() || !profile.documents.is_empty()
}

/// Labels for every rule the profile satisfies, in rule order.
pub fn recommend(profile: &Profile) -> Vec<LoanLabel> {
    let mut labels: Vec<LoanLabel> = RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| rule.label)
        .collect();

    if labels.is_empty() {
        labels.push(LoanLabel::GeneralStudent);
    }
    labels
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub account_id: AccountId,
    pub student_name: String,
    pub labels: Vec<LoanLabel>,
}
