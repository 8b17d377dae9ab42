use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the bank loan catalog. Field names double as the CSV header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanOffer {
    pub bank_name: String,
    pub loan_name: String,
    pub interest_rate: f64,
    pub max_loan_amount: i64,
    pub eligibility_criteria: String,
    /// Years.
    pub repayment_period: i64,
    pub processing_fee: f64,
    pub required_documents: String,
}
