pub mod account;
pub mod loan_offer;
pub mod profile;
pub mod session;

pub use account::{Account, AccountId};
pub use loan_offer::LoanOffer;
pub use profile::{CasteCategory, DocumentKind, DocumentRef, Profile, ProfileForm};
pub use session::Session;
