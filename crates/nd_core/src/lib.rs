pub mod auth;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod payout;
pub mod rates;
pub mod source;
pub mod stats;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthError, Authenticator, Credentials, DirectoryAuthenticator, Signup};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use filter::{filter, unique_authors, FilterCriteria, FilterField};
pub use payout::{compute_payouts, sort_by_payout_desc, PayoutCache};
pub use rates::RateTable;
pub use source::ArticleSource;
pub use stats::DashboardStats;
pub use storage::KeyValueStore;
pub use types::{Article, AuthorPayout, ContentType, PayoutBreakdown, PayoutRate, Role, User};
