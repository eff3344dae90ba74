//! Typed remote operations, each an `impl MwsClient` block over
//! [`MwsClient::execute`](crate::client::MwsClient::execute).

mod credentials;
mod feeds;
mod finances;
mod inventory;
mod orders;
mod products;
mod reports;
mod sellers;

pub use finances::FinancialEventsQuery;
pub use inventory::DEFAULT_RESPONSE_GROUP;
pub use orders::OrderQuery;
pub use products::{CompetitivePrice, MatchingProducts, MyPrice};
pub use sellers::MarketplaceParticipations;
