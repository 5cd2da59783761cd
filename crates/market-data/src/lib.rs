mod rate_limit;

pub mod nse;
pub mod yahoo;

pub use nse::{Board, IndexConstituent, ListedCompany, NseClient};
pub use yahoo::YahooClient;
