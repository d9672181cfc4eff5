pub mod user;
pub mod watchlist;
pub mod strategy;
pub mod position;
pub mod market;

pub use user::{CurrentUser, User, UserFilters};
pub use watchlist::{Watchlist, WatchlistStock};
pub use strategy::{Strategy, StrategyLeg};
pub use position::Position;
