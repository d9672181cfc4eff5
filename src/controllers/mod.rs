pub mod home_controller;
pub mod market_controller;
pub mod watchlist_controller;
pub mod strategy_controller;
pub mod position_controller;
pub mod user_controller;
pub mod forward_controller;
pub mod links_controller;
