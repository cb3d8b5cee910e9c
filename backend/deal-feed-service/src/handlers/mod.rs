pub mod feed;
pub mod health;

pub use feed::{configure_routes, generate_deal_feed, json_config, FeedHandlerState};
pub use health::liveness_check;
