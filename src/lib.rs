pub mod config;
pub mod http_client;
pub mod leaderboard_fetch;
pub mod names;
pub mod output;
pub mod snapshot;
pub mod store;
pub mod sync;
