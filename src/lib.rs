pub mod app;
pub mod calendar;
pub mod captcha;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod ratelimit;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{load_data, persist_data};
