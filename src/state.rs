use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::ResetRequestLimiter;
use crate::reset::ResetService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub resets: ResetService,
    pub reset_limiter: ResetRequestLimiter,
}

impl AppState {
    pub fn new(config: Config, resets: ResetService) -> Self {
        let reset_limiter = ResetRequestLimiter::new(
            config.reset_request_limit,
            config.reset_request_window_secs,
        );
        Self {
            config,
            resets,
            reset_limiter,
        }
    }
}
