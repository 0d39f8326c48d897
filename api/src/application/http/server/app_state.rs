use std::sync::Arc;

use foodlens_core::application::FoodlensService;

use crate::{application::rate_limit::ClientRateLimiter, args::Args};

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: FoodlensService,
    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    pub fn new(
        args: Arc<Args>,
        service: FoodlensService,
        rate_limiter: Arc<ClientRateLimiter>,
    ) -> Self {
        Self {
            args,
            service,
            rate_limiter,
        }
    }
}
