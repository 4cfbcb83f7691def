use std::sync::Arc;

use crate::{config::Config, services::recommendations::Recommender};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub defaults: RequestDefaults,
}

/// Values used when a request leaves a size parameter out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    pub user_top_n: usize,
    pub post_batch_size: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            user_top_n: crate::services::recommendations::DEFAULT_USER_TOP_N,
            post_batch_size: crate::services::recommendations::DEFAULT_POST_BATCH_SIZE,
        }
    }
}

impl From<&Config> for RequestDefaults {
    fn from(config: &Config) -> Self {
        Self {
            user_top_n: config.user_top_n,
            post_batch_size: config.post_batch_size,
        }
    }
}

impl AppState {
    pub fn new(recommender: Recommender, defaults: RequestDefaults) -> Self {
        Self {
            recommender: Arc::new(recommender),
            defaults,
        }
    }
}
