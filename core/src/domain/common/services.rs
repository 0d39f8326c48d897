use std::time::Duration;

use crate::domain::recognition::{normalizer::Normalizer, ports::VisionClient};

#[derive(Clone)]
pub struct Service<V>
where
    V: VisionClient,
{
    pub(crate) vision_client: V,
    pub(crate) normalizer: Normalizer,
    pub(crate) upstream_timeout: Duration,
}

impl<V> Service<V>
where
    V: VisionClient,
{
    pub fn new(vision_client: V, normalizer: Normalizer, upstream_timeout: Duration) -> Self {
        Self {
            vision_client,
            normalizer,
            upstream_timeout,
        }
    }
}
