use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::services::VisionModel;
use crate::workflow::SolveFlow;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    flow: SolveFlow,
    max_upload_bytes: usize,
    next_request_id: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config, model: Arc<dyn VisionModel>) -> Self {
        Self {
            inner: Arc::new(Inner {
                flow: SolveFlow::new(config, model),
                max_upload_bytes: config.max_upload_bytes,
                next_request_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn flow(&self) -> &SolveFlow {
        &self.inner.flow
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.inner.max_upload_bytes
    }

    /// 分配请求序号
    pub fn next_request_id(&self) -> u64 {
        self.inner.next_request_id.fetch_add(1, Ordering::Relaxed)
    }
}
