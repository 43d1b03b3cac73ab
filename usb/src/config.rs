use crate::{
    ENDPOINT_READ, ENDPOINT_WRITE, PID_GLOBAL_TRAINER, TRAINER_INTERFACE, VID_GLOBAL_TRAINER,
};
use std::time::Duration;

pub const DEFAULT_MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_CHUNKS: usize = 65_536;

/// Settings for a single [`TrainerSession`](crate::trainer::TrainerSession).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub write_endpoint: u8,
    pub read_endpoint: u8,

    /// Applied to every bulk transfer. Zero waits forever.
    pub timeout: Duration,

    pub max_record_size: usize,
    pub max_chunks: usize,
}

impl SessionConfig {
    pub fn device(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_record_size(mut self, max_record_size: usize) -> Self {
        self.max_record_size = max_record_size;
        self
    }

    pub fn max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vendor_id: VID_GLOBAL_TRAINER,
            product_id: PID_GLOBAL_TRAINER,
            interface: TRAINER_INTERFACE,
            write_endpoint: ENDPOINT_WRITE,
            read_endpoint: ENDPOINT_READ,
            timeout: Duration::ZERO,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}
