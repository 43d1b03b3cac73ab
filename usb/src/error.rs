#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("Unable to initialise libusb: {0}")]
    LibraryInit(rusb::Error),

    #[error("No Global Trainer device was found at {vendor_id:04x}:{product_id:04x}")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("No device has been opened")]
    NotOpen,

    #[error("Unable to query the kernel driver state: {0}")]
    KernelDriverQuery(rusb::Error),

    #[error("Unable to detach the kernel driver: {0}")]
    KernelDriverDetach(rusb::Error),

    #[error("Unable to claim USB interface: {0}")]
    DeviceNotClaimed(rusb::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Error writing {operation}: {source}")]
    Write {
        operation: &'static str,
        source: rusb::Error,
    },

    #[error("Error reading {operation}: {source}")]
    Read {
        operation: &'static str,
        source: rusb::Error,
    },

    #[error("{operation} only wrote {written}/{expected} bytes")]
    ShortWrite {
        operation: &'static str,
        written: usize,
        expected: usize,
    },

    #[error("Timed out waiting on {operation}")]
    Timeout { operation: &'static str },

    #[error("The USB interface has not been claimed")]
    NotClaimed,

    #[error("Record exceeded the maximum size of {limit} bytes")]
    RecordTooLarge { limit: usize },

    #[error("Record exceeded the maximum of {limit} chunks")]
    TooManyChunks { limit: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Sample truncated, expected {expected} bytes but only {actual} available")]
    Truncated { expected: usize, actual: usize },

    #[error("Malformed sample data")]
    Malformed(#[from] std::io::Error),
}
