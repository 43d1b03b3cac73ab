pub use rusb;
pub mod commands;
pub mod config;
pub mod dump;
pub mod error;
pub mod record;
pub mod sample;
pub mod trainer;

mod device;

pub use device::base::{TransportBinding, UsbTransport};
pub use device::libusb::device::{LibUsbBinding, LibUsbTransport};

pub const VID_GLOBAL_TRAINER: u16 = 0x0483;
pub const PID_GLOBAL_TRAINER: u16 = 0x5740;

pub const TRAINER_INTERFACE: u8 = 1;
pub const ENDPOINT_WRITE: u8 = 0x03;
pub const ENDPOINT_READ: u8 = 0x81;
