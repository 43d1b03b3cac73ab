use crate::error::ConnectError;
use std::time::Duration;

// Whatever can hand us a handle to a device. Under normal use this is libusb, but the session
// doesn't care, which lets us drive it from a scripted transport too.
pub trait TransportBinding {
    type Transport: UsbTransport;

    fn open(&mut self, vendor_id: u16, product_id: u16)
        -> Result<Self::Transport, ConnectError>;
}

// An open device handle. Closing happens when it's dropped.
pub trait UsbTransport {
    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool, rusb::Error>;
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error>;
    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;
    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error>;

    fn reset(&mut self) -> Result<(), rusb::Error>;

    fn write_bulk(
        &mut self,
        endpoint: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error>;
}
