use crate::device::base::{TransportBinding, UsbTransport};
use crate::error::ConnectError;
use log::{debug, info};
use rusb::{Context, DeviceHandle, LogLevel, UsbContext};
use std::time::Duration;

pub struct LibUsbBinding {
    context: Context,
}

impl LibUsbBinding {
    pub fn new() -> Result<Self, ConnectError> {
        let context = Context::new().map_err(ConnectError::LibraryInit)?;
        Ok(Self { context })
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.context.set_log_level(level);
        self
    }
}

impl TransportBinding for LibUsbBinding {
    type Transport = LibUsbTransport<Context>;

    fn open(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Self::Transport, ConnectError> {
        debug!("Looking for {:04x}:{:04x}", vendor_id, product_id);
        let handle = self
            .context
            .open_device_with_vid_pid(vendor_id, product_id)
            .ok_or(ConnectError::DeviceNotFound {
                vendor_id,
                product_id,
            })?;

        info!("Connected to Global Trainer at {:?}", handle.device());
        Ok(LibUsbTransport { handle })
    }
}

pub struct LibUsbTransport<T: UsbContext> {
    handle: DeviceHandle<T>,
}

impl<T: UsbContext> UsbTransport for LibUsbTransport<T> {
    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool, rusb::Error> {
        self.handle.kernel_driver_active(interface)
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.detach_kernel_driver(interface)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.attach_kernel_driver(interface)
    }

    fn claim_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.claim_interface(interface)
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), rusb::Error> {
        self.handle.release_interface(interface)
    }

    fn reset(&mut self) -> Result<(), rusb::Error> {
        self.handle.reset()
    }

    fn write_bulk(
        &mut self,
        endpoint: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.handle.write_bulk(endpoint, data, timeout)
    }

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.handle.read_bulk(endpoint, buf, timeout)
    }
}
