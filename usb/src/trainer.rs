use crate::commands::Command;
use crate::config::SessionConfig;
use crate::device::base::{TransportBinding, UsbTransport};
use crate::device::libusb::device::LibUsbBinding;
use crate::error::{CommandError, ConnectError};
use crate::record::{Record, RecordAssembler};
use log::{debug, error, info, warn};

pub const READ_BUF_SIZE: usize = 2096;

/// An exclusive, synchronous connection to a Global Trainer.
///
/// The session starts out empty, is opened with [`open`](Self::open) and becomes usable once
/// [`claim`](Self::claim) succeeds. Whatever was acquired is handed back when the session is
/// closed or dropped, even if acquiring it only partially worked.
pub struct TrainerSession<B: TransportBinding = LibUsbBinding> {
    binding: B,
    config: SessionConfig,
    handle: Option<B::Transport>,

    interface_claimed: bool,
    detached_kernel: bool,

    read_buf: Vec<u8>,
}

impl<B: TransportBinding> TrainerSession<B> {
    pub fn new(binding: B, config: SessionConfig) -> Self {
        Self {
            binding,
            config,
            handle: None,
            interface_claimed: false,
            detached_kernel: false,
            read_buf: vec![0; READ_BUF_SIZE],
        }
    }

    /// Opens and claims the device in one go.
    pub fn connect(binding: B, config: SessionConfig) -> Result<Self, ConnectError> {
        let mut session = Self::new(binding, config);
        session.open()?;
        session.claim()?;
        Ok(session)
    }

    pub fn open(&mut self) -> Result<(), ConnectError> {
        if self.handle.is_some() {
            debug!("Device already open");
            return Ok(());
        }

        let handle = self
            .binding
            .open(self.config.vendor_id, self.config.product_id)?;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn claim(&mut self) -> Result<(), ConnectError> {
        let interface = self.config.interface;
        let handle = self.handle.as_mut().ok_or(ConnectError::NotOpen)?;

        match handle.kernel_driver_active(interface) {
            Ok(true) => {
                handle
                    .detach_kernel_driver(interface)
                    .map_err(ConnectError::KernelDriverDetach)?;
                self.detached_kernel = true;
                debug!("Detached kernel driver from interface {}", interface);
            }
            Ok(false) | Err(rusb::Error::NotSupported) => {}
            Err(error) => return Err(ConnectError::KernelDriverQuery(error)),
        }

        handle
            .claim_interface(interface)
            .map_err(ConnectError::DeviceNotClaimed)?;
        self.interface_claimed = true;

        info!("Claimed interface {}", interface);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_claimed(&self) -> bool {
        self.interface_claimed
    }

    pub fn has_detached_kernel_driver(&self) -> bool {
        self.detached_kernel
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Writes an arbitrary frame, and returns whatever the device answers with.
    pub fn send(&mut self, frame: &[u8]) -> Result<&[u8], CommandError> {
        let length = self.exchange("send", frame)?;
        Ok(self.received(length))
    }

    pub fn request_data(&mut self, command: Command) -> Result<Vec<u8>, CommandError> {
        let length = self.exchange(command.name(), command.frame())?;
        Ok(self.received(length).to_vec())
    }

    pub fn first(&mut self) -> Result<Vec<u8>, CommandError> {
        self.request_data(Command::First)
    }

    pub fn second(&mut self) -> Result<Vec<u8>, CommandError> {
        self.request_data(Command::Second)
    }

    pub fn third(&mut self) -> Result<Vec<u8>, CommandError> {
        self.request_data(Command::Third)
    }

    pub fn fourth(&mut self) -> Result<Vec<u8>, CommandError> {
        self.request_data(Command::Fourth)
    }

    pub fn fifth(&mut self) -> Result<Vec<u8>, CommandError> {
        self.request_data(Command::Fifth)
    }

    /// Runs the opening exchanges the official software sends before anything else. Their
    /// responses aren't understood yet, so failures are only logged.
    pub fn handshake(&mut self) {
        for command in [
            Command::First,
            Command::Second,
            Command::Third,
            Command::Fourth,
        ] {
            match self.request_data(command) {
                Ok(response) => debug!("{} returned {} bytes", command, response.len()),
                Err(error) => warn!("{}", error),
            }
        }
    }

    pub fn get_first_record(&mut self) -> Result<Record, CommandError> {
        RecordAssembler::from_config(&self.config).assemble(self, Command::GetFirstRecord)
    }

    // The read only happens if the whole frame made it out.
    pub(crate) fn exchange(
        &mut self,
        operation: &'static str,
        frame: &[u8],
    ) -> Result<usize, CommandError> {
        self.write(operation, frame)?;
        self.read(operation)
    }

    pub(crate) fn received(&self, length: usize) -> &[u8] {
        &self.read_buf[..length]
    }

    pub(crate) fn write(
        &mut self,
        operation: &'static str,
        frame: &[u8],
    ) -> Result<(), CommandError> {
        let endpoint = self.config.write_endpoint;
        let timeout = self.config.timeout;

        let handle = self.claimed_handle()?;
        let written = handle
            .write_bulk(endpoint, frame, timeout)
            .map_err(|error| {
                error!("Error writing {}: {}", operation, error);
                match error {
                    rusb::Error::Timeout => CommandError::Timeout { operation },
                    source => CommandError::Write { operation, source },
                }
            })?;

        debug!("{} wrote {}/{} bytes.", operation, written, frame.len());
        if written != frame.len() {
            return Err(CommandError::ShortWrite {
                operation,
                written,
                expected: frame.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn read(&mut self, operation: &'static str) -> Result<usize, CommandError> {
        if !self.interface_claimed {
            return Err(CommandError::NotClaimed);
        }
        let handle = self.handle.as_mut().ok_or(CommandError::NotClaimed)?;

        let length = handle
            .read_bulk(
                self.config.read_endpoint,
                &mut self.read_buf,
                self.config.timeout,
            )
            .map_err(|error| {
                error!("Error reading {}: {}", operation, error);
                match error {
                    rusb::Error::Timeout => CommandError::Timeout { operation },
                    source => CommandError::Read { operation, source },
                }
            })?;

        debug!("{} received {} bytes", operation, length);
        Ok(length)
    }

    fn claimed_handle(&mut self) -> Result<&mut B::Transport, CommandError> {
        if !self.interface_claimed {
            return Err(CommandError::NotClaimed);
        }
        self.handle.as_mut().ok_or(CommandError::NotClaimed)
    }

    /// Hands everything back to the system. Every step is attempted regardless of how the
    /// previous one went, and calling this more than once does nothing.
    pub fn close(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        let interface = self.config.interface;

        if self.interface_claimed {
            if let Err(error) = handle.release_interface(interface) {
                error!("Error releasing interface: {}", error);
            }
            self.interface_claimed = false;
        }

        if self.detached_kernel {
            if let Err(error) = handle.attach_kernel_driver(interface) {
                error!("Error reattaching kernel driver: {}", error);
            }
            self.detached_kernel = false;
        }

        // The device may well have gone away already, that's fine.
        match handle.reset() {
            Ok(()) | Err(rusb::Error::NotFound) => {}
            Err(error) => error!("Error resetting USB device: {}", error),
        }

        drop(handle);
        debug!("Closed Global Trainer handle");
    }
}

impl<B: TransportBinding> Drop for TrainerSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
