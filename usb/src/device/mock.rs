use crate::commands::TERMINATOR;
use crate::device::base::{TransportBinding, UsbTransport};
use crate::error::ConnectError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened,
    KernelDriverQuery,
    Detach,
    Attach,
    Claim,
    Release,
    Reset,
    Write(Vec<u8>),
    Read,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub enum WriteOutcome {
    Full,
    Short(usize),
    Fail(rusb::Error),
}

#[derive(Debug)]
pub struct Script {
    pub device_present: bool,
    pub kernel_driver_active: Result<bool, rusb::Error>,
    pub detach: Result<(), rusb::Error>,
    pub attach: Result<(), rusb::Error>,
    pub claim: Result<(), rusb::Error>,
    pub release: Result<(), rusb::Error>,
    pub reset: Result<(), rusb::Error>,

    // Consumed front to back, an empty queue writes in full / answers with a terminator.
    pub writes: VecDeque<WriteOutcome>,
    pub reads: VecDeque<Result<Vec<u8>, rusb::Error>>,

    pub events: Vec<Event>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            device_present: true,
            kernel_driver_active: Ok(false),
            detach: Ok(()),
            attach: Ok(()),
            claim: Ok(()),
            release: Ok(()),
            reset: Ok(()),
            writes: VecDeque::new(),
            reads: VecDeque::new(),
            events: Vec::new(),
        }
    }
}

impl Script {
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Write(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }
}

pub type SharedScript = Rc<RefCell<Script>>;

pub struct MockBinding {
    script: SharedScript,
}

impl MockBinding {
    pub fn new(script: Script) -> (Self, SharedScript) {
        let script = Rc::new(RefCell::new(script));
        (
            Self {
                script: script.clone(),
            },
            script,
        )
    }
}

impl TransportBinding for MockBinding {
    type Transport = MockTransport;

    fn open(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Self::Transport, ConnectError> {
        let mut script = self.script.borrow_mut();
        if !script.device_present {
            return Err(ConnectError::DeviceNotFound {
                vendor_id,
                product_id,
            });
        }

        script.events.push(Event::Opened);
        Ok(MockTransport {
            script: self.script.clone(),
        })
    }
}

pub struct MockTransport {
    script: SharedScript,
}

impl MockTransport {
    fn record(&self, event: Event) {
        self.script.borrow_mut().events.push(event);
    }
}

impl UsbTransport for MockTransport {
    fn kernel_driver_active(&mut self, _interface: u8) -> Result<bool, rusb::Error> {
        self.record(Event::KernelDriverQuery);
        self.script.borrow().kernel_driver_active
    }

    fn detach_kernel_driver(&mut self, _interface: u8) -> Result<(), rusb::Error> {
        self.record(Event::Detach);
        self.script.borrow().detach
    }

    fn attach_kernel_driver(&mut self, _interface: u8) -> Result<(), rusb::Error> {
        self.record(Event::Attach);
        self.script.borrow().attach
    }

    fn claim_interface(&mut self, _interface: u8) -> Result<(), rusb::Error> {
        self.record(Event::Claim);
        self.script.borrow().claim
    }

    fn release_interface(&mut self, _interface: u8) -> Result<(), rusb::Error> {
        self.record(Event::Release);
        self.script.borrow().release
    }

    fn reset(&mut self) -> Result<(), rusb::Error> {
        self.record(Event::Reset);
        self.script.borrow().reset
    }

    fn write_bulk(
        &mut self,
        _endpoint: u8,
        data: &[u8],
        _timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.record(Event::Write(data.to_vec()));
        let outcome = self
            .script
            .borrow_mut()
            .writes
            .pop_front()
            .unwrap_or(WriteOutcome::Full);

        match outcome {
            WriteOutcome::Full => Ok(data.len()),
            WriteOutcome::Short(written) => Ok(written),
            WriteOutcome::Fail(error) => Err(error),
        }
    }

    fn read_bulk(
        &mut self,
        _endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.record(Event::Read);
        let chunk = self
            .script
            .borrow_mut()
            .reads
            .pop_front()
            .unwrap_or_else(|| Ok(TERMINATOR.to_vec()))?;

        let length = chunk.len().min(buf.len());
        buf[..length].copy_from_slice(&chunk[..length]);
        Ok(length)
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.record(Event::Closed);
    }
}
