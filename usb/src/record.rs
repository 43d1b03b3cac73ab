use crate::commands::{is_terminator, Command, ResponseShape};
use crate::config::SessionConfig;
use crate::device::base::TransportBinding;
use crate::error::CommandError;
use crate::trainer::TrainerSession;
use log::{debug, info, warn};

/// The bytes of a record, and whether the device got to finish sending it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    data: Vec<u8>,
    chunks: usize,
    error: Option<CommandError>,
}

impl Record {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Every non-terminal response received, empty and failed reads included.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// False when the transfer stopped before the terminator arrived.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&CommandError> {
        self.error.as_ref()
    }
}

pub struct RecordAssembler {
    max_record_size: usize,
    max_chunks: usize,
}

impl RecordAssembler {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            max_record_size: config.max_record_size,
            max_chunks: config.max_chunks,
        }
    }

    /// Sends `start`, then keeps asking for the next chunk until the device answers with a
    /// terminator. A chunk that fails to arrive counts as an empty one and the transfer carries
    /// on. Once the start command is through, a failed write or a hit limit stops the transfer
    /// but everything gathered so far is still returned.
    pub fn assemble<B: TransportBinding>(
        &self,
        session: &mut TrainerSession<B>,
        start: Command,
    ) -> Result<Record, CommandError> {
        debug_assert_eq!(start.response_shape(), ResponseShape::Record);

        let continuation = Command::ContinueRecord;
        let mut data = Vec::new();
        let mut chunks = 0;

        session.write(start.name(), start.frame())?;
        let mut length = read_chunk(session, start.name());
        let error = loop {
            let chunk = session.received(length);
            if is_terminator(chunk) {
                break None;
            }

            if chunks == self.max_chunks {
                break Some(CommandError::TooManyChunks {
                    limit: self.max_chunks,
                });
            }
            if data.len() + chunk.len() > self.max_record_size {
                break Some(CommandError::RecordTooLarge {
                    limit: self.max_record_size,
                });
            }
            data.extend_from_slice(chunk);
            chunks += 1;

            debug!("{} chunk {} held {} bytes", start, chunks, length);
            if let Err(error) = session.write(continuation.name(), continuation.frame()) {
                break Some(error);
            }
            length = read_chunk(session, continuation.name());
        };

        match &error {
            None => info!("Got a whole record of {} bytes.", data.len()),
            Some(error) => warn!(
                "Record transfer stopped after {} bytes: {}",
                data.len(),
                error
            ),
        }

        Ok(Record {
            data,
            chunks,
            error,
        })
    }
}

// The session has already logged the failure, all that's left is an empty chunk.
fn read_chunk<B: TransportBinding>(
    session: &mut TrainerSession<B>,
    operation: &'static str,
) -> usize {
    session.read(operation).unwrap_or_else(|error| {
        debug!("Treating failed {} read as an empty chunk: {}", operation, error);
        0
    })
}
