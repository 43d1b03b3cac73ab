use strum::{Display, EnumIter, IntoStaticStr};

/// Sent by the device once a record has no more chunks to deliver.
pub const TERMINATOR: [u8; 4] = [0x8A, 0x00, 0x00, 0x00];

// Every frame here was lifted from captured traffic. The trailing bytes look like a checksum,
// but nothing we have lets us derive them, so they're kept as literals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    GetFirstRecord,
    ContinueRecord,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ResponseShape {
    /// At most one chunk comes back.
    Single,

    /// Chunks keep coming, one per continuation, until a terminator.
    Record,
}

impl Command {
    pub fn frame(&self) -> &'static [u8] {
        match self {
            Command::First => &[0x02, 0x02, 0x00, 0x42, 0x01, 0x41],
            Command::Second => &[0x02, 0x01, 0x00, 0xBF, 0xBE],
            Command::Third => &[0x02, 0x01, 0x00, 0x85, 0x84],
            Command::Fourth => &[0x02, 0x01, 0x00, 0x44, 0x45],
            Command::Fifth => &[0x02, 0x01, 0x00, 0x78, 0x79],
            Command::GetFirstRecord => &[0x02, 0x05, 0x00, 0x80, 0x01, 0x00, 0x00, 0x00, 0x84],
            Command::ContinueRecord => &[0x02, 0x01, 0x00, 0x81, 0x80],
        }
    }

    pub(crate) fn response_shape(&self) -> ResponseShape {
        match self {
            Command::GetFirstRecord | Command::ContinueRecord => ResponseShape::Record,
            _ => ResponseShape::Single,
        }
    }

    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}

pub fn is_terminator(chunk: &[u8]) -> bool {
    chunk == TERMINATOR
}
