use clap::Parser;
use global_trainer_usb::config::{SessionConfig, DEFAULT_MAX_CHUNKS, DEFAULT_MAX_RECORD_SIZE};
use global_trainer_usb::{PID_GLOBAL_TRAINER, VID_GLOBAL_TRAINER};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Cli {
    /// Minimum log level to print out
    #[clap(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Enable libusb's own debug output
    #[clap(long)]
    pub usb_debug: bool,

    /// USB Vendor ID of the device, in hex [default: 0483]
    #[clap(long, value_parser = parse_hex_id)]
    pub vendor_id: Option<u16>,

    /// USB Product ID of the device, in hex [default: 5740]
    #[clap(long, value_parser = parse_hex_id)]
    pub product_id: Option<u16>,

    /// Timeout for each USB transfer in milliseconds, 0 waits forever
    #[clap(long, default_value = "0")]
    pub timeout_ms: u64,

    /// Stop downloading a record once it grows past this many bytes
    #[clap(long, default_value_t = DEFAULT_MAX_RECORD_SIZE)]
    pub max_record_size: usize,

    /// Stop downloading a record after this many chunks
    #[clap(long, default_value_t = DEFAULT_MAX_CHUNKS)]
    pub max_chunks: usize,

    /// Directory the downloaded files are written to
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Don't send the opening command sequence before fetching the record
    #[clap(long)]
    pub skip_handshake: bool,

    /// Print the samples in the record as JSON, one per line
    #[clap(long)]
    pub decode: bool,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .device(
                self.vendor_id.unwrap_or(VID_GLOBAL_TRAINER),
                self.product_id.unwrap_or(PID_GLOBAL_TRAINER),
            )
            .timeout(Duration::from_millis(self.timeout_ms))
            .max_record_size(self.max_record_size)
            .max_chunks(self.max_chunks)
    }
}

fn parse_hex_id(value: &str) -> Result<u16, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u16::from_str_radix(digits, 16).map_err(|e| format!("'{}' is not a hex id: {}", value, e))
}
