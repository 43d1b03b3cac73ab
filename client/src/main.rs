use anyhow::{Context, Result};
use clap::Parser;
use global_trainer_usb::dump::hex_dump;
use global_trainer_usb::rusb::LogLevel;
use global_trainer_usb::sample::decode_samples;
use global_trainer_usb::trainer::TrainerSession;
use global_trainer_usb::LibUsbBinding;
use log::{error, info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::fs;

use crate::cli::Cli;

mod cli;

const FIFTH_FILE: &str = "fifth_msg";
const RECORD_FILE: &str = "first_record";

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        args.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    let mut binding = LibUsbBinding::new()?;
    if args.usb_debug {
        binding = binding.with_log_level(LogLevel::Info);
    }

    let mut session = TrainerSession::connect(binding, args.session_config())
        .context("Unable to connect to the Global Trainer")?;

    if !args.skip_handshake {
        session.handshake();

        match session.fifth() {
            Ok(response) if !response.is_empty() => {
                let path = args.output_dir.join(FIFTH_FILE);
                fs::write(&path, &response)
                    .with_context(|| format!("Unable to write {}", path.display()))?;
                info!("Received {} bytes: \n{}", response.len(), hex_dump(&response));
            }
            Ok(_) => warn!("Fifth command returned no data"),
            Err(e) => error!("{}", e),
        }
    }

    let record = session
        .get_first_record()
        .context("Unable to request the first record")?;
    if let Some(e) = record.error() {
        warn!("Record is incomplete: {}", e);
    }

    let path = args.output_dir.join(RECORD_FILE);
    fs::write(&path, record.data())
        .with_context(|| format!("Unable to write {}", path.display()))?;
    info!("Wrote {} bytes to {}", record.len(), path.display());

    if args.decode {
        let (samples, trailing) = decode_samples(record.data())?;
        for sample in &samples {
            println!("{}", serde_json::to_string(sample)?);
        }
        if !trailing.is_empty() {
            warn!(
                "{} bytes at the end of the record don't form a full sample",
                trailing.len()
            );
        }
    }

    // Hand the interface back before we go.
    session.close();
    Ok(())
}
