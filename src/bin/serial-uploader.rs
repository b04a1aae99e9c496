//! Uploads a configuration file to a network switch over its serial console.
//!
//! The configuration file is read before the serial device is touched, so a
//! bad path fails without anything being sent.  If `--user` is given the
//! password is prompted for on the terminal, without echo, before the
//! serial device is opened.
//!
//! Progress is logged to stderr and can be controlled via the `RUST_LOG`
//! environment variable (default `info`).
//!
//! Exits with 0 on success, otherwise with the errno equivalent of the
//! failure (for example `ENOENT` for a missing file or device, `EACCES` for a
//! permissions problem, `ETIMEDOUT` if the switch stopped answering).
use serial_uploader::constants::{DEFAULT_BAUD_RATE, DEFAULT_SERIAL_DEVICE};
use serial_uploader::password::prompt_password;
use serial_uploader::{upload, ConsoleBuilder, Error, UploadOptions, UploadReport};

use clap::Parser;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::path::PathBuf;
use std::time::Duration;

/// Simple serial console switch configuration uploader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to upload, one console command per line
    #[arg(short, long)]
    config_file: PathBuf,

    /// Serial device the switch console is attached to
    #[arg(short, long, default_value = DEFAULT_SERIAL_DEVICE)]
    serial_device_path: PathBuf,

    /// Username to log in with.  The password is prompted for.
    #[arg(short, long)]
    user: Option<String>,

    /// TOML switch profile with prompt patterns and timings
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,

    /// Pause between configuration lines, in milliseconds.  Overrides the
    /// profile.
    #[arg(long)]
    line_delay_ms: Option<u64>,
}

fn execute(args: Args) -> Result<UploadReport, Error> {
    let options = UploadOptions {
        config_file: args.config_file,
        profile: args.profile,
        user: args.user,
        line_delay: args.line_delay_ms.map(Duration::from_millis),
    };

    let serial_device_path = args.serial_device_path;
    let baud_rate = args.baud_rate;
    upload(
        &options,
        || prompt_password("Password: "),
        |profile| {
            ConsoleBuilder::new()
                .path(&serial_device_path)
                .baud_rate(baud_rate)
                .profile(profile)
                .build()
        },
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("{args:?}");

    match execute(args) {
        Ok(report) => {
            println!(
                "DONE!! Uploaded {} lines in {:.1} seconds",
                report.lines_sent,
                report.elapsed.as_secs_f64()
            );
            std::process::exit(0)
        }
        Err(e) => {
            // Use our own eprintln so our Error display is used
            error!("Upload failed");
            eprintln!("{e}");
            std::process::exit(e.to_errno());
        }
    }
}
