use anyhow::{Context, Result};
use clap::Parser;

use cm17a_proto::io::{Outcome, Sender, StdTimer};
use cm17a_proto::serial::{PortName, SerialLines};
use cm17a_proto::{parse, Command, Frame, LineState};

/// Send X-10 commands through a CM17A transceiver.
#[derive(Parser, Debug)]
#[command(name = "cm17a")]
struct Args {
    /// Serial port of the CM17A, a COM port number or a device path
    port: PortName,

    /// Commands to send, e.g. A1ON B2OFF ADIM ABRIGHT
    #[arg(required = true)]
    commands: Vec<String>,

    /// Print the frame and line states of each command instead of sending it
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn print_frame(command: &Command) {
    let frame = Frame::new(command.encode());
    let states: String = frame.transmission().map(LineState::symbol).collect();
    println!("{}: {}", command, frame);
    println!("  {}", states);
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.dry_run {
        for token in &args.commands {
            match parse(token) {
                Ok(command) => print_frame(&command),
                Err(_) => println!("{} is an invalid command.", token),
            }
        }
        return Ok(());
    }

    let port = &args.port;
    let mut sender = Sender::new(
        || SerialLines::open(port).map_err(std::io::Error::from),
        StdTimer::new(),
    );
    for token in &args.commands {
        let outcome = sender
            .send_token(token)
            .with_context(|| format!("Failed to send {} on {}", token, port))?;
        if let Outcome::Invalid(_) = outcome {
            println!("{} is an invalid command.", token);
        }
    }
    Ok(())
}
