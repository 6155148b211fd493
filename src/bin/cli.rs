//! wirekv CLI Client
//!
//! Command-line interface for talking to a wirekv server.

use clap::{Parser, Subcommand};
use wirekv::{Client, WireError};

/// wirekv CLI
#[derive(Parser, Debug)]
#[command(name = "wirekv-cli")]
#[command(about = "CLI for the wirekv key-value protocol")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:4242")]
    server: String,

    /// Request timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the value stored under a key
    Get {
        /// The key to look up
        key: i32,
    },

    /// Store a value under a key
    Put {
        /// The key to store under
        key: i32,

        /// The value to store
        value: i32,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), WireError> {
    let mut client = Client::connect(&args.server)?;
    client.set_timeouts(args.timeout_ms, args.timeout_ms)?;

    match args.command {
        Commands::Get { key } => match client.get(key)? {
            Some(value) => println!("{}", value),
            None => println!("(no value)"),
        },
        Commands::Put { key, value } => {
            client.put(key, value)?;
            println!("ok");
        }
    }

    client.disconnect()
}
