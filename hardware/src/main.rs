//! Out-of-order RV32I core simulator CLI.
//!
//! Reads a textual memory image (from a file or standard input), simulates
//! until the HALT sentinel commits, and prints the low byte of `a0` as a
//! decimal number on stdout. Everything else (logging, statistics) goes to
//! stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::process;

use clap::Parser;

use riscv_ooo::config::Config;
use riscv_ooo::core::Cpu;
use riscv_ooo::sim::{self, loader};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate out-of-order RV32I core simulator")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Memory image file; standard input when omitted.
    #[arg(short, long)]
    file: Option<String>,

    /// Print the statistics report to stderr after HALT.
    #[arg(long)]
    stats: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config: Config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("failed to read config '{}': {}", path, e);
                process::exit(1);
            });
            toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("failed to parse config '{}': {}", path, e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let image = match &args.file {
        Some(path) => {
            let file = File::open(path).unwrap_or_else(|e| {
                eprintln!("failed to open image '{}': {}", path, e);
                process::exit(1);
            });
            loader::parse_image(BufReader::new(file))
        }
        None => loader::parse_image(io::stdin().lock()),
    };
    let image = image.unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let mut cpu = Cpu::new(&config, &image);
    match sim::run(&mut cpu, config.general.max_cycles) {
        Ok(value) => {
            println!("{}", value);
            if args.stats {
                cpu.stats.print();
            }
        }
        Err(e) => {
            eprintln!("fatal: {}", e);
            cpu.regs.dump();
            process::exit(1);
        }
    }
}
