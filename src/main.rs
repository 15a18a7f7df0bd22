use clap::Parser;
use sofia2hdf5::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
