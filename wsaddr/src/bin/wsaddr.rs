use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wsaddr::*;

/// Per-workspace loopback addresses
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the loopback address of each workspace (name or path)
    Ip {
        #[arg(required = true, value_parser = clap::value_parser!(OsString))]
        names:  Vec<OsString>,

        /// Print the command that provisions the address on `lo` instead
        #[arg(long)]
        lo_cmd: bool,
    },
    /// Run workspace detection against this process's environment and cwd
    Detect,
}

fn main() -> Result<()> {
    let cli = Args::parse();
    match cli.cmd {
        Cmd::Ip { names, lo_cmd } => {
            for name in names {
                let raw = name.as_bytes();
                let ip = address_of(last_path_component(raw))
                    .with_context(|| format!("cannot map {:?}", name))?;
                if lo_cmd {
                    println!("ip addr add {}/8 dev lo", ip);
                } else {
                    println!("{}", ip);
                }
            }
        },
        Cmd::Detect => {
            let source = ProcessEnv;
            let detection = detect(&Toggles::read(&source), &source);
            match detection.context.address() {
                Some(ip)    => println!("active {} ({})", ip, detection.source),
                None        => println!("inactive ({})", detection.source),
            }
        },
    }

    Ok(())
}
