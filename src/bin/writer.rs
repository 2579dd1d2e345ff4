// src/bin/writer.rs

//! `writer <file> <string>`: write a string to a file, recording the action
//! in syslog under the `writer` identity.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sysexec::syslog::{Priority, Syslog};

#[derive(Debug, Parser)]
#[command(name = "writer", about = "Write a string to a file, logging to syslog.")]
struct WriterArgs {
    /// File to create or overwrite.
    writefile: PathBuf,

    /// Text to write.
    #[arg(allow_hyphen_values = true)]
    writestr: String,
}

fn main() -> ExitCode {
    let syslog = Syslog::open(c"writer");
    write_file(&syslog)
}

fn write_file(syslog: &Syslog) -> ExitCode {
    let given = std::env::args_os().count().saturating_sub(1);
    if given != 2 {
        syslog.log(
            Priority::Error,
            &format!(
                "Exactly 2 arguments are required, but {} {} given.",
                given,
                if given > 1 { "were" } else { "was" }
            ),
        );
        return ExitCode::FAILURE;
    }

    let args = match WriterArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            syslog.log(Priority::Error, &err.to_string());
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    if fs::write(&args.writefile, &args.writestr).is_err() {
        syslog.log(
            Priority::Error,
            &format!("Error opening file: {}", args.writefile.display()),
        );
        return ExitCode::FAILURE;
    }

    syslog.log(
        Priority::Info,
        &format!("Writing {} to {}", args.writestr, args.writefile.display()),
    );

    ExitCode::SUCCESS
}
