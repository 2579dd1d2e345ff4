#![allow(dead_code)]

use sysexec::exec::ArgumentVector;

/// Build an argument vector from string literals.
pub fn argv(items: &[&str]) -> ArgumentVector {
    ArgumentVector::try_from(items).expect("valid argument vector")
}

/// Path to the `writer` binary built alongside the tests.
pub fn writer_bin() -> &'static str {
    env!("CARGO_BIN_EXE_writer")
}

/// Path to the `sysexec` binary built alongside the tests.
pub fn sysexec_bin() -> &'static str {
    env!("CARGO_BIN_EXE_sysexec")
}
