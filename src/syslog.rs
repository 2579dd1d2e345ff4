// src/syslog.rs

//! Thin wrapper over syslog(3) for the `writer` binary.

use std::ffi::{CStr, CString};

/// Record severity, mapped onto the `LOG_*` priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Error,
    Info,
    Debug,
}

impl Priority {
    fn as_raw(self) -> libc::c_int {
        match self {
            Priority::Error => libc::LOG_ERR,
            Priority::Info => libc::LOG_INFO,
            Priority::Debug => libc::LOG_DEBUG,
        }
    }
}

/// Open connection to the system logger, closed on drop.
///
/// Uses `LOG_PID | LOG_NDELAY` and the `LOG_USER` facility.
#[derive(Debug)]
pub struct Syslog {
    _ident: &'static CStr,
}

impl Syslog {
    /// `ident` is kept by the C library for the life of the connection,
    /// hence the `'static` bound.
    pub fn open(ident: &'static CStr) -> Self {
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID | libc::LOG_NDELAY, libc::LOG_USER);
        }
        Self { _ident: ident }
    }

    pub fn log(&self, priority: Priority, message: &str) {
        let message = CString::new(message.replace('\0', "\\0")).unwrap_or_default();
        unsafe {
            libc::syslog(priority.as_raw(), c"%s".as_ptr(), message.as_ptr());
        }
    }
}

impl Drop for Syslog {
    fn drop(&mut self) {
        unsafe { libc::closelog() };
    }
}
