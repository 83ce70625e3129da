//! Status codes returned by the example service.

use std::fmt;

/// Base of the client error range.
const CLIENT_BASE: i32 = 400;

// ErrParams err params
pub const ErrParams: i32 = CLIENT_BASE;
// ErrNotFound resource not found
pub const ErrNotFound: i32 = CLIENT_BASE + 4;

pub const ErrServer: i32 = 500; // ErrServer Internal Server Error

// counter, not a code
pub static mut REQUESTS: u64 = 0;

/* ErrTimeout upstream	timed
out */
pub const ErrTimeout: i32 = 504;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    /// Ok everything is fine
    Ok = 200,
    // Created the resource was created
    Created = 201,
    Accepted = 202, // Accepted queued for processing
    /// not a unit variant
    Redirect(u16),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

pub fn is_client_error(code: i32) -> bool {
    (400..500).contains(&code)
}

macro_rules! codes {
    ($($name:ident),*) => { [$($name),*] };
}

pub const ALL: [i32; 4] = codes![ErrParams, ErrNotFound, ErrServer, ErrTimeout];
