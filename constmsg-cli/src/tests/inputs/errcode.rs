//! Error codes returned by the example service.

// ErrParams err params
pub const ErrParams: i32 = 400;
// ErrNotFound resource not found
pub const ErrNotFound: i32 = 404;
/// ErrServer Internal Server Error
pub const ErrServer: i32 = 500;

// LAST_ERROR the most recent code, not a constant
pub static mut LAST_ERROR: i32 = 0;
