// Code generated by constmsg. DO NOT EDIT.

#[allow(unused_imports)]
use super::*;

/// Message returned by [`get_msg`] for codes without a description.
pub const UNKNOWN_MSG: &str = "unknown error";

/// Known codes and their descriptions.
pub const MESSAGES: &[(i32, &str)] = &[
    (Code::ErrParams as i32, "err params"),
    (Code::ErrServer as i32, "Internal Server Error"),
];

/// Returns the description of `code`, or [`UNKNOWN_MSG`] if it has none.
pub fn get_msg(code: i32) -> &'static str {
    MESSAGES.iter().find(|(known, _)| *known == code).map_or(UNKNOWN_MSG, |&(_, msg)| msg)
}
