// Code generated by constmsg. DO NOT EDIT.

#[allow(unused_imports)]
use {{ package }}::*;

/// Message returned by [`get_msg`] for codes without a description.
pub const UNKNOWN_MSG: &str = "{{ unknown_msg }}";

/// Known codes and their descriptions.
pub const MESSAGES: &[({{ value_type }}, &str)] = &[
{%- for entry in entries %}
({{ entry.key }}, "{{ entry.description }}"),
{%- endfor %}
];

/// Returns the description of `code`, or [`UNKNOWN_MSG`] if it has none.
pub fn get_msg(code: {{ value_type }}) -> &'static str {
MESSAGES.iter().find(|(known, _)| *known == code).map_or(UNKNOWN_MSG, |&(_, msg)| msg)
}
