//! Formatting and matching helpers shared by queries and rules
//!
//! These are plain functions over plain values. The query engine exposes each of them
//! as a named method, and the built-in rules call them directly.

mod format;
mod network;
mod pattern;
mod plural;

pub use format::{file_ext, format_date, format_duration, format_size, js_number, percent_from, to_fixed, to_number};
pub use network::{BYTES_IN_MBIT, NETWORK_TYPES, NetworkType, download_time, network_type, network_type_name};
pub use pattern::{Pattern, exclude, is_match};
pub use plural::{plural, plural_rus, plural_with_value, plural_with_value_rus};
