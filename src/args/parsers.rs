use std::net::SocketAddr;
use std::time::Duration;

use super::types::PositiveU32;
use crate::config::{
    parse_addr, parse_duration_value, parse_load_duration, parse_positive_duration,
};
use crate::error::ValidationError;

pub(super) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_duration_value(s)
}

pub(super) fn parse_positive_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_positive_duration(s)
}

pub(super) fn parse_load_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_load_duration(s)
}

pub(super) fn parse_addr_arg(s: &str) -> Result<SocketAddr, ValidationError> {
    parse_addr(s)
}

pub(super) fn parse_positive_u32(s: &str) -> Result<PositiveU32, ValidationError> {
    s.parse::<PositiveU32>()
}
