//! Parser for SocketCAN `candump` text output.
//!
//! Two renderings are understood:
//!
//! ```text
//! (1600000000.123456) can0 264#0102030405060708        candump -l / -L
//!   can0  264   [8]  01 02 03 04 05 06 07 08           candump (screen)
//! ```
//!
//! The screen rendering may also carry a leading `(timestamp)` when recorded
//! with `-t a`.

use thiserror::Error;

const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;
const MAX_CLASSIC_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandumpError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid CAN identifier: {0}")]
    InvalidId(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Length mismatch: declared {declared}, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Unsupported frame: {0}")]
    Unsupported(&'static str),
}

/// One received classic CAN frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CanRecord {
    pub timestamp: Option<f64>,
    pub interface: String,
    pub id: u32,
    pub data: Vec<u8>,
}

/// Parse a single line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<CanRecord>, CandumpError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace().peekable();

    let timestamp = if matches!(tokens.peek(), Some(token) if token.starts_with('(')) {
        Some(parse_timestamp(tokens.next().unwrap_or_default())?)
    } else {
        None
    };

    let interface = tokens
        .next()
        .ok_or(CandumpError::MissingField("interface"))?
        .to_string();

    let frame = tokens.next().ok_or(CandumpError::MissingField("frame"))?;

    let (id, data) = match frame.split_once('#') {
        Some((id, payload)) => (parse_id(id)?, parse_compact_payload(payload)?),
        None => {
            let id = parse_id(frame)?;
            let declared = parse_dlc(tokens.next().ok_or(CandumpError::MissingField("length"))?)?;
            let data = tokens
                .take_while(|token| !token.starts_with('\''))
                .map(parse_byte)
                .collect::<Result<Vec<_>, _>>()?;
            if data.len() != declared {
                return Err(CandumpError::LengthMismatch {
                    declared,
                    actual: data.len(),
                });
            }
            (id, data)
        }
    };

    Ok(Some(CanRecord {
        timestamp,
        interface,
        id,
        data,
    }))
}

fn parse_timestamp(token: &str) -> Result<f64, CandumpError> {
    token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| CandumpError::InvalidTimestamp(token.to_string()))
}

fn parse_id(token: &str) -> Result<u32, CandumpError> {
    match u32::from_str_radix(token, 16) {
        Ok(id) if !token.is_empty() && token.len() <= 8 && id <= MAX_EXTENDED_ID => Ok(id),
        _ => Err(CandumpError::InvalidId(token.to_string())),
    }
}

fn parse_dlc(token: &str) -> Result<usize, CandumpError> {
    token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .and_then(|t| t.parse::<usize>().ok())
        .filter(|len| *len <= MAX_CLASSIC_LEN)
        .ok_or_else(|| CandumpError::InvalidData(token.to_string()))
}

fn parse_byte(token: &str) -> Result<u8, CandumpError> {
    if token.len() != 2 {
        return Err(CandumpError::InvalidData(token.to_string()));
    }
    u8::from_str_radix(token, 16).map_err(|_| CandumpError::InvalidData(token.to_string()))
}

fn parse_compact_payload(payload: &str) -> Result<Vec<u8>, CandumpError> {
    if payload.starts_with('#') {
        return Err(CandumpError::Unsupported("CAN FD"));
    }
    if payload.starts_with('R') || payload.starts_with('r') {
        return Err(CandumpError::Unsupported("remote request"));
    }

    let digits: Vec<u8> = payload.bytes().filter(|b| *b != b'.').collect();
    if digits.len() % 2 != 0 {
        return Err(CandumpError::InvalidData(payload.to_string()));
    }

    let data = digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| CandumpError::InvalidData(payload.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if data.len() > MAX_CLASSIC_LEN {
        return Err(CandumpError::Unsupported("payload longer than 8 bytes"));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_format() {
        let record = parse_line("(1600000000.123456) can0 264#0102030405060708")
            .unwrap()
            .unwrap();
        assert_eq!(record.timestamp, Some(1600000000.123456));
        assert_eq!(record.interface, "can0");
        assert_eq!(record.id, 0x264);
        assert_eq!(record.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn parses_screen_format() {
        let record = parse_line("  vcan1  25B   [8]  00 10 00 A0 00 00 C0 F8")
            .unwrap()
            .unwrap();
        assert_eq!(record.timestamp, None);
        assert_eq!(record.interface, "vcan1");
        assert_eq!(record.id, 0x25B);
        assert_eq!(record.data, vec![0x00, 0x10, 0x00, 0xA0, 0x00, 0x00, 0xC0, 0xF8]);
    }

    #[test]
    fn parses_screen_format_with_timestamp_and_ascii() {
        let record = parse_line(" (1600000000.5)  can0  264   [2]  41 42   'AB'")
            .unwrap()
            .unwrap();
        assert_eq!(record.timestamp, Some(1600000000.5));
        assert_eq!(record.data, vec![0x41, 0x42]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# recorded on the bench"), Ok(None));
    }

    #[test]
    fn accepts_dotted_payload_and_extended_ids() {
        let record = parse_line("can0 1ABCDEF0#01.02.03").unwrap().unwrap();
        assert_eq!(record.id, 0x1ABC_DEF0);
        assert_eq!(record.data, vec![1, 2, 3]);
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(
            parse_line("can0"),
            Err(CandumpError::MissingField("frame"))
        );
        assert_eq!(
            parse_line("can0 XYZ#00"),
            Err(CandumpError::InvalidId("XYZ".into()))
        );
        assert_eq!(
            parse_line("can0 264#123"),
            Err(CandumpError::InvalidData("123".into()))
        );
        assert_eq!(
            parse_line("can0 264 [3] 01 02"),
            Err(CandumpError::LengthMismatch {
                declared: 3,
                actual: 2
            })
        );
        assert!(matches!(
            parse_line("(abc) can0 264#00"),
            Err(CandumpError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn rejects_fd_and_remote_frames() {
        assert_eq!(
            parse_line("can0 264##1000102"),
            Err(CandumpError::Unsupported("CAN FD"))
        );
        assert_eq!(
            parse_line("can0 264#R"),
            Err(CandumpError::Unsupported("remote request"))
        );
    }
}
