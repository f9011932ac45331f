//! Protocol module - line framing for command envelopes
//!
//! One JSON envelope per `\n`-terminated line. The envelope shape itself is
//! defined in the types crate; this module only frames and unframes it.

use crate::types::CommandEnvelope;

/// Parse one line from the stream.
///
/// Blank lines yield `Ok(None)`. A trailing `\r` is tolerated.
pub fn parse_line(line: &str) -> Result<Option<CommandEnvelope>, serde_json::Error> {
    let trimmed = line.trim_end_matches(['\n', '\r']).trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Encode an envelope as a single line, without the terminator.
pub fn encode_line(envelope: &CommandEnvelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(envelope)
}

/// Append an envelope plus `\n` to `out`. `out` is left untouched on error.
pub fn encode_into(envelope: &CommandEnvelope, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    let start = out.len();
    if let Err(e) = serde_json::to_writer(&mut *out, envelope) {
        out.truncate(start);
        return Err(e);
    }
    out.push(b'\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommandType, GridPos};

    #[test]
    fn test_parse_put_road() {
        let env = parse_line(r#"{"type":"PUT_ROAD","value":{"x":1,"y":2}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(env.command_type, CommandType::PutRoad);
        assert_eq!(env.position().unwrap().unwrap(), GridPos::new(1, 2));
    }

    #[test]
    fn test_parse_treasure_with_target() {
        let env = parse_line("{\"type\":\"TEST_TREASURE\",\"target\":\"SPARKLE\"}\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(env.command_type, CommandType::TestTreasure);
        assert_eq!(env.target.as_deref(), Some("SPARKLE"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   \r\n").unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_line("{\"type\":").is_err());
        assert!(parse_line("{\"value\":{\"x\":1}}").is_err());
    }

    #[test]
    fn test_unknown_type_still_parses() {
        let env = parse_line(r#"{"type":"MOVE_KNIGHT","value":{"x":0,"y":0}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(env.command_type, CommandType::Unrecognized);
    }

    #[test]
    fn test_encode_into_appends_line() {
        let mut buf = Vec::new();
        encode_into(&CommandEnvelope::remove_road(), &mut buf).unwrap();
        encode_into(&CommandEnvelope::put_road(GridPos::new(3, 4)), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], encode_line(&CommandEnvelope::remove_road()).unwrap());
        let back = parse_line(lines[1]).unwrap().unwrap();
        assert_eq!(back, CommandEnvelope::put_road(GridPos::new(3, 4)));
    }
}
