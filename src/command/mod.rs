//! Decoding of inbound control payloads into commands
//!
//! Color payloads are accepted in two shapes, tried in order:
//! - a JSON object with `r`/`red`, `g`/`green`, `b`/`blue` keys
//! - the legacy `R,G,B` text
//!
//! Power payloads are the plain text `ON` or `OFF`.

use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::strip::{clamp_channel, Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetColor(Color),
    SetPower(bool),
}

/// Which logical channel a payload arrived on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Color,
    Power,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed payload {0:?}")]
    Malformed(String),
}

impl ParseError {
    fn malformed(payload: &[u8]) -> Self {
        ParseError::Malformed(String::from_utf8_lossy(payload).into_owned())
    }
}

type ColorStrategy = fn(&str) -> Option<Color>;

/// Color payload formats, in the order they are attempted
const COLOR_STRATEGIES: [(&str, ColorStrategy); 2] =
    [("json", parse_json_color), ("csv", parse_csv_color)];

pub fn parse(payload: &[u8], kind: ChannelKind) -> Result<Command, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|_| ParseError::malformed(payload))?;

    match kind {
        ChannelKind::Color => parse_color(text),
        ChannelKind::Power => parse_power(text),
    }
    .ok_or_else(|| ParseError::malformed(payload))
}

fn parse_color(text: &str) -> Option<Command> {
    COLOR_STRATEGIES.iter().find_map(|(name, strategy)| {
        let color = strategy(text)?;
        log::trace!("Color payload decoded as {}", name);
        Some(Command::SetColor(color))
    })
}

fn parse_power(text: &str) -> Option<Command> {
    match text {
        "ON" => Some(Command::SetPower(true)),
        "OFF" => Some(Command::SetPower(false)),
        _ => None,
    }
}

fn parse_json_color(text: &str) -> Option<Color> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    Some(Color::new(
        json_channel(object, "r", "red")?,
        json_channel(object, "g", "green")?,
        json_channel(object, "b", "blue")?,
    ))
}

/// A missing channel is 0; a channel that is present but not a number fails
/// the whole object
fn json_channel(object: &Map<String, Value>, short: &str, long: &str) -> Option<u8> {
    let value = match object.get(short).or_else(|| object.get(long)) {
        Some(value) => value,
        None => return Some(0),
    };

    if let Some(value) = value.as_i64() {
        Some(clamp_channel(value))
    } else if value.as_u64().is_some() {
        Some(u8::MAX)
    } else {
        value.as_f64().map(|value| clamp_channel(value as i64))
    }
}

fn parse_csv_color(text: &str) -> Option<Color> {
    let mut channels = text.split(',').map(csv_channel);

    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    if channels.next().is_some() {
        return None;
    }

    Some(Color::clamped(r, g, b))
}

/// Integers too large for an i64 saturate so they still clamp
fn csv_channel(part: &str) -> Option<i64> {
    match part.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(payload: &str) -> Result<Command, ParseError> {
        parse(payload.as_bytes(), ChannelKind::Color)
    }

    fn power(payload: &str) -> Result<Command, ParseError> {
        parse(payload.as_bytes(), ChannelKind::Power)
    }

    #[test]
    fn test_all_color_formats_agree() {
        let expected = Ok(Command::SetColor(Color::new(10, 20, 30)));

        assert_eq!(color(r#"{"red":10,"green":20,"blue":30}"#), expected);
        assert_eq!(color(r#"{"r":10,"g":20,"b":30}"#), expected);
        assert_eq!(color("10,20,30"), expected);
    }

    #[test]
    fn test_csv_clamps() {
        assert_eq!(
            color("-5,300,10"),
            Ok(Command::SetColor(Color::new(0, 255, 10)))
        );
    }

    #[test]
    fn test_csv_clamps_beyond_i64() {
        let expected = Ok(Command::SetColor(Color::new(255, 0, 0)));

        assert_eq!(color("99999999999999999999,0,-99999999999999999999"), expected);
        assert_eq!(
            color(r#"{"r":99999999999999999999,"g":0,"b":-99999999999999999999}"#),
            expected
        );
        assert!(color("99999999999999999999x,0,0").is_err());
    }

    #[test]
    fn test_csv_whitespace() {
        assert_eq!(
            color(" 1, 2 ,3\n"),
            Ok(Command::SetColor(Color::new(1, 2, 3)))
        );
    }

    #[test]
    fn test_csv_wrong_arity() {
        assert!(color("1,2").is_err());
        assert!(color("1,2,3,4").is_err());
        assert!(color("").is_err());
        assert!(color("1,,3").is_err());
    }

    #[test]
    fn test_neither_format() {
        assert_eq!(
            color("not json, not csv"),
            Err(ParseError::Malformed("not json, not csv".to_string()))
        );
    }

    #[test]
    fn test_json_clamps() {
        assert_eq!(
            color(r#"{"r":-1,"g":256,"b":18446744073709551615}"#),
            Ok(Command::SetColor(Color::new(0, 255, 255)))
        );
    }

    #[test]
    fn test_json_missing_channels_default_to_zero() {
        assert_eq!(
            color(r#"{"green":7}"#),
            Ok(Command::SetColor(Color::new(0, 7, 0)))
        );
        assert_eq!(color("{}"), Ok(Command::SetColor(Color::BLACK)));
    }

    #[test]
    fn test_json_short_key_wins() {
        assert_eq!(
            color(r#"{"r":1,"red":99,"g":2,"b":3}"#),
            Ok(Command::SetColor(Color::new(1, 2, 3)))
        );
    }

    #[test]
    fn test_json_fractional_channel() {
        assert_eq!(
            color(r#"{"r":10.9,"g":0,"b":0}"#),
            Ok(Command::SetColor(Color::new(10, 0, 0)))
        );
    }

    #[test]
    fn test_json_non_numeric_channel() {
        assert!(color(r#"{"r":"ten","g":0,"b":0}"#).is_err());
    }

    #[test]
    fn test_json_non_object() {
        // Valid JSON, but neither an object nor three values
        assert!(color("42").is_err());
        assert!(color("[1,2,3]").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            parse(&[0xff, 0xfe, 0x2c], ChannelKind::Color),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_power() {
        assert_eq!(power("ON"), Ok(Command::SetPower(true)));
        assert_eq!(power("OFF"), Ok(Command::SetPower(false)));
    }

    #[test]
    fn test_power_is_exact() {
        assert!(power("on").is_err());
        assert!(power("Off").is_err());
        assert!(power("1").is_err());
        assert!(power("").is_err());
    }

    #[test]
    fn test_color_channel_does_not_take_power() {
        assert!(color("ON").is_err());
    }
}
