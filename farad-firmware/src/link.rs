//! Radio co-processor link wire format
//!
//! The co-processor owns the Wi-Fi stack and the WebSocket framing; this
//! side speaks newline-delimited lines over UART1. Each line is
//! `<client-id> TAB <json>`; outbound lines use `*` as the id for a
//! broadcast. The JSON carries either a co-processor event (`connect`,
//! `disconnect`) or a client command.

use heapless::Vec;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use farad_protocol::messages::{ClientMessage, CommandValue, MAX_COLORS};

/// Maximum accepted line length, id prefix included
pub const MAX_LINE_LEN: usize = 256;

/// Line decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No tab separator or unparseable client id
    BadPrefix,
    /// JSON payload did not decode
    BadJson,
}

/// One decoded inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A client connected; send it `connected` + `state_sync`
    Connect,
    /// A client went away
    Disconnect,
    /// A client command for the control protocol
    Command(ClientMessage),
}

/// `value` field: JSON booleans and integers, nothing else
#[derive(Debug, Clone, Copy, PartialEq)]
struct WireValue(CommandValue);

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = WireValue;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a boolean or an integer")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<WireValue, E> {
                Ok(WireValue(CommandValue::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireValue, E> {
                Ok(WireValue(CommandValue::Int(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireValue, E> {
                Ok(WireValue(CommandValue::Int(v as i64)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// `colors` field: takes the first 8 entries, drains the rest
#[derive(Debug, Clone, PartialEq)]
struct ColorList(Vec<u32, MAX_COLORS>);

impl<'de> Deserialize<'de> for ColorList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl<'de> Visitor<'de> for ColorVisitor {
            type Value = ColorList;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("an array of 24-bit colors")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<ColorList, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut colors = Vec::new();
                while let Some(color) = seq.next_element::<u32>()? {
                    // Over-long lists are truncated, not rejected
                    let _ = colors.push(color);
                }
                Ok(ColorList(colors))
            }
        }

        deserializer.deserialize_seq(ColorVisitor)
    }
}

/// Raw JSON shape of one inbound line
#[derive(Debug, Deserialize)]
struct WireLine<'a> {
    event: Option<&'a str>,
    cmd: Option<&'a str>,
    broadcast: Option<bool>,
    target: Option<&'a str>,
    value: Option<WireValue>,
    colors: Option<ColorList>,
}

/// Split an inbound line into its client id and JSON payload
pub fn split_line(line: &[u8]) -> Result<(u32, &[u8]), LinkError> {
    let tab = line
        .iter()
        .position(|&b| b == b'\t')
        .ok_or(LinkError::BadPrefix)?;
    let id = core::str::from_utf8(&line[..tab])
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or(LinkError::BadPrefix)?;
    Ok((id, &line[tab + 1..]))
}

/// Decode the JSON payload of an inbound line
pub fn decode(json: &[u8]) -> Result<Inbound, LinkError> {
    let (wire, _) =
        serde_json_core::de::from_slice::<WireLine>(json).map_err(|_| LinkError::BadJson)?;

    match wire.event {
        Some("connect") => return Ok(Inbound::Connect),
        Some("disconnect") => return Ok(Inbound::Disconnect),
        Some(_) => return Err(LinkError::BadJson),
        None => {}
    }

    let Some(cmd) = wire.cmd else {
        return Err(LinkError::BadJson);
    };

    let mut msg = ClientMessage::command(cmd);
    msg.broadcast = wire.broadcast.unwrap_or(false);
    if let Some(target) = wire.target {
        msg = msg.with_target(target);
    }
    if let Some(WireValue(value)) = wire.value {
        msg = msg.with_value(value);
    }
    if let Some(ColorList(colors)) = wire.colors {
        msg = msg.with_colors(&colors);
    }
    Ok(Inbound::Command(msg))
}
