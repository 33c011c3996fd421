//! Control channel message surface
//!
//! Semantic message types exchanged with browser clients. The radio
//! co-processor owns the WebSocket transport and the JSON wire encoding;
//! this module defines only the fields the core logic consumes and
//! produces, plus the machine-readable error codes for failure replies.

use heapless::{String, Vec};

/// Maximum command name length
pub const MAX_CMD_LEN: usize = 16;

/// Maximum control target name length
pub const MAX_TARGET_LEN: usize = 16;

/// Maximum LED color list length
pub const MAX_COLORS: usize = 8;

/// Event tag on command replies
pub const EVENT_RESPONSE: &str = "response";

/// Event tag on the connect-time state snapshot
pub const EVENT_STATE_SYNC: &str = "state_sync";

/// Event tag on the connect acknowledgement
pub const EVENT_CONNECTED: &str = "connected";

/// Machine-readable error codes carried in failure replies
pub mod error_code {
    /// Command name not recognized
    pub const UNKNOWN_COMMAND: &str = "unknown_command";
    /// `control` command without a target
    pub const MISSING_TARGET: &str = "missing_target";
    /// `control` target not recognized
    pub const UNKNOWN_TARGET: &str = "unknown_target";
    /// `control` command without a value for a target that needs one
    pub const MISSING_VALUE: &str = "missing_value";
    /// Value present but of the wrong primitive type for the target
    pub const INVALID_VALUE: &str = "invalid_value";
    /// LED mode integer outside the enumerated range
    pub const INVALID_MODE: &str = "invalid_mode";
    /// `colors` target without a non-empty color list
    pub const MISSING_COLORS: &str = "missing_colors";
    /// Payload could not be decoded from the wire at all
    pub const INVALID_JSON: &str = "invalid_json";
}

/// Primitive value carried by a `control` command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandValue {
    Bool(bool),
    Int(i64),
}

impl CommandValue {
    /// Interpret as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CommandValue::Bool(b) => Some(*b),
            CommandValue::Int(_) => None,
        }
    }

    /// Interpret as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CommandValue::Int(i) => Some(*i),
            CommandValue::Bool(_) => None,
        }
    }
}

/// Copy a name into a bounded string, dropping whatever does not fit
fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// One decoded command from a client
///
/// Built by the transport layer after wire decoding; `broadcast` selects
/// whether the reply goes to the originating client only or to everyone.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    /// Command name (`ping`, `control`, ...)
    pub cmd: String<MAX_CMD_LEN>,
    /// Route the reply to all connected clients
    pub broadcast: bool,
    /// Control target (`screen`, `ac_output`, `brightness`, `led_mode`, `colors`)
    pub target: Option<String<MAX_TARGET_LEN>>,
    /// Primitive value for the target, where applicable
    pub value: Option<CommandValue>,
    /// Color list for the `colors` target (24-bit RGB entries)
    pub colors: Option<Vec<u32, MAX_COLORS>>,
}

impl ClientMessage {
    /// Create a bare command; over-long names are truncated at the wire
    /// limit, which guarantees they fail the command lookup downstream.
    pub fn command(cmd: &str) -> Self {
        Self {
            cmd: bounded(cmd),
            broadcast: false,
            target: None,
            value: None,
            colors: None,
        }
    }

    /// Set the control target
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(bounded(target));
        self
    }

    /// Set the command value
    pub fn with_value(mut self, value: CommandValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the color list, truncated to [`MAX_COLORS`] entries
    pub fn with_colors(mut self, colors: &[u32]) -> Self {
        let mut list = Vec::new();
        for &c in colors.iter().take(MAX_COLORS) {
            let _ = list.push(c);
        }
        self.colors = Some(list);
        self
    }
}

/// Value echoed back in a successful `control` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AppliedValue {
    Bool(bool),
    Int(u32),
}

/// Reply envelope sent back for every client command
///
/// Always carries the literal command name, the originating client id and
/// the success flag; the optional fields are command-specific.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServerMessage {
    /// Always [`EVENT_RESPONSE`]
    pub event: &'static str,
    /// Echo of the command name
    pub cmd: String<MAX_CMD_LEN>,
    /// Originating client id
    pub from: u32,
    /// Success flag
    pub ok: bool,
    /// Monotonic milliseconds, on `ping`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pong: Option<u64>,
    /// Echo of the control target, on `control`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub target: Option<String<MAX_TARGET_LEN>>,
    /// Applied value (post-clamping), on successful `control`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub value: Option<AppliedValue>,
    /// Error code, on failure
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<&'static str>,
}

impl ServerMessage {
    /// Successful reply skeleton for a command
    pub fn ok(cmd: &String<MAX_CMD_LEN>, from: u32) -> Self {
        Self {
            event: EVENT_RESPONSE,
            cmd: cmd.clone(),
            from,
            ok: true,
            pong: None,
            target: None,
            value: None,
            error: None,
        }
    }

    /// Failure reply with an error code; device state was not modified
    pub fn err(cmd: &String<MAX_CMD_LEN>, from: u32, code: &'static str) -> Self {
        Self {
            event: EVENT_RESPONSE,
            cmd: cmd.clone(),
            from,
            ok: false,
            pong: None,
            target: None,
            value: None,
            error: Some(code),
        }
    }
}

/// Connect-time snapshot of the full device state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateSync {
    /// Always [`EVENT_STATE_SYNC`]
    pub event: &'static str,
    pub screen: bool,
    pub ac_output: bool,
    pub brightness: u8,
    /// LED mode as its wire integer (0-4)
    pub led_mode: u8,
    pub color_count: u8,
    /// All 8 color slots, unset entries included
    pub colors: [u32; MAX_COLORS],
}

/// Connect acknowledgement carrying the assigned client id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Connected {
    /// Always [`EVENT_CONNECTED`]
    pub event: &'static str,
    pub client_id: u32,
}

impl Connected {
    /// Build the acknowledgement for a newly connected client
    pub fn new(client_id: u32) -> Self {
        Self {
            event: EVENT_CONNECTED,
            client_id,
        }
    }
}
