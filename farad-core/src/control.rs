//! Control protocol
//!
//! Pure command dispatch: one decoded client message in, one reply plus a
//! set of side-effect requests out. The caller owns the transport, the
//! durable store and the LED engine; this module only validates commands
//! and mutates [`DeviceState`]. A failed command never touches state.

use farad_protocol::messages::{
    error_code, AppliedValue, ClientMessage, CommandValue, ServerMessage,
};

use crate::state::{DeviceState, LedMode};

/// Command names accepted on the control channel
const CMD_PING: &str = "ping";
const CMD_CONTROL: &str = "control";

/// Side effects the caller must apply after a handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Write the mutated state to durable storage
    pub persist: bool,
    /// The LED output is affected by the mutation
    pub rerender: bool,
}

/// Result of handling one client message
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Reply for the transport to route
    pub reply: ServerMessage,
    /// Route the reply to every connected client instead of the sender
    pub broadcast: bool,
    /// Deferred side effects
    pub effects: Effects,
}

impl Outcome {
    fn reply_only(reply: ServerMessage) -> Self {
        Self {
            reply,
            broadcast: false,
            effects: Effects::default(),
        }
    }
}

/// Handle one decoded client message
///
/// `now_ms` feeds the `ping` reply. Mutations are applied to `state`
/// in-place; the outcome tells the caller whether to persist and whether
/// the LED output changed. The inbound broadcast flag is passed through
/// only on success, so error replies always go to the sender alone.
pub fn handle(
    msg: &ClientMessage,
    client_id: u32,
    now_ms: u64,
    state: &mut DeviceState,
) -> Outcome {
    match msg.cmd.as_str() {
        CMD_PING => {
            let mut reply = ServerMessage::ok(&msg.cmd, client_id);
            reply.pong = Some(now_ms);
            Outcome::reply_only(reply)
        }
        CMD_CONTROL => handle_control(msg, client_id, state),
        _ => Outcome::reply_only(ServerMessage::err(
            &msg.cmd,
            client_id,
            error_code::UNKNOWN_COMMAND,
        )),
    }
}

fn handle_control(msg: &ClientMessage, client_id: u32, state: &mut DeviceState) -> Outcome {
    let Some(target) = msg.target.as_ref() else {
        return Outcome::reply_only(ServerMessage::err(
            &msg.cmd,
            client_id,
            error_code::MISSING_TARGET,
        ));
    };

    let fail = |code| {
        Outcome::reply_only(ServerMessage::err(&msg.cmd, client_id, code))
    };

    // Applied value for the reply echo, plus whether the LED output is
    // affected. Every accepted mutation persists.
    let (applied, rerender) = match target.as_str() {
        "screen" => match msg.value.and_then(|v| v.as_bool()) {
            Some(on) => {
                state.screen_enabled = on;
                (AppliedValue::Bool(on), false)
            }
            None => return fail(value_error(msg.value)),
        },
        "ac_output" => match msg.value.and_then(|v| v.as_bool()) {
            Some(on) => {
                state.ac_output_enabled = on;
                (AppliedValue::Bool(on), false)
            }
            None => return fail(value_error(msg.value)),
        },
        "brightness" => match msg.value.and_then(|v| v.as_int()) {
            Some(raw) => {
                let applied = state.set_brightness(raw);
                (AppliedValue::Int(applied as u32), true)
            }
            None => return fail(value_error(msg.value)),
        },
        "led_mode" => match msg.value.and_then(|v| v.as_int()) {
            Some(raw) => {
                let Some(mode) = u8::try_from(raw).ok().and_then(LedMode::from_u8) else {
                    return fail(error_code::INVALID_MODE);
                };
                state.led_mode = mode;
                (AppliedValue::Int(mode.as_u8() as u32), true)
            }
            None => return fail(value_error(msg.value)),
        },
        "colors" => match msg.colors.as_ref().filter(|c| !c.is_empty()) {
            Some(colors) => {
                let count = state.set_colors(colors);
                (AppliedValue::Int(count as u32), true)
            }
            None => return fail(error_code::MISSING_COLORS),
        },
        _ => return fail(error_code::UNKNOWN_TARGET),
    };

    let mut reply = ServerMessage::ok(&msg.cmd, client_id);
    reply.target = Some(target.clone());
    reply.value = Some(applied);
    Outcome {
        reply,
        broadcast: msg.broadcast,
        effects: Effects {
            persist: true,
            rerender,
        },
    }
}

/// Distinguish an absent value from one of the wrong primitive type
fn value_error(value: Option<CommandValue>) -> &'static str {
    if value.is_none() {
        error_code::MISSING_VALUE
    } else {
        error_code::INVALID_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farad_protocol::messages::CommandValue;

    fn control(target: &str) -> ClientMessage {
        ClientMessage::command("control").with_target(target)
    }

    #[test]
    fn test_ping_echoes_clock() {
        let mut state = DeviceState::default();
        let msg = ClientMessage::command("ping");
        let out = handle(&msg, 3, 12345, &mut state);

        assert!(out.reply.ok);
        assert_eq!(out.reply.pong, Some(12345));
        assert_eq!(out.reply.from, 3);
        assert!(!out.broadcast);
        assert_eq!(out.effects, Effects::default());
    }

    #[test]
    fn test_unknown_command() {
        let mut state = DeviceState::default();
        let before = state.clone();
        let out = handle(&ClientMessage::command("reboot"), 1, 0, &mut state);

        assert!(!out.reply.ok);
        assert_eq!(out.reply.error, Some(error_code::UNKNOWN_COMMAND));
        assert_eq!(state, before);
    }

    #[test]
    fn test_brightness_clamps_and_echoes_applied() {
        let mut state = DeviceState::default();
        let msg = control("brightness").with_value(CommandValue::Int(150));
        let out = handle(&msg, 1, 0, &mut state);

        assert!(out.reply.ok);
        assert_eq!(out.reply.value, Some(AppliedValue::Int(100)));
        assert_eq!(state.led_brightness, 100);
        assert!(out.effects.persist);
        assert!(out.effects.rerender);
    }

    #[test]
    fn test_screen_toggle_persists_without_rerender() {
        let mut state = DeviceState::default();
        let msg = control("screen").with_value(CommandValue::Bool(false));
        let out = handle(&msg, 1, 0, &mut state);

        assert!(out.reply.ok);
        assert_eq!(out.reply.value, Some(AppliedValue::Bool(false)));
        assert!(!state.screen_enabled);
        assert!(out.effects.persist);
        assert!(!out.effects.rerender);
    }

    #[test]
    fn test_ac_output_requires_bool() {
        let mut state = DeviceState::default();
        let msg = control("ac_output").with_value(CommandValue::Int(1));
        let out = handle(&msg, 1, 0, &mut state);

        assert!(!out.reply.ok);
        assert_eq!(out.reply.error, Some(error_code::INVALID_VALUE));
        assert!(!state.ac_output_enabled);
        assert_eq!(out.effects, Effects::default());
    }

    #[test]
    fn test_missing_value() {
        let mut state = DeviceState::default();
        let out = handle(&control("brightness"), 1, 0, &mut state);

        assert!(!out.reply.ok);
        assert_eq!(out.reply.error, Some(error_code::MISSING_VALUE));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let mut state = DeviceState::default();
        let msg = control("led_mode").with_value(CommandValue::Int(9));
        let out = handle(&msg, 1, 0, &mut state);

        assert!(!out.reply.ok);
        assert_eq!(out.reply.error, Some(error_code::INVALID_MODE));
        assert_eq!(state.led_mode, LedMode::Solid);

        let msg = control("led_mode").with_value(CommandValue::Int(-1));
        let out = handle(&msg, 1, 0, &mut state);
        assert_eq!(out.reply.error, Some(error_code::INVALID_MODE));
    }

    #[test]
    fn test_valid_mode_applies() {
        let mut state = DeviceState::default();
        let msg = control("led_mode").with_value(CommandValue::Int(4));
        let out = handle(&msg, 1, 0, &mut state);

        assert!(out.reply.ok);
        assert_eq!(state.led_mode, LedMode::Flow);
        assert_eq!(out.reply.value, Some(AppliedValue::Int(4)));
        assert!(out.effects.rerender);
    }

    #[test]
    fn test_colors_replace_and_reset_stale_slots() {
        let mut state = DeviceState::default();
        let eight: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
        handle(&control("colors").with_colors(&eight), 1, 0, &mut state);
        assert_eq!(state.color_count, 8);

        let msg = control("colors").with_colors(&[0xFF0000, 0x0000FF]);
        let out = handle(&msg, 1, 0, &mut state);

        assert!(out.reply.ok);
        assert_eq!(out.reply.value, Some(AppliedValue::Int(2)));
        assert_eq!(state.color_count, 2);
        assert!(state.led_colors[2..]
            .iter()
            .all(|&c| c == crate::state::UNSET_COLOR));
    }

    #[test]
    fn test_empty_colors_rejected() {
        let mut state = DeviceState::default();
        let before = state.clone();

        let out = handle(&control("colors"), 1, 0, &mut state);
        assert_eq!(out.reply.error, Some(error_code::MISSING_COLORS));

        let msg = control("colors").with_colors(&[]);
        let out = handle(&msg, 1, 0, &mut state);
        assert_eq!(out.reply.error, Some(error_code::MISSING_COLORS));
        assert_eq!(state, before);
    }

    #[test]
    fn test_missing_and_unknown_target() {
        let mut state = DeviceState::default();

        let out = handle(&ClientMessage::command("control"), 1, 0, &mut state);
        assert_eq!(out.reply.error, Some(error_code::MISSING_TARGET));

        let out = handle(&control("warp_core"), 1, 0, &mut state);
        assert_eq!(out.reply.error, Some(error_code::UNKNOWN_TARGET));
    }

    #[test]
    fn test_broadcast_passthrough_on_success_only() {
        let mut state = DeviceState::default();
        let mut msg = control("brightness").with_value(CommandValue::Int(30));
        msg.broadcast = true;
        let out = handle(&msg, 1, 0, &mut state);
        assert!(out.broadcast);

        let mut msg = control("brightness");
        msg.broadcast = true;
        let out = handle(&msg, 1, 0, &mut state);
        assert!(!out.broadcast);
    }
}
