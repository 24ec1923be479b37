//! Byte-level command protocol for remote control over a serial link.
//!
//! A command is one opcode byte followed by zero to three parameter bytes.
//! Every command answers with a reply: an ACK/FAIL byte, query bytes, or
//! both (see [`opcode`]). [`CommandDispatcher`] assembles commands from a
//! byte stream without blocking; a command whose parameters stop arriving
//! is dropped after [`DEFAULT_TIMEOUT_MS`] and answered with FAIL.

use crate::colors::Rgb8;
use crate::time::{TimeDuration, TimeInstant, millis_since};
use crate::types::LightError;
use heapless::Vec;
use palette::Srgb;

/// Positive acknowledgement, also "on"/"async" in query replies.
pub const ACK: u8 = 0xFF;

/// Failure, also "off"/"not async" in query replies.
pub const FAIL: u8 = 0x00;

/// Inter-byte timeout for parameter bytes.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Reply bytes for one command (or a timeout FAIL plus one command).
pub type Reply = Vec<u8, 16>;

/// Opcode bytes.
pub mod opcode {
    /// Reply: ACK.
    pub const TURN_OFF: u8 = 0x00;
    /// Reply: ACK.
    pub const TURN_ON: u8 = 0x01;
    /// Params: r, g, b. Reply: ACK.
    pub const SET_COLOR: u8 = 0x02;
    /// Reply: ACK, mode id.
    pub const GET_MODE: u8 = 0x03;
    /// Reply: 0xFF on / 0x00 off.
    pub const GET_ON_OFF: u8 = 0x04;
    /// Reply: r, g, b.
    pub const GET_COLOR: u8 = 0x05;
    /// Reply: ACK, 0xFF async / 0x00 not.
    pub const GET_ASYNC: u8 = 0x06;
    /// Reply: ACK, mode, r, g, b, on/off, async, speed.
    pub const GET_STATUS: u8 = 0x07;
    /// Params: mode id. Reply: ACK, or FAIL for an unknown id.
    pub const SET_MODE: u8 = 0x08;
    /// Params: 0x01 start / 0x00 stop. Reply: ACK, or FAIL.
    pub const SET_ASYNC: u8 = 0x09;
    /// Reply: speed.
    pub const GET_SPEED: u8 = 0x0A;
    /// Params: speed. Reply: ACK.
    pub const SET_SPEED: u8 = 0x0B;
}

/// A fully decoded command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightCommand {
    TurnOff,
    TurnOn,
    SetColor(Rgb8),
    GetMode,
    GetOnOff,
    GetColor,
    GetAsync,
    GetStatus,
    SetMode(u8),
    SetAsync(bool),
    GetSpeed,
    SetSpeed(u8),
}

impl LightCommand {
    /// Number of parameter bytes that follow `op`.
    pub fn param_len(op: u8) -> Result<usize, LightError> {
        match op {
            opcode::SET_COLOR => Ok(3),
            opcode::SET_MODE | opcode::SET_ASYNC | opcode::SET_SPEED => Ok(1),
            opcode::TURN_OFF
            | opcode::TURN_ON
            | opcode::GET_MODE
            | opcode::GET_ON_OFF
            | opcode::GET_COLOR
            | opcode::GET_ASYNC
            | opcode::GET_STATUS
            | opcode::GET_SPEED => Ok(0),
            other => Err(LightError::UnknownCommand(other)),
        }
    }

    /// Decodes `op` with exactly [`param_len`](Self::param_len) parameter
    /// bytes.
    pub fn decode(op: u8, params: &[u8]) -> Result<Self, LightError> {
        let expected = Self::param_len(op)?;
        if params.len() != expected {
            return Err(LightError::Timeout);
        }

        let command = match op {
            opcode::TURN_OFF => LightCommand::TurnOff,
            opcode::TURN_ON => LightCommand::TurnOn,
            opcode::SET_COLOR => LightCommand::SetColor(Srgb::new(params[0], params[1], params[2])),
            opcode::GET_MODE => LightCommand::GetMode,
            opcode::GET_ON_OFF => LightCommand::GetOnOff,
            opcode::GET_COLOR => LightCommand::GetColor,
            opcode::GET_ASYNC => LightCommand::GetAsync,
            opcode::GET_STATUS => LightCommand::GetStatus,
            opcode::SET_MODE => LightCommand::SetMode(params[0]),
            opcode::SET_ASYNC => match params[0] {
                opcode::TURN_ON => LightCommand::SetAsync(true),
                opcode::TURN_OFF => LightCommand::SetAsync(false),
                other => return Err(LightError::InvalidParameter(other)),
            },
            opcode::GET_SPEED => LightCommand::GetSpeed,
            opcode::SET_SPEED => LightCommand::SetSpeed(params[0]),
            other => return Err(LightError::UnknownCommand(other)),
        };
        Ok(command)
    }
}

/// Something that can carry out decoded commands.
pub trait CommandTarget {
    /// Executes `command` and returns its reply bytes.
    fn execute(&mut self, command: LightCommand) -> Reply;
}

#[derive(Debug, Clone)]
struct Pending<I> {
    op: u8,
    params: Vec<u8, 3>,
    expected: usize,
    last_byte_at: I,
}

/// Assembles commands from single bytes and enforces the parameter timeout.
///
/// Feed every received byte to [`feed`](Self::feed) and call
/// [`poll`](Self::poll) regularly so stalled commands are failed even when
/// no more bytes arrive.
#[derive(Debug, Clone)]
pub struct CommandDispatcher<I: TimeInstant> {
    pending: Option<Pending<I>>,
    timeout_ms: u64,
}

impl<I: TimeInstant> CommandDispatcher<I> {
    pub fn new() -> Self {
        Self::with_timeout(I::Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: I::Duration) -> Self {
        Self {
            pending: None,
            timeout_ms: timeout.as_millis(),
        }
    }

    /// True while a command is waiting for parameter bytes.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fails a pending command whose parameters have stalled.
    ///
    /// Returns the FAIL reply when a command was dropped; the target is
    /// never touched.
    pub fn poll(&mut self, now: I) -> Option<Reply> {
        let pending = self.pending.as_ref()?;
        if millis_since(now, pending.last_byte_at) <= self.timeout_ms {
            return None;
        }

        warn!(
            "command {:#x} timed out with {}/{} params",
            pending.op,
            pending.params.len(),
            pending.expected
        );
        self.pending = None;
        Some(fail_reply())
    }

    /// Consumes one byte received at `now`.
    ///
    /// Returns the reply once a command is complete (or rejected). A stale
    /// pending command is failed first, and this byte then starts a new one.
    pub fn feed<C: CommandTarget>(&mut self, byte: u8, now: I, target: &mut C) -> Option<Reply> {
        let expired = self.poll(now);

        let result = match self.pending.take() {
            Some(mut pending) => {
                let _ = pending.params.push(byte);
                pending.last_byte_at = now;
                if pending.params.len() < pending.expected {
                    self.pending = Some(pending);
                    None
                } else {
                    Some(dispatch(pending.op, &pending.params, target))
                }
            }
            None => match LightCommand::param_len(byte) {
                Ok(0) => Some(dispatch(byte, &[], target)),
                Ok(expected) => {
                    self.pending = Some(Pending {
                        op: byte,
                        params: Vec::new(),
                        expected,
                        last_byte_at: now,
                    });
                    None
                }
                Err(_) => {
                    warn!("unknown command byte {:#x}", byte);
                    Some(fail_reply())
                }
            },
        };

        match (expired, result) {
            (Some(mut reply), Some(more)) => {
                for byte in more {
                    let _ = reply.push(byte);
                }
                Some(reply)
            }
            (expired, result) => expired.or(result),
        }
    }
}

impl<I: TimeInstant> Default for CommandDispatcher<I> {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch<C: CommandTarget>(op: u8, params: &[u8], target: &mut C) -> Reply {
    match LightCommand::decode(op, params) {
        Ok(command) => target.execute(command),
        Err(_) => {
            warn!("rejected command {:#x}", op);
            fail_reply()
        }
    }
}

fn fail_reply() -> Reply {
    let mut reply = Reply::new();
    let _ = reply.push(FAIL);
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lengths() {
        assert_eq!(LightCommand::param_len(opcode::SET_COLOR), Ok(3));
        assert_eq!(LightCommand::param_len(opcode::SET_MODE), Ok(1));
        assert_eq!(LightCommand::param_len(opcode::GET_STATUS), Ok(0));
        assert_eq!(
            LightCommand::param_len(0x42),
            Err(LightError::UnknownCommand(0x42))
        );
    }

    #[test]
    fn decode_set_color() {
        assert_eq!(
            LightCommand::decode(opcode::SET_COLOR, &[1, 2, 3]),
            Ok(LightCommand::SetColor(Srgb::new(1, 2, 3)))
        );
    }

    #[test]
    fn decode_rejects_short_params() {
        assert_eq!(
            LightCommand::decode(opcode::SET_COLOR, &[1, 2]),
            Err(LightError::Timeout)
        );
    }

    #[test]
    fn decode_set_async_accepts_on_off_only() {
        assert_eq!(
            LightCommand::decode(opcode::SET_ASYNC, &[0x01]),
            Ok(LightCommand::SetAsync(true))
        );
        assert_eq!(
            LightCommand::decode(opcode::SET_ASYNC, &[0x00]),
            Ok(LightCommand::SetAsync(false))
        );
        assert_eq!(
            LightCommand::decode(opcode::SET_ASYNC, &[0x07]),
            Err(LightError::InvalidParameter(0x07))
        );
    }
}
