//! Identifiers of the TraCI protocol.

pub const CMD_SIMSTEP: u8 = 0x02;
pub const CMD_CLOSE: u8 = 0x7f;

pub const CMD_GET_INDUCTIONLOOP_VARIABLE: u8 = 0xa0;
pub const CMD_GET_LANE_VARIABLE: u8 = 0xa3;
pub const CMD_SET_TL_VARIABLE: u8 = 0xc2;

/// Offset of the identifier of a response to a get command.
pub const RESPONSE_OFFSET: u8 = 0x10;

pub const ID_LIST: u8 = 0x00;
pub const VAR_LANE_ID: u8 = 0x51;
pub const LAST_STEP_VEHICLE_HALTING_NUMBER: u8 = 0x14;
pub const TL_PHASE_INDEX: u8 = 0x22;

pub const TYPE_INTEGER: u8 = 0x09;
pub const TYPE_STRING: u8 = 0x0c;
pub const TYPE_STRINGLIST: u8 = 0x0e;

pub const RTYPE_OK: u8 = 0x00;
pub const RTYPE_NOTIMPLEMENTED: u8 = 0x01;
pub const RTYPE_ERR: u8 = 0xff;
