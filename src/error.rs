use thiserror::Error;

/// Unified error type for the core crate. Callers match on variant instead
/// of parsing strings.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cartridge header reports unsupported type {type_code:#04X}")]
    UnsupportedCartridge { type_code: u8 },

    #[error("cartridge header reports unsupported ROM size code {size_code:#04X}")]
    UnsupportedRomSize { size_code: u8 },

    #[error("cartridge header reports unsupported RAM size code {size_code:#04X}")]
    UnsupportedRamSize { size_code: u8 },

    #[error("ROM data is too small to contain a valid header ({len} bytes)")]
    RomTooSmall { len: usize },

    #[error("opcode {opcode:#04X} at PC {pc:#06X} has no decoded instruction")]
    IllegalOpcode { opcode: u8, pc: u16 },

    #[error("instruction execution failed at PC {pc:#06X} (opcode {opcode:#04X}): {reason}")]
    ExecutionFailed {
        pc: u16,
        opcode: u8,
        reason: String,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
