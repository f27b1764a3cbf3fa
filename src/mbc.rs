use crate::error::{CoreError, CoreResult};

/// Defines the Memory Bank Controller type used by the cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcType {
    NoMbc,
    Mbc1,
    Mbc2,
}

impl MbcType {
    /// Determines MBC Type, RAM presence, and Battery presence from the cartridge type code.
    pub fn from_header(cartridge_type_code: u8) -> CoreResult<(Self, bool, bool)> {
        let result = match cartridge_type_code {
            0x00 => (MbcType::NoMbc, false, false),
            0x01 => (MbcType::Mbc1, false, false),
            0x02 => (MbcType::Mbc1, true, false),
            0x03 => (MbcType::Mbc1, true, true),
            0x05 => (MbcType::Mbc2, true, false), // MBC2 carries its own 512x4-bit RAM
            0x06 => (MbcType::Mbc2, true, true),
            0x08 => (MbcType::NoMbc, true, false), // ROM+RAM
            0x09 => (MbcType::NoMbc, true, true),  // ROM+RAM+BATT
            other => {
                return Err(CoreError::UnsupportedCartridge {
                    type_code: other,
                });
            }
        };
        Ok(result)
    }
}

/// MBC2's built-in RAM is 512 half-bytes; only the low nibble of each byte
/// is meaningful, the upper nibble reads back as all-ones.
pub const MBC2_RAM_SIZE: usize = 512;
