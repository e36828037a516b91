//! Trailing checksums.

/// Algorithm used by a generation to protect its recordings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checksum {
    /// Cyclic redundancy check over a nibble table, starting from zero.
    Crc16,
    /// Wrapping sum of all bytes.
    Sum16,
}

impl Checksum {
    /// Compute the checksum of a slice of bytes.
    pub fn compute(self, r: &[u8]) -> u16 {
        match self {
            Self::Crc16 => r.iter().fold(0, |acc, b| crc_byte(acc, *b)),
            Self::Sum16 => r.iter().fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b))),
        }
    }
}

/// Accumulate a single byte into a cyclic redundancy check value.
fn crc_byte(mut crc: u16, b: u8) -> u16 {
    const CRC_TABLE: [u16; 16] = [
        0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
        0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
    ];

    for nibble in [b & 0xF, b >> 4] {
        let tmp = CRC_TABLE[usize::from(crc & 0xF)];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[usize::from(nibble)];
    }

    crc
}
