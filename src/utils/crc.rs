/// CRC32 implementation specifically for MPEG-2 TS PSI tables
/// Based on ITU-T H.222.0 / ISO/IEC 13818-1
/// Polynomial: x32 + x26 + x23 + x22 + x16 + x12 + x11 + x10 + x8 + x7 + x5 + x4 + x2 + x + 1
/// Initial value: 0xFFFFFFFF, no reflection, no final xor
const CRC32_MPEG2: u32 = 0x04C11DB7;

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ CRC32_MPEG2
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = build_table();

/// MPEG-2 CRC32 calculator used for Transport Stream PSI table generation
/// and validation.
///
/// Implements the CRC32 algorithm specified in ITU-T H.222.0 / ISO/IEC
/// 13818-1. The lookup table is computed at compile time.
pub struct Crc32Mpeg2;

impl Crc32Mpeg2 {
    /// Calculates the CRC32 checksum for the given data using the MPEG-2
    /// algorithm.
    ///
    /// A section followed by its own big-endian CRC checksums to zero,
    /// which is how PSI consumers verify table integrity.
    ///
    /// # Examples
    ///
    /// ```
    /// use es2ts::utils::Crc32Mpeg2;
    ///
    /// let checksum = Crc32Mpeg2::calculate(&[0x01, 0x02, 0x03]);
    /// ```
    pub fn calculate(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFF;
        for &byte in data {
            let index = ((crc >> 24) ^ (byte as u32)) & 0xFF;
            crc = (crc << 8) ^ CRC_TABLE[index as usize];
        }
        crc
    }
}
