//! Bit classification and assembly of the 40-bit frame.

/// Number of data bits the sensor sends after the preamble.
pub const FRAME_BITS: usize = 40;

/// Shortest valid LOW pulse preceding a data bit.
pub const LOW_MIN_US: u64 = 30;

/// Longest valid LOW pulse preceding a data bit.
pub const LOW_MAX_US: u64 = 70;

/// HIGH pulses longer than this encode a 1.
pub const HIGH_THRESHOLD_US: u64 = 50;

/// Classifies one bit from its LOW and HIGH pulse widths.
///
/// Returns `None` when the LOW pulse falls outside
/// [`LOW_MIN_US`]..=[`LOW_MAX_US`]; the HIGH pulse is not consulted then.
pub fn classify_bit(low_us: u64, high_us: u64) -> Option<bool> {
    if !(LOW_MIN_US..=LOW_MAX_US).contains(&low_us) {
        return None;
    }
    Some(high_us > HIGH_THRESHOLD_US)
}

/// The five bytes received from the sensor, most significant bit first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; 5],
}

impl RawFrame {
    /// An all-zero frame, ready for [`push_bit`](Self::push_bit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts bit number `index` (0..40) into its byte.
    pub fn push_bit(&mut self, index: usize, bit: bool) {
        let byte = &mut self.bytes[index / 8];
        *byte <<= 1;
        *byte |= u8::from(bit);
    }

    /// The five received bytes, checksum last.
    pub fn bytes(&self) -> &[u8; 5] {
        &self.bytes
    }

    /// Checksum byte as sent by the sensor.
    pub fn checksum(&self) -> u8 {
        self.bytes[4]
    }

    /// Wrapping sum of the four data bytes.
    pub fn calculated_checksum(&self) -> u8 {
        self.bytes[..4]
            .iter()
            .fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Whether the checksum byte matches the data.
    pub fn is_valid(&self) -> bool {
        self.checksum() == self.calculated_checksum()
    }

    /// Packs the four data bytes into one word, first byte highest.
    pub fn payload(&self) -> u32 {
        let [b0, b1, b2, b3, _] = self.bytes;
        u32::from_be_bytes([b0, b1, b2, b3])
    }
}

impl From<[u8; 5]> for RawFrame {
    fn from(bytes: [u8; 5]) -> Self {
        RawFrame { bytes }
    }
}
