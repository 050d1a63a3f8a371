/// Number of ASCII digits in the leading header field.
pub(crate) const HEADER_DIGITS: usize = 10;

/// Byte written after the header digits. Older archives have none and start
/// the first entry right away, so readers must not insist on this value.
pub(crate) const FRAMING_BYTE: u8 = b'\n';

/// Opening and closing delimiter of an entry header line.
pub(crate) const ENTRY_DELIMITER: u8 = b'|';

/// Separator between the fields of an entry header line.
pub(crate) const FIELD_SEPARATOR: u8 = b',';

/// The fixed-width field at the start of every archive.
///
/// The writer stores the offset at which the first entry begins. Readers
/// only check that ten digits are present and never use the value for framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SauHeader {
    pub(crate) reserved: u64,
}

impl SauHeader {
    pub(crate) fn new() -> SauHeader {
        SauHeader {
            reserved: (HEADER_DIGITS + 1) as u64,
        }
    }

    /// The value of the reserved digit field as found in the archive.
    #[inline(always)]
    pub fn reserved(&self) -> u64 {
        self.reserved
    }
}

impl Default for SauHeader {
    fn default() -> Self {
        SauHeader::new()
    }
}
