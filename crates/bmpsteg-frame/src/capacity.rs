//! Up-front capacity arithmetic.
//!
//! A carrier fits a payload only when it holds strictly more bytes than the
//! embedding needs:
//!
//! ```text
//! required = 8 * (signature + extension field + 2 * 4 + payload) + header
//! fits     = carrier_total > required
//! ```
//!
//! The extension field is always charged at its maximum size, whatever the
//! real extension is, so the same carrier accepts the same payload sizes
//! regardless of file type.

use crate::codec::{run_len, FrameConfig, LENGTH_FIELD_SIZE};

/// Whether `carrier_total_bytes` can hold an embedding with the given sizes.
///
/// Equality counts as insufficient.
pub fn has_capacity(
    carrier_total_bytes: u64,
    format_header_bytes: u64,
    signature_len: u64,
    extension_field_len: u64,
    payload_len: u64,
) -> bool {
    CapacityPlan {
        header_size: format_header_bytes,
        signature_len,
        extension_field_len,
        payload_len,
    }
    .has_capacity(carrier_total_bytes)
}

/// The sizes that determine how many carrier bytes an embedding consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    pub header_size: u64,
    pub signature_len: u64,
    pub extension_field_len: u64,
    pub payload_len: u64,
}

impl CapacityPlan {
    /// Plan for a payload of `payload_len` bytes under `config`.
    pub fn for_payload(config: &FrameConfig, payload_len: u64) -> Self {
        Self {
            header_size: config.header_size as u64,
            signature_len: config.signature.len() as u64,
            extension_field_len: config.max_extension_len as u64,
            payload_len,
        }
    }

    fn fixed_len(&self) -> u64 {
        self.signature_len
            .saturating_add(self.extension_field_len)
            .saturating_add(2 * LENGTH_FIELD_SIZE as u64)
    }

    /// Carrier bytes the embedding needs, header included.
    pub fn required_bytes(&self) -> u64 {
        run_len(self.fixed_len().saturating_add(self.payload_len)).saturating_add(self.header_size)
    }

    /// Strict check: `carrier_total_bytes` must exceed [`required_bytes`](Self::required_bytes).
    pub fn has_capacity(&self, carrier_total_bytes: u64) -> bool {
        carrier_total_bytes > self.required_bytes()
    }

    /// Largest payload that passes [`has_capacity`](Self::has_capacity) for
    /// `carrier_total_bytes`, or `None` when not even an empty payload fits.
    pub fn max_payload_len(config: &FrameConfig, carrier_total_bytes: u64) -> Option<u64> {
        let fixed = Self::for_payload(config, 0);
        let usable = carrier_total_bytes.checked_sub(fixed.header_size)?.checked_sub(1)?;
        (usable / run_len(1)).checked_sub(fixed.fixed_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_bytes_formula() {
        let plan = CapacityPlan::for_payload(&FrameConfig::default(), 5);
        // 8 * (2 + 4 + 8 + 5) + 54
        assert_eq!(plan.required_bytes(), 206);
    }

    #[test]
    fn equality_is_insufficient() {
        let plan = CapacityPlan::for_payload(&FrameConfig::default(), 5);
        let required = plan.required_bytes();

        assert!(!plan.has_capacity(required));
        assert!(plan.has_capacity(required + 1));
        assert!(!has_capacity(required, 54, 2, 4, 5));
        assert!(has_capacity(required + 1, 54, 2, 4, 5));
    }

    #[test]
    fn small_carrier_large_secret() {
        assert!(!has_capacity(100, 54, 2, 4, 50));
    }

    #[test]
    fn scenario_bitmap_fits_short_source_file() {
        assert!(has_capacity(9000, 54, 2, 4, 5));
    }

    #[test]
    fn max_payload_len_sits_on_the_boundary() {
        let config = FrameConfig::default();
        for total in [200u64, 206, 207, 9000, 10_001] {
            match CapacityPlan::max_payload_len(&config, total) {
                Some(max) => {
                    assert!(CapacityPlan::for_payload(&config, max).has_capacity(total));
                    assert!(!CapacityPlan::for_payload(&config, max + 1).has_capacity(total));
                }
                None => assert!(!CapacityPlan::for_payload(&config, 0).has_capacity(total)),
            }
        }
    }

    #[test]
    fn max_payload_len_none_for_tiny_carrier() {
        let config = FrameConfig::default();
        assert_eq!(CapacityPlan::max_payload_len(&config, 10), None);
        assert_eq!(CapacityPlan::max_payload_len(&config, 54 + 8 * 14), None);
        assert_eq!(CapacityPlan::max_payload_len(&config, 54 + 8 * 14 + 1), Some(0));
    }

    #[test]
    fn huge_payload_saturates_instead_of_overflowing() {
        let plan = CapacityPlan::for_payload(&FrameConfig::default(), u64::MAX);
        assert_eq!(plan.required_bytes(), u64::MAX);
        assert!(!plan.has_capacity(u64::MAX));
    }
}
