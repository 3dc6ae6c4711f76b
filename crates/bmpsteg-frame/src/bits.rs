//! Packing values into the least significant bits of carrier runs.

/// Carrier bytes consumed by one 8-bit value.
pub const BYTE_RUN: usize = 8;

/// Carrier bytes consumed by one 32-bit value.
pub const WORD_RUN: usize = 32;

/// Spread the low `W` bits of `value` over `run`, one bit per byte.
///
/// Bit `i` of `value` lands in bit 0 of `run[W - 1 - i]`, so the most
/// significant bit goes first. The upper seven bits of every byte are kept.
#[inline]
pub fn pack<const W: usize>(value: u32, run: &mut [u8; W]) {
    const { assert!(W >= 1 && W <= 32, "run width must be 1..=32") };
    for (index, byte) in run.iter_mut().enumerate() {
        let bit = ((value >> (W - 1 - index)) & 1) as u8;
        *byte = (*byte & !1) | bit;
    }
}

/// Collect bit 0 of every byte in `run` into a value, first byte most significant.
#[inline]
pub fn unpack<const W: usize>(run: &[u8; W]) -> u32 {
    const { assert!(W >= 1 && W <= 32, "run width must be 1..=32") };
    run.iter()
        .fold(0u32, |acc, byte| (acc << 1) | u32::from(byte & 1))
}

/// Pack one byte into an 8-byte run.
#[inline]
pub fn pack_byte(value: u8, run: &mut [u8; BYTE_RUN]) {
    pack(u32::from(value), run);
}

/// Unpack one byte from an 8-byte run.
#[inline]
pub fn unpack_byte(run: &[u8; BYTE_RUN]) -> u8 {
    unpack(run) as u8
}

/// Pack a 32-bit value into a 32-byte run.
#[inline]
pub fn pack_u32(value: u32, run: &mut [u8; WORD_RUN]) {
    pack(value, run);
}

/// Unpack a 32-bit value from a 32-byte run.
#[inline]
pub fn unpack_u32(run: &[u8; WORD_RUN]) -> u32 {
    unpack(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_is_written_msb_first() {
        let mut run = [0u8; BYTE_RUN];
        pack_byte(b'#', &mut run); // 0b0010_0011
        assert_eq!(run, [0, 0, 1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn word_is_written_msb_first() {
        let mut run = [0u8; WORD_RUN];
        pack_u32(0x8000_0001, &mut run);
        assert_eq!(run[0], 1);
        assert!(run[1..31].iter().all(|&b| b == 0));
        assert_eq!(run[31], 1);
    }

    #[test]
    fn only_bit_zero_changes() {
        let original: [u8; BYTE_RUN] = [0xFF, 0x00, 0xAA, 0x55, 0x80, 0x01, 0xFE, 0x7F];
        for value in [0x00u8, 0xFF, 0x5A, 0xC3] {
            let mut run = original;
            pack_byte(value, &mut run);
            for (after, before) in run.iter().zip(original.iter()) {
                assert_eq!(after & !1, before & !1);
            }
            assert_eq!(unpack_byte(&run), value);
        }
    }

    #[test]
    fn word_survives_noisy_carrier() {
        let mut run = [0u8; WORD_RUN];
        for (i, byte) in run.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37);
        }
        let before = run;

        pack_u32(0xDEAD_BEEF, &mut run);
        assert_eq!(unpack_u32(&run), 0xDEAD_BEEF);
        for (after, before) in run.iter().zip(before.iter()) {
            assert_eq!(after >> 1, before >> 1);
        }
    }

    #[test]
    fn repacking_overwrites_previous_bits() {
        let mut run = [0u8; BYTE_RUN];
        pack_byte(0xFF, &mut run);
        pack_byte(0x00, &mut run);
        assert_eq!(run, [0u8; BYTE_RUN]);
    }

    #[test]
    fn unpack_reads_garbage_without_complaint() {
        let run = [0x41u8; BYTE_RUN];
        assert_eq!(unpack_byte(&run), 0xFF);
    }

    #[test]
    fn odd_widths_are_supported() {
        let mut run = [0u8; 3];
        pack(0b101, &mut run);
        assert_eq!(run, [1, 0, 1]);
        assert_eq!(unpack(&run), 0b101);
    }
}
