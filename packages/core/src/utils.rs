// ABOUTME: Shared utility functions for Scansheet
// ABOUTME: Record id and QR code generation

/// Characters used in QR codes. Ambiguous glyphs (0/O, 1/I) are left out so
/// codes can be typed in by hand when a scanner is unavailable.
pub const CODE_ALPHABET: [char; 32] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Length of a generated QR code
pub const CODE_LENGTH: usize = 10;

/// Generate a prefixed record id, e.g. `ent-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}

/// Generate a fresh QR code value
pub fn generate_code() -> String {
    nanoid::nanoid!(CODE_LENGTH, &CODE_ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id1 = generate_id("ent");
        let id2 = generate_id("ent");

        assert!(id1.starts_with("ent-"));
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_code() {
        let code1 = generate_code();
        let code2 = generate_code();

        assert_eq!(code1.len(), CODE_LENGTH);
        assert_ne!(code1, code2);
        assert!(code1.chars().all(|c| CODE_ALPHABET.contains(&c)));
    }
}
