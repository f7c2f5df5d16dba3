//! Test data generators for WebDAV integration tests.

use rand::Rng;

/// Generate random bytes of specified size.
pub fn random_bytes(size: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..size).map(|_| rng.random()).collect()
}

/// Generate content containing all 256 possible byte values.
pub fn all_byte_values() -> Vec<u8> {
    (0u8..=255).collect()
}

/// Generate a filename with special characters.
pub fn special_filename() -> String {
    "file with spaces & (special) chars!.txt".to_string()
}

/// Generate a filename with Unicode characters.
pub fn unicode_filename() -> String {
    "файл-αβγ-日本.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        assert_eq!(random_bytes(100).len(), 100);
        assert_eq!(random_bytes(0).len(), 0);
    }

    #[test]
    fn test_all_byte_values_complete() {
        let bytes = all_byte_values();
        assert_eq!(bytes.len(), 256);
        for i in 0u8..=255 {
            assert!(bytes.contains(&i), "Missing byte value: {i}");
        }
    }
}
