//! Memory-image loader.
//!
//! Parses the textual image format into a flat byte array:
//!
//! * a line starting with `@` followed by a hexadecimal address moves the
//!   write cursor;
//! * a line of whitespace-separated two-hex-digit tokens writes those bytes
//!   sequentially from the cursor;
//! * blank lines are ignored.
//!
//! Writing past the end of the buffer grows it zero-filled. The result is
//! loaded at address 0 of the unified memory.

use std::io::BufRead;

use crate::common::SimError;

/// Parses a memory image from a reader.
pub fn parse_image<R: BufRead>(reader: R) -> Result<Vec<u8>, SimError> {
    let mut memory = Vec::new();
    let mut cursor: usize = 0;

    for line in reader.lines() {
        let line = line.map_err(|e| SimError::BadImage(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(addr) = line.strip_prefix('@') {
            cursor = usize::from_str_radix(addr.trim(), 16)
                .map_err(|_| SimError::BadImage(format!("bad address line '@{}'", addr)))?;
            continue;
        }

        for token in line.split_whitespace() {
            let byte = u8::from_str_radix(token, 16)
                .map_err(|_| SimError::BadImage(format!("bad byte token '{}'", token)))?;
            if cursor >= memory.len() {
                memory.resize(cursor + 1, 0);
            }
            memory[cursor] = byte;
            cursor += 1;
        }
    }
    Ok(memory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_follow_the_cursor() {
        let image = parse_image("@0\n13 05 f0 0f\n".as_bytes()).unwrap();
        assert_eq!(image, vec![0x13, 0x05, 0xf0, 0x0f]);
    }

    #[test]
    fn address_lines_move_the_cursor_and_zero_fill() {
        let image = parse_image("@4\naa bb\n".as_bytes()).unwrap();
        assert_eq!(image, vec![0, 0, 0, 0, 0xaa, 0xbb]);
    }

    #[test]
    fn blank_lines_ignored_and_later_sections_append() {
        let src = "\n@0\n11 22\n\n@10\n33\n";
        let image = parse_image(src.as_bytes()).unwrap();
        assert_eq!(image.len(), 0x11);
        assert_eq!(image[0], 0x11);
        assert_eq!(image[1], 0x22);
        assert_eq!(image[0x10], 0x33);
    }

    #[test]
    fn bad_tokens_are_reported() {
        assert!(parse_image("zz\n".as_bytes()).is_err());
        assert!(parse_image("@xyz\n".as_bytes()).is_err());
    }
}
