//! Code-blob extraction from a host image.
//!
//! The production loader opens its own executable; this module implements
//! the pure half of that contract against a caller-provided byte buffer.
//! The final eight bytes of the image are two big-endian words `(hi, lo)`
//! encrypting the blob length against the image's leading word; the blob
//! itself sits immediately before the trailer.

use wisp_asm::Word;

/// Size of the trailing length trailer.
pub const TRAILER_LEN: usize = 8;

/// Image decoding failure. Embedders map these to process exit code 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    /// The image cannot hold the leading key and the trailer.
    #[error("image too short to carry a code trailer ({0} bytes)")]
    ImageTooShort(usize),
    /// The decrypted length does not fit inside the image.
    #[error("decrypted code length {len:#x} exceeds the image")]
    LengthOutOfRange {
        /// The decrypted, implausible length.
        len: Word,
    },
}

fn be_word(bytes: &[u8]) -> Word {
    Word::from(bytes[0]) << 24
        | Word::from(bytes[1]) << 16
        | Word::from(bytes[2]) << 8
        | Word::from(bytes[3])
}

fn le_word(bytes: &[u8]) -> Word {
    Word::from(bytes[3]) << 24
        | Word::from(bytes[2]) << 16
        | Word::from(bytes[1]) << 8
        | Word::from(bytes[0])
}

/// Decrypt the code-blob length from `image`.
///
/// `len = LE32(image[0..4]) XOR (ROL32(hi, 13) XOR ROR32(lo, 27))` where
/// `hi` and `lo` are the two big-endian halves of the trailer.
pub fn code_len(image: &[u8]) -> Result<Word, LoaderError> {
    if image.len() < TRAILER_LEN + 4 {
        return Err(LoaderError::ImageTooShort(image.len()));
    }
    let trailer = &image[image.len() - TRAILER_LEN..];
    let hi = be_word(&trailer[..4]);
    let lo = be_word(&trailer[4..]);
    let key = le_word(&image[..4]);
    Ok(key ^ (hi.rotate_left(13) ^ lo.rotate_right(27)))
}

/// Slice the code blob out of `image`: the `code_len` bytes immediately
/// before the trailer.
pub fn extract(image: &[u8]) -> Result<&[u8], LoaderError> {
    let len = code_len(image)? as usize;
    let end = image.len() - TRAILER_LEN;
    if len > end {
        return Err(LoaderError::LengthOutOfRange { len: len as Word });
    }
    Ok(&image[end - len..end])
}
