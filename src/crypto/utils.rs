use rand::RngCore;

use crate::crypto::cipher_types::PaddingMode;

/// Pads `data` to a whole number of `block_size` blocks.
///
/// PKCS7, ANSI X9.23 and ISO 10126 append a full padding block when the
/// input is already aligned, so removal stays unambiguous; Zeros padding
/// leaves aligned non-empty input untouched. Empty input always gains a
/// full block.
pub fn apply_padding(mut data: Vec<u8>, block_size: usize, padding: PaddingMode) -> Vec<u8> {
    let remainder = data.len() % block_size;
    let padding_length = if remainder == 0 && !data.is_empty() {
        match padding {
            PaddingMode::Zeros => 0,
            PaddingMode::PKCS7 | PaddingMode::ANSI_X923 | PaddingMode::ISO10126 => block_size,
        }
    } else {
        block_size - remainder
    };

    if padding_length == 0 {
        return data;
    }

    match padding {
        PaddingMode::Zeros => data.extend(vec![0; padding_length]),
        PaddingMode::ANSI_X923 => {
            data.extend(vec![0; padding_length - 1]);
            data.push(padding_length as u8);
        }
        PaddingMode::PKCS7 => {
            data.extend(vec![padding_length as u8; padding_length]);
        }
        PaddingMode::ISO10126 => {
            // The fill bytes are discarded on removal, any random source
            // will do.
            let mut fill = vec![0u8; padding_length - 1];
            rand::rng().fill_bytes(&mut fill);
            data.extend(fill);
            data.push(padding_length as u8);
        }
    }
    data
}

/// Whether `data` is exactly one block consisting purely of padding.
pub fn is_full_padding_block(data: &[u8], block_size: usize, padding: PaddingMode) -> bool {
    if data.len() != block_size {
        return false;
    }

    match padding {
        PaddingMode::PKCS7 => {
            let pad_len = data[block_size - 1] as usize;
            pad_len == block_size && data.iter().all(|&b| b == pad_len as u8)
        }
        PaddingMode::ANSI_X923 => {
            let pad_len = data[block_size - 1] as usize;
            pad_len == block_size && data[..block_size - 1].iter().all(|&b| b == 0)
        }
        PaddingMode::ISO10126 => {
            // The fill bytes may be anything, only the length marker counts.
            data[block_size - 1] as usize == block_size
        }
        PaddingMode::Zeros => data.iter().all(|&b| b == 0),
    }
}

/// Strips the padding from the final block of a decrypted message.
/// `data` is expected to be exactly one cipher block.
pub fn remove_padding(mut data: Vec<u8>, padding: PaddingMode) -> Vec<u8> {
    if data.is_empty() {
        return data;
    }
    if is_full_padding_block(&data, data.len(), padding) {
        return Vec::new();
    }

    let block_size = data.len();
    match padding {
        PaddingMode::Zeros => {
            while data.last() == Some(&0u8) {
                data.pop();
            }
        }
        PaddingMode::PKCS7 => {
            if let Some(&last_byte) = data.last() {
                let pad_len = last_byte as usize;
                if pad_len == 0 || pad_len > block_size {
                    return data;
                }
                if data[data.len() - pad_len..].iter().all(|&b| b == last_byte) {
                    data.truncate(data.len() - pad_len);
                }
            }
        }
        PaddingMode::ANSI_X923 => {
            if let Some(&last_byte) = data.last() {
                let pad_len = last_byte as usize;
                if pad_len == 0 || pad_len > block_size {
                    return data;
                }
                if data[data.len() - pad_len..data.len() - 1].iter().all(|&b| b == 0) {
                    data.truncate(data.len() - pad_len);
                }
            }
        }
        PaddingMode::ISO10126 => {
            if let Some(&last_byte) = data.last() {
                let pad_len = last_byte as usize;
                if pad_len == 0 || pad_len > block_size {
                    return data;
                }
                data.truncate(data.len() - pad_len);
            }
        }
    }

    data
}
