#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    ECB,
    CBC,
    CFB,
    OFB,
    CTR,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    Zeros,
    ANSI_X923,
    PKCS7,
    ISO10126,
}

pub enum CipherInput {
    Bytes(Vec<u8>),
    File(String),
}

pub enum CipherOutput {
    Buffer(Box<Vec<u8>>),
    File(String),
}
