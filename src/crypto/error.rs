use std::io;

use thiserror::Error;

use crate::crypto::block::RoundId;
use crate::crypto::cipher_types::CipherMode;

/// Errors produced by the cipher_trace library.
#[derive(Debug, Error)]
pub enum CipherError {
    /// A round output was reported under an identifier that is not part
    /// of the collector's declared schedule.
    #[error("unknown round with id {id}")]
    UnknownRound { id: RoundId },

    /// A round output was reported twice for the same block.
    #[error("duplicate round with id {id}")]
    DuplicateRound { id: RoundId },

    #[error("invalid key size {0}")]
    InvalidKeySize(usize),

    #[error("invalid IV size {actual}, cipher block size is {block}")]
    InvalidIvSize { block: usize, actual: usize },

    /// The requested mode of operation cannot drive a fixed-block
    /// algorithm (or cannot be traced round-by-round).
    #[error("cipher mode {0:?} is not supported here")]
    InvalidCipherMode(CipherMode),

    #[error("ciphertext length {0} is not a multiple of the block size")]
    MisalignedCiphertext(usize),

    #[error("cannot set key while the cipher context is shared")]
    AlgorithmShared,

    #[error("secure random source failed: {0}")]
    Rng(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
