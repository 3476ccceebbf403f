use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::crypto::cipher_io::write_all;
use crate::crypto::cipher_traits::SymmetricCipherWithRounds;
use crate::crypto::cipher_types::{CipherInput, CipherMode, CipherOutput, PaddingMode};
use crate::crypto::collector::Collector;
use crate::crypto::error::CipherError;
use crate::crypto::utils::{apply_padding, remove_padding};

const CHUNK_SIZE: usize = 1024 * 1024;
const PARALLEL_THRESHOLD: usize = 4 * 1024 * 1024;

struct VecWriter<'a>(&'a mut Vec<u8>);

impl Write for VecWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Drives a round-instrumented block cipher over whole messages.
///
/// Owns the mode, padding and IV plumbing; the cipher mathematics stays
/// behind [`SymmetricCipherWithRounds`]. Traced encryption records every
/// block's round outputs into a [`Collector`].
#[derive(Clone)]
pub struct CipherContext {
    algorithm: Arc<dyn SymmetricCipherWithRounds + Send + Sync>,
    mode: CipherMode,
    padding: PaddingMode,
    iv: Option<Vec<u8>>,
}

impl CipherContext {
    /// Feedback modes re-purpose the block size as a feedback width,
    /// which a fixed-block algorithm cannot honor, so CFB and OFB are
    /// rejected up front. A supplied IV must match the block size.
    pub fn new(
        algorithm: Box<dyn SymmetricCipherWithRounds + Send + Sync>,
        mode: CipherMode,
        padding: PaddingMode,
        iv: Option<Vec<u8>>,
    ) -> Result<Self, CipherError> {
        if matches!(mode, CipherMode::CFB | CipherMode::OFB) {
            return Err(CipherError::InvalidCipherMode(mode));
        }
        if let Some(iv) = &iv {
            if iv.len() != algorithm.block_size() {
                return Err(CipherError::InvalidIvSize {
                    block: algorithm.block_size(),
                    actual: iv.len(),
                });
            }
        }
        Ok(CipherContext {
            algorithm: Arc::from(algorithm),
            mode,
            padding,
            iv,
        })
    }

    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let alg = Arc::get_mut(&mut self.algorithm).ok_or(CipherError::AlgorithmShared)?;
        alg.set_key(key)
    }

    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    /// Runs the whole message through the cipher while recording every
    /// round transformation of every block.
    ///
    /// The returned collector's merged sequence starts at the padded
    /// plaintext and ends at the exact ciphertext [`encrypt`](Self::encrypt)
    /// would produce. Tracing is defined for the block modes (ECB, CBC);
    /// CTR turns the cipher into a keystream generator whose round
    /// outputs never pass through the message bytes, so it is rejected.
    pub fn encrypt_traced(&self, plain: &[u8]) -> Result<Collector, CipherError> {
        if self.mode == CipherMode::CTR {
            return Err(CipherError::InvalidCipherMode(CipherMode::CTR));
        }
        let block_size = self.algorithm.block_size();
        let padded = apply_padding(plain.to_vec(), block_size, self.padding);
        let mut collector = Collector::new(self.algorithm.round_schedule());
        debug!(
            blocks = padded.len() / block_size,
            rounds = collector.rounds().len(),
            mode = ?self.mode,
            "traced encryption"
        );

        let mut prev = self.iv_or_zero();
        for chunk in padded.chunks(block_size) {
            let feed: Vec<u8> = match self.mode {
                CipherMode::CBC => chunk.iter().zip(prev.iter()).map(|(b, p)| b ^ p).collect(),
                _ => chunk.to_vec(),
            };
            let block = collector.new_block(chunk);
            let encrypted = self.algorithm.encrypt_block_traced(&feed, &mut |round_id, bytes| {
                block
                    .add_round(round_id, bytes)
                    .expect("cipher reported a round outside its declared schedule");
            });
            trace!(recorded = block.recorded_rounds(), "block traced");
            prev = encrypted;
        }
        Ok(collector)
    }

    pub async fn encrypt(
        &self,
        input: CipherInput,
        output: &mut CipherOutput,
    ) -> Result<(), CipherError> {
        self.process(input, output, true).await
    }

    pub async fn decrypt(
        &self,
        input: CipherInput,
        output: &mut CipherOutput,
    ) -> Result<(), CipherError> {
        self.process(input, output, false).await
    }

    async fn process(
        &self,
        input: CipherInput,
        output: &mut CipherOutput,
        encrypt: bool,
    ) -> Result<(), CipherError> {
        debug!(mode = ?self.mode, encrypt, "processing message");
        match (input, output) {
            (CipherInput::Bytes(data), out) => {
                let processed = if encrypt {
                    self.encrypt_bytes(&data)
                } else {
                    self.decrypt_bytes(&data)?
                };
                write_all(out, &processed)?;
                Ok(())
            }
            (CipherInput::File(input_path), CipherOutput::File(output_path)) => {
                let this = self.clone();
                let output_path = output_path.clone();
                Self::run_file_task(move || {
                    let reader = BufReader::new(File::open(&input_path)?);
                    let writer = BufWriter::new(File::create(&output_path)?);
                    this.process_stream(reader, writer, encrypt)
                })
                .await
            }
            (CipherInput::File(input_path), CipherOutput::Buffer(buf)) => {
                let this = self.clone();
                let result = Self::run_file_task(move || {
                    let reader = BufReader::new(File::open(&input_path)?);
                    let mut out = Vec::new();
                    this.process_stream(reader, VecWriter(&mut out), encrypt)?;
                    Ok(out)
                })
                .await?;
                **buf = result;
                Ok(())
            }
        }
    }

    async fn run_file_task<F, T>(task: F) -> Result<T, CipherError>
    where
        F: FnOnce() -> Result<T, CipherError> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(task)
            .await
            .map_err(|e| CipherError::Io(std::io::Error::other(e)))?
    }

    fn encrypt_bytes(&self, data: &[u8]) -> Vec<u8> {
        let block_size = self.algorithm.block_size();
        let mut prev = self.iv_or_zero();
        let mut counter_offset = 0;
        match self.mode {
            CipherMode::CTR => self.transform_aligned(data, true, &mut prev, &mut counter_offset),
            _ => {
                let padded = apply_padding(data.to_vec(), block_size, self.padding);
                self.transform_aligned(&padded, true, &mut prev, &mut counter_offset)
            }
        }
    }

    fn decrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        let block_size = self.algorithm.block_size();
        let mut prev = self.iv_or_zero();
        let mut counter_offset = 0;
        match self.mode {
            CipherMode::CTR => {
                Ok(self.transform_aligned(data, false, &mut prev, &mut counter_offset))
            }
            _ => {
                if data.len() % block_size != 0 {
                    return Err(CipherError::MisalignedCiphertext(data.len()));
                }
                let decrypted =
                    self.transform_aligned(data, false, &mut prev, &mut counter_offset);
                Ok(self.strip_padding(decrypted))
            }
        }
    }

    /// One pass over block-aligned data (CTR also accepts a partial
    /// final block). `prev` carries the CBC chaining state and
    /// `counter_offset` the CTR position, so the same routine serves the
    /// in-memory and streaming paths.
    fn transform_aligned(
        &self,
        data: &[u8],
        encrypt: bool,
        prev: &mut Vec<u8>,
        counter_offset: &mut usize,
    ) -> Vec<u8> {
        let block_size = self.algorithm.block_size();
        match self.mode {
            CipherMode::ECB => self.process_ecb(data, encrypt),
            CipherMode::CBC => {
                let mut out = Vec::with_capacity(data.len());
                for chunk in data.chunks(block_size) {
                    if encrypt {
                        let mixed: Vec<u8> =
                            chunk.iter().zip(prev.iter()).map(|(b, p)| b ^ p).collect();
                        let encrypted = self.algorithm.encrypt_block(&mixed);
                        out.extend_from_slice(&encrypted);
                        *prev = encrypted;
                    } else {
                        let decrypted = self.algorithm.decrypt_block(chunk);
                        out.extend(decrypted.iter().zip(prev.iter()).map(|(d, p)| d ^ p));
                        *prev = chunk.to_vec();
                    }
                }
                out
            }
            CipherMode::CTR => {
                let base = self.iv_or_zero();
                let out = self.ctr_batch(data, &base, *counter_offset);
                *counter_offset += data.len().div_ceil(block_size);
                out
            }
            CipherMode::CFB | CipherMode::OFB => {
                unreachable!("feedback modes are rejected at construction")
            }
        }
    }

    fn process_ecb(&self, data: &[u8], encrypt: bool) -> Vec<u8> {
        let block_size = self.algorithm.block_size();
        let transform = |chunk: &[u8]| {
            if encrypt {
                self.algorithm.encrypt_block(chunk)
            } else {
                self.algorithm.decrypt_block(chunk)
            }
        };
        if data.len() > PARALLEL_THRESHOLD {
            data.par_chunks(block_size)
                .flat_map_iter(transform)
                .collect()
        } else {
            data.chunks(block_size).flat_map(transform).collect()
        }
    }

    fn ctr_batch(&self, data: &[u8], counter_base: &[u8], start_index: usize) -> Vec<u8> {
        let block_size = self.algorithm.block_size();
        let mut out = Vec::with_capacity(data.len());
        for (i, chunk) in data.chunks(block_size).enumerate() {
            let mut counter = counter_base.to_vec();
            Self::increment_block(&mut counter, start_index + i);
            let keystream = self.algorithm.encrypt_block(&counter);
            out.extend(chunk.iter().zip(keystream.iter()).map(|(b, k)| b ^ k));
        }
        out
    }

    fn increment_block(block: &mut [u8], value: usize) {
        let mut carry = value;
        for byte in block.iter_mut().rev() {
            let (res, overflow) = byte.overflowing_add((carry & 0xFF) as u8);
            *byte = res;
            carry >>= 8;
            if !overflow && carry == 0 {
                break;
            }
        }
    }

    fn process_stream<R: Read, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
        encrypt: bool,
    ) -> Result<(), CipherError> {
        let block_size = self.algorithm.block_size();
        let mut prev = self.iv_or_zero();
        let mut counter_offset = 0;
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut pending: Vec<u8> = Vec::new();
        let mut total_in = 0usize;

        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            total_in += n;
            pending.extend_from_slice(&chunk[..n]);

            let aligned = pending.len() - pending.len() % block_size;
            let flush_len = if encrypt || self.mode == CipherMode::CTR {
                aligned
            } else {
                // Padding removal needs the final block, hold it back.
                aligned.saturating_sub(block_size)
            };
            if flush_len > 0 {
                let out = self.transform_aligned(
                    &pending[..flush_len],
                    encrypt,
                    &mut prev,
                    &mut counter_offset,
                );
                writer.write_all(&out)?;
                pending.drain(..flush_len);
            }
        }

        if self.mode == CipherMode::CTR {
            if !pending.is_empty() {
                let out = self.transform_aligned(&pending, encrypt, &mut prev, &mut counter_offset);
                writer.write_all(&out)?;
            }
        } else if encrypt {
            let aligned_zeros =
                pending.is_empty() && total_in > 0 && self.padding == PaddingMode::Zeros;
            if !aligned_zeros {
                let padded =
                    apply_padding(std::mem::take(&mut pending), block_size, self.padding);
                let out = self.transform_aligned(&padded, true, &mut prev, &mut counter_offset);
                writer.write_all(&out)?;
            }
        } else {
            if pending.len() % block_size != 0 {
                return Err(CipherError::MisalignedCiphertext(total_in));
            }
            if !pending.is_empty() {
                // Exactly one block remains held back at this point.
                let out = self.transform_aligned(&pending, false, &mut prev, &mut counter_offset);
                writer.write_all(&remove_padding(out, self.padding))?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn strip_padding(&self, mut data: Vec<u8>) -> Vec<u8> {
        if data.is_empty() {
            return data;
        }
        let block_size = self.algorithm.block_size();
        let tail = data.split_off(data.len() - block_size);
        data.extend(remove_padding(tail, self.padding));
        data
    }

    fn iv_or_zero(&self) -> Vec<u8> {
        self.iv
            .clone()
            .unwrap_or_else(|| vec![0u8; self.algorithm.block_size()])
    }
}
