use std::sync::Arc;

use cipher_trace::crypto::cipher_context::CipherContext;
use cipher_trace::crypto::cipher_types::{CipherInput, CipherMode, CipherOutput, PaddingMode};
use cipher_trace::crypto::feistel_cipher::FeistelCipher;
use cipher_trace::crypto::feistel_network::FeistelNetwork;
use cipher_trace::crypto::rotating_key_expansion::RotatingKeyExpansion;
use cipher_trace::crypto::secure_random::SecureRandom;
use cipher_trace::crypto::xor_transformation::XorTransformation;

const ROUNDS: usize = 4;
const BLOCK_SIZE: usize = 8;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cipher_trace=debug")),
        )
        .init();

    let mut rng = SecureRandom::new();
    let key = rng.generate_key(BLOCK_SIZE)?;
    let iv = rng.generate_iv(BLOCK_SIZE)?;

    let network = FeistelNetwork::new(
        ROUNDS,
        Arc::new(RotatingKeyExpansion::new(ROUNDS)),
        Arc::new(XorTransformation),
    );
    let cipher = FeistelCipher::new(network, BLOCK_SIZE);
    let mut ctx = CipherContext::new(
        Box::new(cipher),
        CipherMode::CBC,
        PaddingMode::PKCS7,
        Some(iv),
    )?;
    ctx.set_key(&key)?;

    let plain = b"The quick brown fox jumps over the lazy dog";
    let collector = ctx.encrypt_traced(plain)?;

    println!("rounds: {:?}", collector.rounds());
    for (step, snapshot) in collector.transformations().enumerate() {
        println!("step {step:2}: {}", hex(&snapshot));
    }

    let ciphertext = collector.transformations().last().unwrap();
    let mut out = CipherOutput::Buffer(Box::new(Vec::new()));
    ctx.decrypt(CipherInput::Bytes(ciphertext), &mut out).await?;
    let decrypted = match out {
        CipherOutput::Buffer(buf) => *buf,
        _ => unreachable!(),
    };
    assert_eq!(decrypted, plain);
    println!("decrypted: {}", String::from_utf8_lossy(&decrypted));

    Ok(())
}
