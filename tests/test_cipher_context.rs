#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use tempfile::NamedTempFile;

    use cipher_trace::crypto::cipher_context::CipherContext;
    use cipher_trace::crypto::cipher_types::{CipherInput, CipherMode, CipherOutput, PaddingMode};
    use cipher_trace::crypto::error::CipherError;
    use cipher_trace::crypto::feistel_cipher::FeistelCipher;
    use cipher_trace::crypto::feistel_network::FeistelNetwork;
    use cipher_trace::crypto::rotating_key_expansion::RotatingKeyExpansion;
    use cipher_trace::crypto::xor_transformation::XorTransformation;

    const BLOCK_SIZE: usize = 8;

    fn cipher() -> FeistelCipher {
        let network = FeistelNetwork::new(
            6,
            Arc::new(RotatingKeyExpansion::new(6)),
            Arc::new(XorTransformation),
        );
        FeistelCipher::new(network, BLOCK_SIZE)
    }

    fn context(mode: CipherMode, padding: PaddingMode, iv: Option<Vec<u8>>) -> CipherContext {
        let mut ctx = CipherContext::new(Box::new(cipher()), mode, padding, iv).unwrap();
        ctx.set_key(b"roundkey").unwrap();
        ctx
    }

    fn create_bytes(len: usize) -> Vec<u8> {
        use rand::RngCore;
        let mut buf = vec![0u8; len];
        rand::rng().fill_bytes(&mut buf);
        buf
    }

    async fn roundtrip(ctx: &CipherContext, plain: &[u8]) -> Vec<u8> {
        let mut enc_out = CipherOutput::Buffer(Box::new(Vec::new()));
        ctx.encrypt(CipherInput::Bytes(plain.to_vec()), &mut enc_out)
            .await
            .unwrap();
        let encrypted = match enc_out {
            CipherOutput::Buffer(buf) => *buf,
            _ => unreachable!(),
        };

        let mut dec_out = CipherOutput::Buffer(Box::new(Vec::new()));
        ctx.decrypt(CipherInput::Bytes(encrypted), &mut dec_out)
            .await
            .unwrap();
        match dec_out {
            CipherOutput::Buffer(buf) => *buf,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_ecb_pkcs7_encrypt_decrypt() {
        let ctx = context(CipherMode::ECB, PaddingMode::PKCS7, None);
        let plaintext = b"Hello, world!\n";

        assert_eq!(roundtrip(&ctx, plaintext).await, plaintext);
    }

    #[tokio::test]
    async fn test_cbc_ansi_x923_encrypt_decrypt() {
        let iv = Some(vec![0u8; BLOCK_SIZE]);
        let ctx = context(CipherMode::CBC, PaddingMode::ANSI_X923, iv);
        let plaintext = b"Hello, world!\n";

        assert_eq!(roundtrip(&ctx, plaintext).await, plaintext);
    }

    #[tokio::test]
    async fn test_cbc_iso10126_block_aligned_input() {
        let iv = Some(create_bytes(BLOCK_SIZE));
        let ctx = context(CipherMode::CBC, PaddingMode::ISO10126, iv);
        let plaintext = create_bytes(4 * BLOCK_SIZE);

        assert_eq!(roundtrip(&ctx, &plaintext).await, plaintext);
    }

    #[tokio::test]
    async fn test_ctr_arbitrary_length_input() {
        let iv = Some(create_bytes(BLOCK_SIZE));
        let ctx = context(CipherMode::CTR, PaddingMode::PKCS7, iv);
        let plaintext = create_bytes(1000 + 3);

        assert_eq!(roundtrip(&ctx, &plaintext).await, plaintext);
    }

    #[tokio::test]
    async fn test_empty_input_roundtrip() {
        for padding in [PaddingMode::PKCS7, PaddingMode::ANSI_X923, PaddingMode::Zeros] {
            let ctx = context(CipherMode::CBC, padding, Some(vec![1u8; BLOCK_SIZE]));
            assert_eq!(roundtrip(&ctx, b"").await, b"");
        }
    }

    #[tokio::test]
    async fn test_identical_plaintext_blocks_differ_under_cbc() {
        let ctx = context(CipherMode::CBC, PaddingMode::PKCS7, None);
        let plaintext = vec![0x42u8; 2 * BLOCK_SIZE];

        let mut out = CipherOutput::Buffer(Box::new(Vec::new()));
        ctx.encrypt(CipherInput::Bytes(plaintext), &mut out)
            .await
            .unwrap();
        let encrypted = match out {
            CipherOutput::Buffer(buf) => *buf,
            _ => unreachable!(),
        };

        assert_ne!(encrypted[..BLOCK_SIZE], encrypted[BLOCK_SIZE..2 * BLOCK_SIZE]);
    }

    #[tokio::test]
    async fn test_file_encrypt_decrypt() {
        let ctx = context(CipherMode::CBC, PaddingMode::PKCS7, Some(vec![3u8; BLOCK_SIZE]));
        let plaintext = create_bytes(100_000 + 5);

        let mut input_file = NamedTempFile::new().unwrap();
        input_file.write_all(&plaintext).unwrap();
        let input_path = input_file.path().to_string_lossy().into_owned();

        let encrypted_file = NamedTempFile::new().unwrap();
        let encrypted_path = encrypted_file.path().to_string_lossy().into_owned();

        ctx.encrypt(
            CipherInput::File(input_path),
            &mut CipherOutput::File(encrypted_path.clone()),
        )
        .await
        .unwrap();

        let mut decrypted_out = CipherOutput::Buffer(Box::new(Vec::new()));
        ctx.decrypt(CipherInput::File(encrypted_path), &mut decrypted_out)
            .await
            .unwrap();
        let decrypted = match decrypted_out {
            CipherOutput::Buffer(buf) => *buf,
            _ => unreachable!(),
        };

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_feedback_modes_rejected() {
        for mode in [CipherMode::CFB, CipherMode::OFB] {
            let result =
                CipherContext::new(Box::new(cipher()), mode, PaddingMode::PKCS7, None);
            assert!(matches!(result, Err(CipherError::InvalidCipherMode(_))));
        }
    }

    #[test]
    fn test_wrong_iv_size_rejected() {
        let result = CipherContext::new(
            Box::new(cipher()),
            CipherMode::CBC,
            PaddingMode::PKCS7,
            Some(vec![0u8; BLOCK_SIZE - 1]),
        );
        assert!(matches!(
            result,
            Err(CipherError::InvalidIvSize { block: 8, actual: 7 })
        ));
    }

    #[tokio::test]
    async fn test_misaligned_ciphertext_rejected() {
        let ctx = context(CipherMode::ECB, PaddingMode::PKCS7, None);

        let mut out = CipherOutput::Buffer(Box::new(Vec::new()));
        let result = ctx
            .decrypt(CipherInput::Bytes(vec![0u8; BLOCK_SIZE + 3]), &mut out)
            .await;
        assert!(matches!(result, Err(CipherError::MisalignedCiphertext(11))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut ctx =
            CipherContext::new(Box::new(cipher()), CipherMode::ECB, PaddingMode::PKCS7, None)
                .unwrap();
        assert!(matches!(ctx.set_key(b""), Err(CipherError::InvalidKeySize(0))));
    }
}
