use std::io;

use async_compression::tokio::bufread::{GzipDecoder, GzipEncoder};
use tokio::io::AsyncReadExt;

/// Gzip a payload when `should_compress` is set, otherwise hand it back untouched.
///
/// The output is a single gzip member with a zero mtime, so the same input
/// always produces the same bytes.
pub async fn encode(payload: Vec<u8>, should_compress: bool) -> io::Result<Vec<u8>> {
    if !should_compress {
        return Ok(payload);
    }

    let mut encoder = GzipEncoder::new(payload.as_slice());
    let mut compressed = Vec::with_capacity(payload.len() / 2 + 32);
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Inflate a gzip payload produced by [`encode`]
pub async fn decode(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = GzipDecoder::new(compressed);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload).await?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_passthrough_when_not_compressing() {
        let payload = b"body { color: red }".to_vec();
        let out = encode(payload.clone(), false).await.unwrap();
        assert_eq!(out, payload);
    }

    #[tokio::test]
    async fn test_compressed_output_is_gzip() {
        let payload = "<p>hello</p>".repeat(200).into_bytes();
        let out = encode(payload.clone(), true).await.unwrap();

        assert_ne!(out, payload);
        assert_eq!(&out[..2], &[0x1f, 0x8b]);
        assert!(out.len() < payload.len());
        assert_eq!(decode(&out).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_encoding_is_deterministic() {
        let payload = b"const answer = 42;".to_vec();
        let first = encode(payload.clone(), true).await.unwrap();
        let second = encode(payload, true).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_payload_round_trips() {
        let out = encode(Vec::new(), true).await.unwrap();
        assert!(!out.is_empty());
        assert!(decode(&out).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decode_rejects_garbage() {
        assert!(decode(b"definitely not gzip").await.is_err());
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let decoded = runtime.block_on(async {
                let encoded = encode(payload.clone(), true).await.unwrap();
                decode(&encoded).await.unwrap()
            });
            prop_assert_eq!(decoded, payload);
        }
    }
}
