use base64::Engine;

/// Base64 image body for exactly one recognition request.
#[derive(Clone)]
pub struct EncodedPayload {
    pub content: String,
    pub format: Option<image::ImageFormat>,
    pub byte_length: usize,
}

impl std::fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("format", &self.format)
            .field("byte_length", &self.byte_length)
            .field("encoded_length", &self.content.len())
            .finish()
    }
}

impl EncodedPayload {
    pub fn build_from_bytes(raw_bytes: &[u8]) -> Self {
        let format = image::guess_format(raw_bytes).ok();

        log::debug!(
            "[ENCODED_PAYLOAD] encoding {} bytes, format={:?}",
            raw_bytes.len(),
            format
        );

        Self {
            content: base64::engine::general_purpose::STANDARD.encode(raw_bytes),
            format,
            byte_length: raw_bytes.len(),
        }
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encoded_bytes_decode_back_to_original() {
        let raw_bytes: Vec<u8> = (0u8..=255).collect();

        let payload = EncodedPayload::build_from_bytes(&raw_bytes);

        assert_eq!(payload.decode_bytes().unwrap(), raw_bytes);
        assert_eq!(payload.byte_length, 256);
    }

    #[test]
    fn test_known_bytes_use_standard_padded_alphabet() {
        let payload = EncodedPayload::build_from_bytes(b"SpO2");

        assert_eq!(payload.content, "U3BPMg==");
        assert_eq!(payload.format, None);
    }

    #[test]
    fn test_png_signature_is_sniffed() {
        let mut raw_bytes = PNG_SIGNATURE.to_vec();
        raw_bytes.extend_from_slice(&[0u8; 16]);

        let payload = EncodedPayload::build_from_bytes(&raw_bytes);

        assert_eq!(payload.format, Some(image::ImageFormat::Png));
    }

    #[test]
    fn test_debug_output_hides_content() {
        let payload = EncodedPayload::build_from_bytes(b"secret image bytes");
        let debug_str = format!("{:?}", payload);

        assert!(!debug_str.contains(&payload.content));
        assert!(debug_str.contains("byte_length"));
    }
}
