//! Binary descriptor format
//!
//! Descriptors are stored as postcard-serialized binary data, e.g. in a
//! flash partition next to the firmware image.

use tft_setup_core::{DisplayConfig, CONFIG_VERSION};

/// Maximum serialized descriptor size
pub const MAX_BINARY_SIZE: usize = 64;

/// Binary codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BinaryError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Descriptor version mismatch
    VersionMismatch { found: u8 },
}

/// Serialize a descriptor into `buf`, returning the used part
pub fn encode<'a>(
    config: &DisplayConfig,
    buf: &'a mut [u8],
) -> Result<&'a mut [u8], BinaryError> {
    postcard::to_slice(config, buf).map_err(|_| BinaryError::Serialize)
}

/// Deserialize a descriptor
pub fn decode(bytes: &[u8]) -> Result<DisplayConfig, BinaryError> {
    let config: DisplayConfig =
        postcard::from_bytes(bytes).map_err(|_| BinaryError::Deserialize)?;

    // Version check
    if config.version != CONFIG_VERSION {
        warn!(
            "Descriptor version mismatch: found {}, expected {}",
            config.version,
            CONFIG_VERSION
        );
        return Err(BinaryError::VersionMismatch {
            found: config.version,
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tft_setup_core::setups::{ILI9341_TOUCH_ESP, SETUP_11_ESP};

    #[test]
    fn test_encode_decode() {
        for config in [SETUP_11_ESP, ILI9341_TOUCH_ESP] {
            let mut buf = [0u8; MAX_BINARY_SIZE];
            let bytes = encode(&config, &mut buf).unwrap();
            assert_eq!(decode(bytes), Ok(config));
        }
    }

    #[test]
    fn test_version_mismatch() {
        let mut config = SETUP_11_ESP;
        config.version = CONFIG_VERSION + 1;

        let mut buf = [0u8; MAX_BINARY_SIZE];
        let bytes = encode(&config, &mut buf).unwrap();
        assert_eq!(
            decode(bytes),
            Err(BinaryError::VersionMismatch {
                found: CONFIG_VERSION + 1
            })
        );
    }

    #[test]
    fn test_truncated() {
        let mut buf = [0u8; MAX_BINARY_SIZE];
        let len = encode(&SETUP_11_ESP, &mut buf).unwrap().len();
        assert_eq!(decode(&buf[..len / 2]), Err(BinaryError::Deserialize));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode(&SETUP_11_ESP, &mut buf).map(|b| b.len()),
            Err(BinaryError::Serialize)
        );
    }
}
