//! Address codec boundary

/// Converts between display addresses and their canonical form
pub trait AddressCodec: Send + Sync {
    /// Canonical form of `input`, or `None` if it is not an address
    fn decode(&self, input: &str) -> Option<String>;

    /// Display form of a canonical address for a network prefix
    fn encode(&self, canonical: &str, prefix: u16) -> String;

    fn is_address(&self, input: &str) -> bool {
        self.decode(input).is_some()
    }
}

/// Codec for `0x`-prefixed 32-byte public keys
///
/// Hex keys carry no network prefix, so encoding returns the canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexAddressCodec;

impl AddressCodec for HexAddressCodec {
    fn decode(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        let payload = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))?;
        let bytes = hex::decode(payload).ok()?;
        (bytes.len() == 32).then(|| format!("0x{}", hex::encode(bytes)))
    }

    fn encode(&self, canonical: &str, _prefix: u16) -> String {
        canonical.to_lowercase()
    }
}
