/// ERC-20 Calldata Encoding
///
/// Builds the ABI-encoded calldata for the two transfer entry points the
/// engine uses. Layout per the ABI spec: 4-byte function selector, then
/// 32-byte words, addresses left-padded with zeros, amounts big-endian.
///
/// Selectors are the first 4 bytes of keccak256 of the canonical signature;
/// they are fixed constants of the ERC-20 standard, so they are written out
/// here instead of hashing at runtime.

use thiserror::Error;

/// `transfer(address,uint256)` 的选择子
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `transferFrom(address,address,uint256)` 的选择子
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

/// 编码错误
#[derive(Debug, Error, PartialEq)]
pub enum CalldataError {
    #[error("invalid address '{0}': expected 20 hex-encoded bytes")]
    InvalidAddress(String),

    #[error("hex decode failed: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// 把 0x 前缀的地址解码为 32 字节字（左侧补零）
fn address_word(address: &str) -> Result<[u8; 32], CalldataError> {
    let stripped = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let bytes = hex::decode(stripped)?;
    if bytes.len() != 20 {
        return Err(CalldataError::InvalidAddress(address.to_string()));
    }
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&bytes);
    Ok(word)
}

/// 把转账金额编码为 32 字节大端字
fn amount_word(amount: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&amount.to_be_bytes());
    word
}

/// `transfer(to, amount)` 的调用数据，0x 前缀十六进制
pub fn transfer_calldata(to: &str, amount: u128) -> Result<String, CalldataError> {
    let mut data = Vec::with_capacity(4 + 32 * 2);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    data.extend_from_slice(&address_word(to)?);
    data.extend_from_slice(&amount_word(amount));
    Ok(format!("0x{}", hex::encode(data)))
}

/// `transferFrom(from, to, amount)` 的调用数据，0x 前缀十六进制
pub fn transfer_from_calldata(
    from: &str,
    to: &str,
    amount: u128,
) -> Result<String, CalldataError> {
    let mut data = Vec::with_capacity(4 + 32 * 3);
    data.extend_from_slice(&TRANSFER_FROM_SELECTOR);
    data.extend_from_slice(&address_word(from)?);
    data.extend_from_slice(&address_word(to)?);
    data.extend_from_slice(&amount_word(amount));
    Ok(format!("0x{}", hex::encode(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUNDING: &str = "0x63A0bfd6a5cdCF446ae12135E2CD86b908659563";
    const SERVICE: &str = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238";

    #[test]
    fn transfer_calldata_layout() {
        let data = transfer_calldata(SERVICE, 1).unwrap();
        // 0x + (4 + 32 + 32) 字节
        assert_eq!(data.len(), 2 + 68 * 2);
        assert!(data.starts_with("0xa9059cbb"));
        // 地址左补 12 个零字节
        assert!(data[10..].starts_with("000000000000000000000000"));
        // 金额字以 ...01 结尾
        assert!(data.ends_with(
            "0000000000000000000000000000000000000000000000000000000000000001"
        ));
    }

    #[test]
    fn transfer_from_calldata_layout() {
        let data = transfer_from_calldata(FUNDING, SERVICE, 1_000_000).unwrap();
        assert_eq!(data.len(), 2 + 100 * 2);
        assert!(data.starts_with("0x23b872dd"));
        assert!(data.contains("63a0bfd6a5cdcf446ae12135e2cd86b908659563"));
        assert!(data.contains("1c7d4b196cb0c7b01d743fbc6116a902379c7238"));
        // 1_000_000 = 0xf4240
        assert!(data.ends_with(
            "00000000000000000000000000000000000000000000000000000000000f4240"
        ));
    }

    #[test]
    fn rejects_short_address() {
        let result = transfer_calldata("0x1234", 1);
        assert_eq!(
            result,
            Err(CalldataError::InvalidAddress("0x1234".to_string()))
        );
    }

    #[test]
    fn rejects_non_hex_address() {
        assert!(matches!(
            transfer_calldata("0xzz7d4b196cb0c7b01d743fbc6116a902379c7238", 1),
            Err(CalldataError::Hex(_))
        ));
    }
}
