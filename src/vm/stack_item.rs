//! Stack item representation
//!
//! A [`StackItem`] is the raw byte sequence the VM keeps on its data and
//! alternate stacks. The VM itself gives bytes meaning only when an opcode
//! consumes them, so this module offers the interpretations a viewer needs:
//!
//! - [`StackItem::as_script_number`]: little-endian sign-magnitude integer
//! - [`StackItem::as_bool`]: VM truthiness (negative zero is false)
//! - [`StackItem::is_canonical_one`]: the single value a clean stack may hold
//!
//! Items travel through template documents as hex strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest byte sequence decoded as a script number
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 8;

/// A byte sequence on a VM stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackItem(pub Vec<u8>);

/// How a stack item should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    /// `0x` followed by the bytes in hex
    Hex,
    /// Script number, falling back to hex when too long
    Number,
    /// Number for short items, hex otherwise
    Auto,
}

impl StackItem {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        StackItem(bytes.into())
    }

    pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(value.trim_start_matches("0x")).map(StackItem)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret as a VM boolean.
    ///
    /// Every zero byte is false, and so is a trailing `0x80` after zeros
    /// (negative zero).
    pub fn as_bool(&self) -> bool {
        match self.0.split_last() {
            None => false,
            Some((&last, rest)) => rest.iter().any(|&b| b != 0) || (last != 0 && last != 0x80),
        }
    }

    /// Decode as a script number.
    ///
    /// Returns `None` for items longer than [`MAX_SCRIPT_NUMBER_LENGTH`].
    /// Non-minimal encodings decode to their numeric value.
    pub fn as_script_number(&self) -> Option<i64> {
        let Some((&last, _)) = self.0.split_last() else {
            return Some(0);
        };
        if self.0.len() > MAX_SCRIPT_NUMBER_LENGTH {
            return None;
        }

        let mut magnitude: u64 = 0;
        for (i, &byte) in self.0.iter().enumerate() {
            magnitude |= u64::from(byte) << (8 * i);
        }

        if last & 0x80 != 0 {
            let sign_bit = 0x80u64 << (8 * (self.0.len() - 1));
            Some(-((magnitude & !sign_bit) as i64))
        } else {
            Some(magnitude as i64)
        }
    }

    /// True only for the single-byte encoding of `1`.
    ///
    /// `[0x01, 0x00]` decodes to 1 but is not minimally encoded, so it does
    /// not qualify.
    pub fn is_canonical_one(&self) -> bool {
        self.0.as_slice() == [0x01]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn format(&self, format: ItemFormat) -> String {
        match format {
            ItemFormat::Hex => format!("0x{}", self.to_hex()),
            ItemFormat::Number => match self.as_script_number() {
                Some(n) => n.to_string(),
                None => self.format(ItemFormat::Hex),
            },
            ItemFormat::Auto => {
                if self.0.len() <= 4 {
                    self.format(ItemFormat::Number)
                } else {
                    self.format(ItemFormat::Hex)
                }
            }
        }
    }
}

impl TryFrom<String> for StackItem {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StackItem::from_hex(&value)
    }
}

impl From<StackItem> for String {
    fn from(item: StackItem) -> Self {
        item.to_hex()
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(bytes: Vec<u8>) -> Self {
        StackItem(bytes)
    }
}

impl fmt::Display for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(ItemFormat::Hex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_numbers() {
        assert_eq!(StackItem::new(vec![]).as_script_number(), Some(0));
        assert_eq!(StackItem::new(vec![0x01]).as_script_number(), Some(1));
        assert_eq!(StackItem::new(vec![0x81]).as_script_number(), Some(-1));
        assert_eq!(StackItem::new(vec![0xff, 0x00]).as_script_number(), Some(255));
        assert_eq!(StackItem::new(vec![0xe8, 0x83]).as_script_number(), Some(-1000));
        assert_eq!(StackItem::new(vec![0x01; 9]).as_script_number(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!StackItem::new(vec![]).as_bool());
        assert!(!StackItem::new(vec![0x00, 0x00]).as_bool());
        assert!(!StackItem::new(vec![0x00, 0x80]).as_bool());
        assert!(StackItem::new(vec![0x80, 0x00]).as_bool());
        assert!(StackItem::new(vec![0x02]).as_bool());
    }

    #[test]
    fn test_canonical_one() {
        assert!(StackItem::new(vec![0x01]).is_canonical_one());
        assert!(!StackItem::new(vec![0x01, 0x00]).is_canonical_one());
        assert!(!StackItem::new(vec![0x02]).is_canonical_one());
        assert!(!StackItem::new(vec![]).is_canonical_one());
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(StackItem::from_hex("0x0102").unwrap().as_bytes(), &[1, 2]);
        assert_eq!(StackItem::from_hex("").unwrap(), StackItem::default());
        assert!(StackItem::from_hex("zz").is_err());

        let item: StackItem = serde_json::from_str("\"ab\"").unwrap();
        assert_eq!(item.as_bytes(), &[0xab]);
    }

    #[test]
    fn test_formatting() {
        let short = StackItem::new(vec![0x81]);
        assert_eq!(short.format(ItemFormat::Auto), "-1");
        assert_eq!(short.format(ItemFormat::Hex), "0x81");

        let long = StackItem::new(vec![0x02; 33]);
        assert!(long.format(ItemFormat::Auto).starts_with("0x0202"));
        assert_eq!(StackItem::default().format(ItemFormat::Hex), "0x");
    }
}
