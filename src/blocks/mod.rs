//! Deterministic decomposition of a message into an ordered sequence of
//! blocks. Two file types, two split strategies; the CFF never looks inside
//! a block, only at its index.

mod image;
mod text;

use crate::error::ParamError;
use std::fmt;
use std::str::FromStr;

/// Which splitter interprets the input bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FileType {
    Text,
    Image,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Text => "text",
            FileType::Image => "image",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FileType::Text),
            "image" => Ok(FileType::Image),
            other => Err(ParamError::UnknownFileType(other.to_string())),
        }
    }
}

/// How the block count/size is chosen.
#[derive(Clone, Copy, Debug)]
pub enum SplitStrategy {
    /// Emit one block per `s` units (completed lines for text, tile side for image).
    FixedSize(usize),
    /// Choose `s` so the input divides into (approximately) `k` blocks.
    FixedCount(usize),
}

/// The result of splitting a message: the ordered blocks plus enough
/// bookkeeping to rebuild the CFF and re-derive the same split later.
#[derive(Clone, Debug)]
pub struct BlockedMessage {
    pub file_type: FileType,
    pub original_bytes: Vec<u8>,
    pub blocks: Vec<Vec<u8>>,
    /// The effective block-size parameter actually used (after a FixedCount
    /// strategy has been resolved to a concrete size).
    pub block_size: u64,
}

impl BlockedMessage {
    pub fn n(&self) -> usize {
        self.blocks.len()
    }
}

/// Split `bytes` per `file_type`/`strategy`.
pub fn split(
    bytes: &[u8],
    file_type: FileType,
    strategy: SplitStrategy,
) -> Result<BlockedMessage, ParamError> {
    match file_type {
        FileType::Text => text::split_text(bytes, strategy),
        FileType::Image => image::split_image(bytes, strategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_round_trips() {
        assert_eq!("text".parse::<FileType>().unwrap(), FileType::Text);
        assert_eq!("image".parse::<FileType>().unwrap(), FileType::Image);
        assert!("audio".parse::<FileType>().is_err());
    }
}
