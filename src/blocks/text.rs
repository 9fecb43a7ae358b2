use super::{BlockedMessage, FileType, SplitStrategy};
use crate::error::ParamError;

/// Split `bytes` into lines terminated by `0x0A`, each line keeping its
/// trailing newline byte (the final line keeps none if the file doesn't end
/// in one) so that concatenation always reproduces the input exactly.
fn lines_with_terminators(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            lines.push(&bytes[start..=i]);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }
    lines
}

fn round_to_usize(x: f64) -> usize {
    x.round().max(1.0) as usize
}

pub fn split_text(
    bytes: &[u8],
    strategy: SplitStrategy,
) -> Result<BlockedMessage, ParamError> {
    let lines = lines_with_terminators(bytes);
    let total_lines = lines.len().max(1);

    let s = match strategy {
        SplitStrategy::FixedSize(s) => s.max(1),
        SplitStrategy::FixedCount(k) => {
            let k = k.max(1);
            if k > total_lines {
                return Err(ParamError::BlockCountMismatch { k, actual: total_lines });
            }
            round_to_usize(total_lines as f64 / k as f64)
        }
    };

    let mut blocks = Vec::new();
    let mut current = Vec::new();
    let mut lines_in_current = 0usize;
    for line in &lines {
        current.extend_from_slice(line);
        lines_in_current += 1;
        if lines_in_current == s {
            blocks.push(std::mem::take(&mut current));
            lines_in_current = 0;
        }
    }
    if lines_in_current > 0 {
        blocks.push(current);
    }
    if blocks.is_empty() {
        // Empty input still yields exactly one (empty) block so n >= 1.
        blocks.push(Vec::new());
    }

    Ok(BlockedMessage {
        file_type: FileType::Text,
        original_bytes: bytes.to_vec(),
        blocks,
        block_size: s as u64,
    })
}
