//! Text chunking for source documents
//!
//! Chunks are measured in chars, never bytes, so accented Spanish text is
//! never cut inside a code point.

use crate::config::ChunkerConfig;

/// Splits text into overlapping chunks of bounded length
///
/// Each chunk is at most `chunk_size` chars. A chunk prefers to end just
/// after the last paragraph break, newline or space in the second half of
/// its window; with no such boundary it is cut hard at `chunk_size`. The
/// next chunk starts exactly `chunk_overlap` chars before the previous end,
/// so dropping the first `chunk_overlap` chars of every chunk but the first
/// and concatenating gives back the input.
///
/// # Examples
///
/// ```
/// use perito_rag::{ChunkerConfig, TextChunker};
///
/// let chunker = TextChunker::new(ChunkerConfig { chunk_size: 10, chunk_overlap: 2 });
/// let chunks = chunker.split("abcdefghijklmnop");
/// assert_eq!(chunks, vec!["abcdefghij", "ijklmnop"]);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new text chunker
    ///
    /// Configs are validated by [`ChunkerConfig::validate`]; an overlap that
    /// is not smaller than the chunk size is clamped here so splitting
    /// always makes progress.
    pub fn new(config: ChunkerConfig) -> Self {
        let chunk_size = config.chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: config.chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Target chunk length in chars
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive chunks in chars
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split the given text into ordered chunks
    ///
    /// Empty or whitespace-only input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let end = if hard_end < total {
                self.soft_end(&chars, start, hard_end)
            } else {
                hard_end
            };

            chunks.push(chars[start..end].iter().collect());

            if end >= total {
                break;
            }
            start = end - self.chunk_overlap;
        }

        chunks
    }

    /// Pick where a non-final chunk ends
    ///
    /// Boundaries are only searched past both the middle of the window and
    /// the overlap, so the next chunk always starts after this one.
    fn soft_end(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let floor = start + (self.chunk_size / 2).max(self.chunk_overlap + 1);
        if floor >= hard_end {
            return hard_end;
        }
        let window = &chars[floor..hard_end];

        let paragraph = window
            .windows(2)
            .rposition(|pair| pair[0] == '\n' && pair[1] == '\n')
            .map(|i| i + 2);
        let newline = || window.iter().rposition(|&c| c == '\n').map(|i| i + 1);
        let space = || window.iter().rposition(|c| c.is_whitespace()).map(|i| i + 1);

        paragraph
            .or_else(newline)
            .or_else(space)
            .map(|offset| floor + offset)
            .unwrap_or(hard_end)
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}
