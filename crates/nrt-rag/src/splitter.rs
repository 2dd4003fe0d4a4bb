//! Recursive character text splitter

use std::collections::VecDeque;

/// Target chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Characters shared between adjacent chunks of the same document.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Splits text into overlapping chunks using an ordered separator
/// preference: paragraph breaks first, then line breaks, then sentence
/// punctuation, then commas. A chunk never exceeds the target length plus
/// the separator it was split on; runs with no separator at all are
/// hard-split at character boundaries.
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// Create a splitter. `chunk_overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        debug_assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size,
            chunk_overlap,
            separators: vec!["\n\n", "\n", ".", ","],
        }
    }

    /// Split `text` into chunks, trimmed, with empty pieces dropped.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        self.split_with(text, &self.separators)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    fn split_with(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some(pos) = separators.iter().position(|sep| text.contains(sep)) else {
            return self.hard_split(text);
        };
        let sep = separators[pos];
        let rest = &separators[pos + 1..];

        let mut final_chunks = Vec::new();
        let mut buffer: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, sep) {
            if char_len(&piece) <= self.chunk_size {
                buffer.push(piece);
            } else {
                // Oversized piece: flush what we have, then descend to the
                // next separator in the preference order.
                if !buffer.is_empty() {
                    final_chunks.extend(self.merge(std::mem::take(&mut buffer)));
                }
                final_chunks.extend(self.split_with(&piece, rest));
            }
        }

        if !buffer.is_empty() {
            final_chunks.extend(self.merge(buffer));
        }

        final_chunks
    }

    /// Greedily merge small pieces into chunks up to the target size,
    /// carrying up to `chunk_overlap` characters of trailing pieces into
    /// the next chunk.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(String, usize)> = VecDeque::new();
        let mut window_len = 0;

        for piece in pieces {
            let piece_len = char_len(&piece);

            if window_len + piece_len > self.chunk_size && !window.is_empty() {
                chunks.push(concat_window(&window));

                while window_len > self.chunk_overlap
                    || (window_len + piece_len > self.chunk_size && !window.is_empty())
                {
                    match window.pop_front() {
                        Some((_, popped_len)) => window_len -= popped_len,
                        None => break,
                    }
                }
            }

            window_len += piece_len;
            window.push_back((piece, piece_len));
        }

        if !window.is_empty() {
            chunks.push(concat_window(&window));
        }

        chunks
    }

    /// Fallback for text with none of the preferred separators: fixed
    /// character windows stepping by size minus overlap.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());

            if end >= chars.len() {
                break;
            }

            start = end - self.chunk_overlap;
        }

        chunks
    }
}

/// Split on `sep`, keeping the separator attached to the end of the piece
/// it terminates so that merged chunks reproduce the original text.
fn split_keeping_separator(text: &str, sep: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(idx) = rest.find(sep) {
        let end = idx + sep.len();
        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces.retain(|piece| !piece.is_empty());
    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn concat_window(window: &VecDeque<(String, usize)>) -> String {
    window.iter().map(|(piece, _)| piece.as_str()).collect()
}
