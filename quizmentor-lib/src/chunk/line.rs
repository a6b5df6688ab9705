use crate::chunk::{char_boundary, Chunker};

/// Line-aware chunker - cuts after the last line break inside the window
///
/// Good for: PDF text, where every visual line ends with `\n`
///
/// Each chunk ends right after a `\n` when the `max_chars` window contains one,
/// so the break stays with the preceding line. When the window has no line
/// break the chunk is cut hard at `max_chars`. Nothing is trimmed.
pub struct LineChunker {
    pub max_chars: usize,
}

impl Default for LineChunker {
    fn default() -> Self {
        Self { max_chars: 1500 }
    }
}

impl Chunker for LineChunker {
    fn name(&self) -> &str {
        "line"
    }

    fn split<'a>(&self, content: &'a str) -> Vec<&'a str> {
        if content.is_empty() || self.max_chars == 0 {
            return vec![content];
        }

        let mut pieces = Vec::new();
        let mut rest = content;
        while !rest.is_empty() {
            let window_end = char_boundary(rest, self.max_chars);
            let end = if window_end == rest.len() {
                // remainder fits
                window_end
            } else {
                match rest[..window_end].rfind('\n') {
                    Some(i) => i + 1,
                    None => window_end,
                }
            };

            let (piece, tail) = rest.split_at(end);
            pieces.push(piece);
            rest = tail;
        }
        pieces
    }
}
