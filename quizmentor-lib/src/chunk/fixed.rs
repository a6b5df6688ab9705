use crate::chunk::{char_boundary, Chunker};

/// Fixed-size chunker - slices every `max_chars` characters
///
/// Ignores word and line boundaries entirely. Every chunk except possibly the
/// last holds exactly `max_chars` characters. A `max_chars` of zero disables
/// splitting.
pub struct FixedChunker {
    pub max_chars: usize,
}

impl Default for FixedChunker {
    fn default() -> Self {
        Self { max_chars: 1000 }
    }
}

impl Chunker for FixedChunker {
    fn name(&self) -> &str {
        "fixed"
    }

    fn split<'a>(&self, content: &'a str) -> Vec<&'a str> {
        if content.is_empty() || self.max_chars == 0 {
            return vec![content];
        }

        let mut pieces = Vec::with_capacity(content.len() / self.max_chars + 1);
        let mut rest = content;
        while !rest.is_empty() {
            // determine end of slice on a utf8 char boundary
            let end = char_boundary(rest, self.max_chars);
            let (piece, tail) = rest.split_at(end);
            pieces.push(piece);
            rest = tail;
        }
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunking() {
        let chunker = FixedChunker { max_chars: 10 };
        let content = "0123456789abcdefghij"; // 20 chars
        let chunks = chunker.chunk(content);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "0123456789");
        assert_eq!(chunks[1].content, "abcdefghij");
    }

    #[test]
    fn test_short_tail() {
        let chunker = FixedChunker { max_chars: 8 };
        let pieces = chunker.split("0123456789abcdefghij");

        assert_eq!(pieces, vec!["01234567", "89abcdef", "ghij"]);
    }

    #[test]
    fn test_ignores_line_breaks() {
        let chunker = FixedChunker { max_chars: 4 };
        let pieces = chunker.split("ab\ncdef");

        assert_eq!(pieces, vec!["ab\nc", "def"]);
    }

    #[test]
    fn test_unicode_safety() {
        let chunker = FixedChunker { max_chars: 5 };
        let content = "Brûlure 👋 grave"; // emoji is 4 bytes

        let pieces = chunker.split(content);
        assert_eq!(pieces.concat(), content);
        for piece in &pieces {
            assert!(piece.chars().count() <= 5);
        }
    }

    #[test]
    fn test_same_content_same_id() {
        let chunker = FixedChunker { max_chars: 5 };
        let chunks = chunker.chunk("aaaaaaaaaa");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, chunks[1].id);
    }

    #[test]
    fn test_unique_ids() {
        let chunker = FixedChunker { max_chars: 5 };
        let chunks = chunker.chunk("aaaaabbbbb");

        assert_eq!(chunks.len(), 2);
        assert_ne!(chunks[0].id, chunks[1].id);
    }

    #[test]
    fn test_empty_content() {
        let chunker = FixedChunker { max_chars: 10 };
        let chunks = chunker.chunk("");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "");
    }

    #[test]
    fn test_zero_width_keeps_whole_text() {
        let chunker = FixedChunker { max_chars: 0 };
        assert_eq!(chunker.split("abc"), vec!["abc"]);
    }
}
