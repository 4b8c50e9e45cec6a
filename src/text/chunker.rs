use regex::Regex;
use std::sync::LazyLock;

/// Advisory size of one chunk, in characters.
pub const CHUNK_CHAR_BUDGET: usize = 500;

/// Maximum number of chunks per batch.
pub const BATCH_SIZE: usize = 4;

// Terminal punctuation (optionally closed by a quote) followed by whitespace.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?。！？…]+["'”’]?\s+"#).unwrap());

/// Splits `text` into trimmed sentences. The whitespace after a sentence's
/// terminal punctuation is the boundary and is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        let sentence = text[start..boundary.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = boundary.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Greedily packs whole sentences into chunks of at most `budget` characters.
///
/// A sentence longer than the budget becomes its own oversized chunk; it is
/// never split.
pub fn chunk_text(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();
        let joined_chars = if buffer.is_empty() {
            sentence_chars
        } else {
            buffer_chars + 1 + sentence_chars
        };

        if joined_chars > budget && !buffer.is_empty() {
            chunks.push(std::mem::take(&mut buffer));
            buffer_chars = 0;
        }

        if !buffer.is_empty() {
            buffer.push(' ');
            buffer_chars += 1;
        }
        buffer.push_str(sentence);
        buffer_chars += sentence_chars;
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }
    chunks
}

/// A run of consecutive chunks sent downstream together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    chunks: Vec<String>,
}

impl Batch {
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn text(&self) -> String {
        self.chunks.join("\n")
    }
}

/// Groups chunks into batches of at most `size`, dropping blank batches.
pub fn batch_chunks(chunks: &[String], size: usize) -> Vec<Batch> {
    chunks
        .chunks(size.max(1))
        .map(|run| Batch {
            chunks: run.to_vec(),
        })
        .filter(|batch| !batch.text().trim().is_empty())
        .collect()
}
