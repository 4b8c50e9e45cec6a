//! Text post-processing shared by every extraction path.

pub mod chunker;
pub mod normalizer;

pub use chunker::{BATCH_SIZE, Batch, CHUNK_CHAR_BUDGET, batch_chunks, chunk_text, split_sentences};
pub use normalizer::normalize;

/// Normalised text cut into chunks and regrouped into batches, concatenated
/// into the final payload.
pub fn segment(text: &str) -> String {
    let chunks = chunk_text(text, CHUNK_CHAR_BUDGET);
    batch_chunks(&chunks, BATCH_SIZE)
        .iter()
        .map(Batch::text)
        .collect()
}
