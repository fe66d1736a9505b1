use model::execution::params::MetadataMap;
use rand::Rng;
use std::path::Path;
use tracing::warn;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Replaces every alphabetic character with a random ASCII letter, keeping
/// everything else (digits, spaces, punctuation) in place.
pub fn scramble<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphabetic() {
                LETTERS[rng.gen_range(0..LETTERS.len())] as char
            } else {
                c
            }
        })
        .collect()
}

/// Placeholder metadata used when the user supplied none.
pub fn placeholder_metadata() -> MetadataMap {
    let mut rng = rand::thread_rng();
    let mut meta = MetadataMap::new();
    // Static keys; insert cannot fail.
    let _ = meta.insert("Title", scramble("Untitled", &mut rng));
    let _ = meta.insert("Author", scramble("Anonymous", &mut rng));
    meta
}

/// One entry per line: line `i` becomes `Custom{i}` with the trimmed line as
/// its value. Blank lines keep their slot.
pub fn parse_metadata_lines(content: &str) -> MetadataMap {
    let mut meta = MetadataMap::new();
    for (idx, line) in content.lines().enumerate() {
        let _ = meta.insert(format!("Custom{idx}"), line.trim());
    }
    meta
}

/// Loads metadata from a text file, falling back to placeholder metadata when
/// the file cannot be read.
pub fn load_metadata_file(path: &Path) -> MetadataMap {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_metadata_lines(&content),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Cannot read metadata file, using generated metadata");
            placeholder_metadata()
        }
    }
}
