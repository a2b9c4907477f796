//! Deterministic keyed hashing of entity text

use std::fmt;

use scrub_core::Result;

use crate::entity::DetectedEntity;

const KEY_CONTEXT: &str = "scrub 2024-06 entity hashing key";

/// Lowercase and collapse whitespace so that spelling variants of the same
/// value hash identically.
pub fn normalize_entity_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Replaces entity spans with `<ENTITY_TYPE:digest>` tokens.
///
/// The digest is a keyed BLAKE3 hash of the normalized entity text,
/// truncated to `digest_len` hex characters. Identical values hash
/// identically across documents as long as the secret is unchanged.
#[derive(Clone)]
pub struct EntityHasher {
    key: [u8; 32],
    digest_len: usize,
}

impl EntityHasher {
    pub fn new(secret: &str, digest_len: usize) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
            digest_len: digest_len.clamp(1, 64),
        }
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    pub fn digest(&self, text: &str) -> String {
        let normalized = normalize_entity_text(text);
        let hash = blake3::keyed_hash(&self.key, normalized.as_bytes());
        let mut hex = hash.to_hex().to_string();
        hex.truncate(self.digest_len);
        hex
    }

    pub fn token(&self, entity_type: &str, text: &str) -> String {
        format!("<{}:{}>", entity_type, self.digest(text))
    }

    /// Splice tokens into `text` for every entity.
    ///
    /// Entities must not overlap. Splicing runs from the last span to the
    /// first so earlier offsets stay valid.
    pub fn redact(&self, text: &str, entities: &[DetectedEntity]) -> Result<String> {
        let mut ordered: Vec<&DetectedEntity> = entities.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut output = text.to_string();
        for entity in ordered {
            let original = entity.text_in(text)?;
            let token = self.token(&entity.entity_type, original);
            output.replace_range(entity.start..entity.end, &token);
        }

        Ok(output)
    }
}

impl fmt::Debug for EntityHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHasher")
            .field("key", &"<redacted>")
            .field("digest_len", &self.digest_len)
            .finish()
    }
}
