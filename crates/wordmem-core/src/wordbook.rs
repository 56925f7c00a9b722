use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use wordmem_types::WordEntry;

use crate::error::CoreError;

// JSON structures for the wordbook format:
// [{"word": "...", "translations": [{"type": "n", "translation": "..."}]}]
#[derive(Debug, Deserialize)]
struct RawWordRecord {
    word: Option<String>,
    translations: Option<Vec<Option<TranslationItem>>>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    translation: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct WordbookLoader;

impl WordbookLoader {
    /// Load and normalize a wordbook file.
    ///
    /// Invalid records are skipped and logged. Only I/O failures and a
    /// malformed top-level document are errors.
    pub fn load(path: &Path) -> Result<Vec<WordEntry>, CoreError> {
        if !path.exists() {
            return Err(CoreError::not_found(path, None));
        }

        let bytes = fs::read(path).map_err(|e| CoreError::not_found(path, Some(e)))?;
        let text = String::from_utf8(bytes).map_err(|e| CoreError::parse(path, e))?;

        let entries = Self::parse_str(&text, path)?;
        tracing::info!(
            "Loaded {} words from {}",
            entries.len(),
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        Ok(entries)
    }

    /// Parse wordbook text. `source` is only used in errors and logs.
    pub fn parse_str(text: &str, source: &Path) -> Result<Vec<WordEntry>, CoreError> {
        let document: Value = serde_json::from_str(text).map_err(|e| CoreError::parse(source, e))?;

        let Value::Array(records) = document else {
            return Err(CoreError::parse(
                source,
                "expected a top-level array of word objects",
            ));
        };

        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            let record = match record {
                Value::Object(_) => record,
                Value::Null => {
                    tracing::warn!("Skipping null record #{index} in {}", source.display());
                    skipped += 1;
                    continue;
                }
                _ => {
                    return Err(CoreError::parse(
                        source,
                        format!("record #{index} is not an object"),
                    ));
                }
            };

            match serde_json::from_value::<RawWordRecord>(record) {
                Ok(raw) => match normalize(raw) {
                    Some(entry) => entries.push(entry),
                    None => skipped += 1,
                },
                Err(e) => {
                    tracing::warn!("Skipping malformed record #{index} in {}: {e}", source.display());
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {skipped} invalid records in {}", source.display());
        }

        Ok(entries)
    }
}

fn normalize(raw: RawWordRecord) -> Option<WordEntry> {
    let word = match raw.word.as_deref().map(str::trim) {
        Some(word) if !word.is_empty() => word,
        _ => {
            tracing::warn!("Skipping record with missing or empty 'word'");
            return None;
        }
    };

    let translation = combine_translations(raw.translations.as_deref().unwrap_or_default());
    if translation.is_empty() {
        tracing::warn!("Skipping '{word}': no valid translations");
        return None;
    }

    Some(WordEntry::new(word, translation))
}

/// "n. ability; skill" from `[{n, ability}, {None, skill}]`
fn combine_translations(items: &[Option<TranslationItem>]) -> String {
    items
        .iter()
        .flatten()
        .filter_map(|item| {
            let text = item.translation.as_deref()?.trim();
            if text.is_empty() {
                return None;
            }
            Some(match item.kind.as_deref().map(str::trim) {
                Some(kind) if !kind.is_empty() => format!("{kind}. {text}"),
                _ => text.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(text: &str) -> Result<Vec<WordEntry>, CoreError> {
        WordbookLoader::parse_str(text, Path::new("test.json"))
    }

    #[test]
    fn test_combines_typed_and_untyped() {
        let entries = parse(
            r#"[{"word": "ability", "translations": [
                {"type": "n", "translation": "ability"},
                {"type": null, "translation": "skill"}
            ]}]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word(), "ability");
        assert_eq!(entries[0].translation(), "n. ability; skill");
    }

    #[test]
    fn test_skips_invalid_records_in_order() {
        let entries = parse(
            r#"[
                {"word": "first", "translations": [{"translation": "one"}]},
                {"word": "   ", "translations": [{"translation": "blank word"}]},
                {"translations": [{"translation": "no word"}]},
                {"word": "empty", "translations": [{"type": "n", "translation": "  "}]},
                {"word": "none"},
                {"word": 42, "translations": []},
                null,
                {"word": " second ", "translations": [{"type": " v ", "translation": " two "}]}
            ]"#,
        )
        .unwrap();

        let words: Vec<_> = entries.iter().map(WordEntry::word).collect();
        assert_eq!(words, ["first", "second"]);
        assert_eq!(entries[1].translation(), "v. two");
    }

    #[test]
    fn test_keeps_duplicate_words() {
        let entries = parse(
            r#"[
                {"word": "bank", "translations": [{"translation": "river side"}]},
                {"word": "bank", "translations": [{"translation": "institution"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].translation(), "institution");
    }

    #[test]
    fn test_zero_valid_records_is_empty() {
        assert!(parse("[]").unwrap().is_empty());
        assert!(parse(r#"[{"word": ""}]"#).unwrap().is_empty());
    }

    #[test]
    fn test_not_an_array_is_parse_error() {
        assert!(matches!(parse(r#""not an array""#), Err(CoreError::Parse { .. })));
        assert!(matches!(parse(r#"{"word": "x"}"#), Err(CoreError::Parse { .. })));
        assert!(matches!(parse("[1, 2]"), Err(CoreError::Parse { .. })));
        assert!(matches!(parse("[{"), Err(CoreError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("missing.json");
        assert!(matches!(
            WordbookLoader::load(&path),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        fs::write(
            &path,
            r#"[{"word": "abandon", "translations": [{"type": "v", "translation": "give up"}]}]"#,
        )
        .unwrap();

        let entries = WordbookLoader::load(&path).unwrap();
        assert_eq!(entries, vec![WordEntry::new("abandon", "v. give up")]);
    }

    #[test]
    fn test_load_not_an_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#""not an array""#).unwrap();

        assert!(matches!(
            WordbookLoader::load(&path),
            Err(CoreError::Parse { .. })
        ));
    }
}
