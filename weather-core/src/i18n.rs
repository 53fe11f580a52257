use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Languages the console can be displayed in.
///
/// The code doubles as the `lang` parameter sent to the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    /// Name shown in the language selection menu, in its own language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
        }
    }

    /// Languages in the order they are listed in the selection menu.
    pub const fn all() -> &'static [Language] {
        &[Language::English, Language::Spanish]
    }

    /// Maps a 1-based menu option to a language.
    pub fn from_option(option: u32) -> Option<Language> {
        let index = usize::try_from(option).ok()?.checked_sub(1)?;
        Self::all().get(index).copied()
    }

    /// Translation file for this language inside `dir`.
    pub fn texts_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("texts_{}.txt", self.code()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Language {
    type Error = TranslationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "en" => Ok(Language::English),
            "es" => Ok(Language::Spanish),
            _ => Err(TranslationError::UnknownLanguage(value.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Error, {} file not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read translation file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed translation entry on line {line}: expected `key=value`")]
    Malformed { line: usize },

    #[error("Unknown language code '{0}'. Supported languages: en, es.")]
    UnknownLanguage(String),

    #[error("Missing translation key '{0}'")]
    MissingKey(String),

    #[error("Translation file is missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Translation '{key}' expects {expected} value(s) but {given} were supplied")]
    PlaceholderMismatch {
        key: String,
        expected: usize,
        given: usize,
    },
}

/// Flat message table for one language, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    /// Reads `texts_<code>.txt` from `dir`.
    pub fn load(dir: &Path, language: Language) -> Result<Self, TranslationError> {
        let path = language.texts_path(dir);

        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                TranslationError::FileNotFound(path.clone())
            } else {
                TranslationError::Io { path: path.clone(), source }
            }
        })?;

        let translations = Self::parse(&contents)?;
        tracing::debug!(
            path = %path.display(),
            entries = translations.len(),
            "loaded translations"
        );

        Ok(translations)
    }

    /// Parses `key=value` lines, splitting on the first `=`.
    pub fn parse(contents: &str) -> Result<Self, TranslationError> {
        let mut entries = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or(TranslationError::Malformed { line: idx + 1 })?;

            entries.insert(key.trim().to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<&str, TranslationError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TranslationError::MissingKey(key.to_string()))
    }

    /// Fails with every absent key at once, so an inconsistent file is
    /// reported before anything is displayed.
    pub fn require(&self, keys: &[&str]) -> Result<(), TranslationError> {
        let missing: Vec<String> = keys
            .iter()
            .filter(|key| !self.entries.contains_key(**key))
            .map(|key| key.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TranslationError::MissingKeys(missing))
        }
    }

    /// Fills the `{}` placeholders of `key` with `args`, in order.
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> Result<String, TranslationError> {
        let template = self.get(key)?;
        let pieces: Vec<&str> = template.split("{}").collect();
        let expected = pieces.len() - 1;

        if expected != args.len() {
            return Err(TranslationError::PlaceholderMismatch {
                key: key.to_string(),
                expected,
                given: args.len(),
            });
        }

        let mut out = String::with_capacity(template.len());
        for (piece, arg) in pieces.iter().zip(args) {
            out.push_str(piece);
            out.push_str(&arg.to_string());
        }
        out.push_str(pieces[expected]);

        Ok(out)
    }
}
