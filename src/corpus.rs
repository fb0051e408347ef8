use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::from_str;

use crate::error::{TypoError, TypoResult};

static PASSAGE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/passages");

/// Reference text the user is asked to reproduce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    pub fn with_source(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: Some(source.into()),
        }
    }
}

/// Catalogues bundled into the binary.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    #[default]
    Classic,
    Quotes,
}

impl CorpusKind {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    name: String,
    passages: Vec<Passage>,
}

/// A fixed, non-empty catalogue of passages.
#[derive(Debug, Clone)]
pub struct Corpus {
    name: String,
    passages: Vec<Passage>,
}

impl Corpus {
    /// Builds a catalogue, rejecting empty catalogues and empty passage texts.
    pub fn from_passages(name: impl Into<String>, passages: Vec<Passage>) -> TypoResult<Self> {
        let name = name.into();
        if passages.is_empty() {
            return Err(TypoError::EmptyCorpus(name));
        }
        if let Some(index) = passages.iter().position(|p| p.text.is_empty()) {
            return Err(TypoError::EmptyPassage {
                corpus: name,
                index,
            });
        }
        Ok(Self { name, passages })
    }

    pub fn bundled(kind: CorpusKind) -> TypoResult<Self> {
        let file_name = kind.file_name();
        let contents = PASSAGE_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| TypoError::MissingCorpus(file_name.clone()))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> TypoResult<Self> {
        let file: CorpusFile = from_str(json)?;
        Self::from_passages(file.name, file.passages)
    }

    /// Single-passage catalogue for a user supplied prompt.
    pub fn custom(text: impl Into<String>) -> TypoResult<Self> {
        Self::from_passages("custom", vec![Passage::new(text)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn pick_passage(&self) -> Passage {
        self.pick_passage_with(&mut rand::thread_rng())
    }

    pub fn pick_passage_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Passage {
        // non-empty by construction
        let idx = rng.gen_range(0..self.passages.len());
        self.passages[idx].clone()
    }
}
