use serde::{Deserialize, Serialize};

use crate::core::locator::Locator;
use crate::core::sheet::CellValue;

/// An entry destined for the generic document viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub locator: Locator,
    pub media_type: String,
    pub name: String,
}

/// A user-visible failure for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file_name: String,
    pub message: String,
}

/// What a single file of a batch resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Text(String),
    Table(Vec<Vec<CellValue>>),
    Document(DocumentEntry),
    Failed(FileError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub documents: Vec<DocumentEntry>,
    pub text_content: String,
    pub table_content: Option<Vec<Vec<CellValue>>>,
    pub errors: Vec<FileError>,
}

impl ViewState {
    /// Fold a resolved batch, in selection order, into a fresh state.
    ///
    /// Text and table slots keep the last file that produced them; documents and
    /// errors accumulate.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = FileOutcome>,
    {
        let mut state = ViewState::default();
        for outcome in outcomes {
            state.apply(outcome);
        }
        state
    }

    fn apply(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Text(text) => self.text_content = text,
            FileOutcome::Table(rows) => self.table_content = Some(rows),
            FileOutcome::Document(entry) => self.documents.push(entry),
            FileOutcome::Failed(error) => self.errors.push(error),
        }
    }

    /// Reset all four slots.
    pub fn clear(&mut self) {
        *self = ViewState::default();
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
            && self.text_content.is_empty()
            && self.table_content.is_none()
            && self.errors.is_empty()
    }
}
