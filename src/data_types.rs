// src/data_types.rs
use clap::ValueEnum;
use indexmap::IndexMap;

use crate::error::FetchError;

/// Tab used when the user leaves the tab name blank.
pub const DEFAULT_TAB_NAME: &str = "Sheet1";

/// Which published sheet to read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceReference {
    pub document_id: String,
    pub tab_name: String,
}

impl SourceReference {
    pub fn new(document_id: impl Into<String>, tab_name: impl Into<String>) -> Self {
        SourceReference {
            document_id: document_id.into(),
            tab_name: tab_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.document_key().is_empty() {
            return Err(FetchError::Validation);
        }
        Ok(())
    }

    pub fn has_document(&self) -> bool {
        !self.document_key().is_empty()
    }

    /// The bare spreadsheet id. A pasted sheet URL is accepted too:
    /// `https://docs.google.com/spreadsheets/d/[ID]/edit` yields `[ID]`.
    pub fn document_key(&self) -> &str {
        let input = self.document_id.trim();
        let parts: Vec<&str> = input.split('/').collect();

        for (i, part) in parts.iter().enumerate() {
            if *part == "d" && i + 1 < parts.len() {
                return parts[i + 1].trim();
            }
        }

        input
    }

    pub fn tab_or_default(&self) -> &str {
        let tab = self.tab_name.trim();
        if tab.is_empty() {
            DEFAULT_TAB_NAME
        } else {
            tab
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayMode {
    #[default]
    List,
    Table,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::List => "List",
            DisplayMode::Table => "Table",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<IndexMap<String, String>>,
}

impl TableData {
    /// Value of `column` in row `row`, empty when either is out of range.
    pub fn cell(&self, row: usize, column: &str) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excuse {
    /// 1-based position of the originating row, before empty rows are dropped.
    pub id: usize,
    pub text: String,
}

pub type ExcuseList = Vec<Excuse>;

/// Result of one successful load, shaped by the display mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetData {
    Table(TableData),
    List(ExcuseList),
}

impl SheetData {
    /// Number of rows (table) or entries (list).
    pub fn len(&self) -> usize {
        match self {
            SheetData::Table(table) => table.rows.len(),
            SheetData::List(excuses) => excuses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> DisplayMode {
        match self {
            SheetData::Table(_) => DisplayMode::Table,
            SheetData::List(_) => DisplayMode::List,
        }
    }
}
