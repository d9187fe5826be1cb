//! Spreadsheet import of questionnaires and section feedback.
//!
//! Administrators maintain questions in CSV exports with one row per question
//! (`Ramo de Atividade, Area, Pergunta, Opcao A..D`) and feedback with one row per
//! section (`Ramo de Atividade, Area, Nivel 1..4`). Headers are matched loosely so
//! exports from different spreadsheet locales load unchanged.

mod mapping;
mod normalizer;
mod parser;

pub(crate) use normalizer::normalize_label;

use crate::workflows::diagnosis::domain::FeedbackLevels;
use crate::workflows::diagnosis::validation::{QuestionDraft, QuestionnaireDraft, SectionDraft};
use mapping::{FeedbackColumns, QuestionColumns};
use parser::{cell, read_table};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Scope used for rows without an industry.
pub const DEFAULT_IMPORT_INDUSTRY: &str = "Geral";

const OPTION_PLACEHOLDERS: [&str; 4] = ["Opção A", "Opção B", "Opção C", "Opção D"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("import file has no data rows")]
    Empty,
    #[error("import file is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Questionnaire parsed for one industry, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedScope {
    pub industry_name: String,
    pub draft: QuestionnaireDraft,
}

impl ImportedScope {
    pub fn question_count(&self) -> usize {
        self.draft
            .sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }
}

/// Feedback texts for one (industry, area) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRow {
    pub industry_name: String,
    pub area: String,
    pub levels: FeedbackLevels,
}

pub struct QuestionImporter;

impl QuestionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedScope>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedScope>, ImportError> {
        let table = read_table(reader)?;
        let columns = QuestionColumns::locate(&table)?;
        let mut scopes: Vec<ImportedScope> = Vec::new();

        for record in table.rows() {
            let (Some(area), Some(text)) = (
                cell(record, Some(columns.area)),
                cell(record, Some(columns.question)),
            ) else {
                continue;
            };
            let industry = cell(record, columns.industry).unwrap_or(DEFAULT_IMPORT_INDUSTRY);

            let options = columns
                .options
                .iter()
                .zip(OPTION_PLACEHOLDERS)
                .map(|(column, placeholder)| cell(record, *column).unwrap_or(placeholder))
                .map(str::to_string)
                .collect();

            let scope_index = match scopes
                .iter()
                .position(|scope| same_name(&scope.industry_name, industry))
            {
                Some(index) => index,
                None => {
                    scopes.push(ImportedScope {
                        industry_name: industry.to_string(),
                        draft: QuestionnaireDraft::default(),
                    });
                    scopes.len() - 1
                }
            };
            let sections = &mut scopes[scope_index].draft.sections;

            let section_index = match sections.iter().position(|section| {
                section
                    .title
                    .as_deref()
                    .is_some_and(|title| same_name(title, area))
            }) {
                Some(index) => index,
                None => {
                    sections.push(SectionDraft {
                        title: Some(area.to_string()),
                        ..SectionDraft::default()
                    });
                    sections.len() - 1
                }
            };
            let section = &mut sections[section_index];

            section.questions.push(QuestionDraft {
                id: None,
                text: Some(text.to_string()),
                options,
                disabled: false,
            });
        }

        Ok(scopes)
    }
}

pub struct FeedbackImporter;

impl FeedbackImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FeedbackRow>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows missing either the industry or the area are dropped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<FeedbackRow>, ImportError> {
        let table = read_table(reader)?;
        let columns = FeedbackColumns::locate(&table)?;

        Ok(table
            .rows()
            .iter()
            .filter_map(|record| {
                let industry = cell(record, Some(columns.industry))?;
                let area = cell(record, Some(columns.area))?;
                let level = |index: usize| cell(record, columns.levels[index]).map(str::to_string);

                Some(FeedbackRow {
                    industry_name: industry.to_string(),
                    area: area.to_string(),
                    levels: FeedbackLevels {
                        initial: level(0),
                        basic: level(1),
                        intermediate: level(2),
                        advanced: level(3),
                    },
                })
            })
            .collect())
    }
}

/// Case and accent insensitive name comparison used to match industries and areas.
pub(crate) fn same_name(left: &str, right: &str) -> bool {
    normalize_label(left) == normalize_label(right)
}
