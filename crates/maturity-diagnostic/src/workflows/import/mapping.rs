//! Header resolution for the two spreadsheet templates.

use super::parser::CsvTable;
use super::ImportError;

fn is_industry_header(header: &str) -> bool {
    header.contains("ramo") || header.contains("atividade")
}

pub(crate) struct QuestionColumns {
    pub industry: Option<usize>,
    pub area: usize,
    pub question: usize,
    pub options: [Option<usize>; 4],
}

impl QuestionColumns {
    pub(crate) fn locate(table: &CsvTable) -> Result<Self, ImportError> {
        let option = |letter: &str| {
            let expected = format!("opcao {letter}");
            table.column(|header| header == expected)
        };

        Ok(Self {
            industry: table.column(is_industry_header),
            area: table
                .column(|header| header == "area")
                .ok_or(ImportError::MissingColumn("Area"))?,
            question: table
                .column(|header| header.contains("pergunta") || header.contains("questao"))
                .ok_or(ImportError::MissingColumn("Pergunta"))?,
            options: [option("a"), option("b"), option("c"), option("d")],
        })
    }
}

pub(crate) struct FeedbackColumns {
    pub industry: usize,
    pub area: usize,
    pub levels: [Option<usize>; 4],
}

impl FeedbackColumns {
    pub(crate) fn locate(table: &CsvTable) -> Result<Self, ImportError> {
        Ok(Self {
            industry: table
                .column(is_industry_header)
                .ok_or(ImportError::MissingColumn("Ramo de Atividade"))?,
            area: table
                .column(|header| header == "area")
                .ok_or(ImportError::MissingColumn("Area"))?,
            levels: [
                table.column(|header| header.contains("nivel 1") || header == "inicial"),
                table.column(|header| header.contains("nivel 2") || header.contains("basico")),
                table.column(|header| {
                    header.contains("nivel 3") || header.contains("intermediario")
                }),
                table.column(|header| header.contains("nivel 4") || header.contains("avancado")),
            ],
        })
    }
}
