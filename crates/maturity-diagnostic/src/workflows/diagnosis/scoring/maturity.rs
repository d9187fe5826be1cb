use serde::{Deserialize, Serialize};

use super::super::domain::FeedbackLevels;

pub const DEFAULT_INITIAL_FEEDBACK: &str = "Nível Inicial: Processos ainda não estruturados.";
pub const DEFAULT_BASIC_FEEDBACK: &str =
    "Nível Básico: Existem controles, mas manuais e pouco integrados.";
pub const DEFAULT_INTERMEDIATE_FEEDBACK: &str =
    "Nível Intermediário: Processos definidos e parcialmente automatizados.";
pub const DEFAULT_ADVANCED_FEEDBACK: &str =
    "Nível Avançado: Gestão otimizada com alta automação e uso de dados.";

/// Tier used to pick a section's feedback narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityTier {
    Initial,
    Basic,
    Intermediate,
    Advanced,
}

impl MaturityTier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Initial,
            Self::Basic,
            Self::Intermediate,
            Self::Advanced,
        ]
    }

    /// Inclusive upper bounds 25 / 50 / 75, first match wins.
    pub const fn for_section_score(score: u8) -> Self {
        if score <= 25 {
            Self::Initial
        } else if score <= 50 {
            Self::Basic
        } else if score <= 75 {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub const fn default_feedback(self) -> &'static str {
        match self {
            Self::Initial => DEFAULT_INITIAL_FEEDBACK,
            Self::Basic => DEFAULT_BASIC_FEEDBACK,
            Self::Intermediate => DEFAULT_INTERMEDIATE_FEEDBACK,
            Self::Advanced => DEFAULT_ADVANCED_FEEDBACK,
        }
    }
}

impl FeedbackLevels {
    /// Text configured for a tier, ignoring blank entries.
    pub fn text_for(&self, tier: MaturityTier) -> Option<&str> {
        let text = match tier {
            MaturityTier::Initial => self.initial.as_deref(),
            MaturityTier::Basic => self.basic.as_deref(),
            MaturityTier::Intermediate => self.intermediate.as_deref(),
            MaturityTier::Advanced => self.advanced.as_deref(),
        };
        text.filter(|value| !value.trim().is_empty())
    }

    /// The four default narratives.
    pub fn defaults() -> Self {
        Self {
            initial: Some(DEFAULT_INITIAL_FEEDBACK.to_string()),
            basic: Some(DEFAULT_BASIC_FEEDBACK.to_string()),
            intermediate: Some(DEFAULT_INTERMEDIATE_FEEDBACK.to_string()),
            advanced: Some(DEFAULT_ADVANCED_FEEDBACK.to_string()),
        }
    }
}

pub(crate) fn resolve_feedback(levels: Option<&FeedbackLevels>, tier: MaturityTier) -> String {
    levels
        .and_then(|levels| levels.text_for(tier))
        .unwrap_or_else(|| tier.default_feedback())
        .to_string()
}

/// Headline classification of the overall score.
///
/// Uses its own boundaries (40 / 70 / 90), independent of [`MaturityTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaturityLevel {
    #[serde(rename = "Inicial")]
    Initial,
    #[serde(rename = "Em Desenvolvimento")]
    Developing,
    #[serde(rename = "Avançado")]
    Advanced,
    #[serde(rename = "Best-in-Class")]
    BestInClass,
}

impl MaturityLevel {
    pub const fn for_overall_score(score: u8) -> Self {
        if score < 40 {
            Self::Initial
        } else if score < 70 {
            Self::Developing
        } else if score < 90 {
            Self::Advanced
        } else {
            Self::BestInClass
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Inicial",
            Self::Developing => "Em Desenvolvimento",
            Self::Advanced => "Avançado",
            Self::BestInClass => "Best-in-Class",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
