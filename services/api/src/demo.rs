use crate::infra::{InMemoryCatalogRepository, InMemoryHistoryRepository};
use clap::Args;
use maturity_diagnostic::error::AppError;
use maturity_diagnostic::workflows::diagnosis::{
    AnswerSet, DiagnosisOutcome, DiagnosisService, DiagnosisServiceError, DiagnosisSubmission,
    HistoryFilter, IndustryId, OptionWeightTable, QuestionnaireBlueprint, QuestionnaireDraft,
    QuestionnaireGuard, RespondentProfile, ScoringEngine, STANDARD_INDUSTRY_ID,
};
use maturity_diagnostic::workflows::import::{FeedbackImporter, QuestionImporter};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire JSON (sections, questions, options). Defaults to the built-in questionnaire.
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
    /// Answers JSON mapping question id to the selected option index
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Comma-separated weight per option position, e.g. 0,33,66,100
    #[arg(long)]
    pub(crate) weights: Option<OptionWeightTable>,
    /// Print the outcome as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Spreadsheet exported as CSV (comma or semicolon separated)
    pub(crate) path: PathBuf,
    /// Print the parsed rows as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company shown on the sample diagnosis
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Print the stored record as JSON after the report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    weights: &'a [i32],
    summary: String,
    #[serde(flatten)]
    outcome: &'a DiagnosisOutcome,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        questionnaire,
        answers,
        weights,
        json,
    } = args;

    let industry_id = IndustryId::from("offline");
    let questionnaire = match questionnaire {
        Some(path) => {
            let draft: QuestionnaireDraft =
                serde_json::from_reader(BufReader::new(File::open(path)?))?;
            QuestionnaireGuard::default()
                .questionnaire_from_draft(&industry_id, draft)
                .map_err(DiagnosisServiceError::from)?
        }
        None => QuestionnaireBlueprint::standard().questionnaire(),
    };
    let answers: AnswerSet = serde_json::from_reader(BufReader::new(File::open(answers)?))?;

    if let Some(table) = weights.as_ref() {
        if !table.fits(questionnaire.option_count()) {
            warn!(
                weights = table.len(),
                options = questionnaire.option_count(),
                "weight table does not match the option count, using default weights"
            );
        }
    }

    let engine = ScoringEngine::resolved(weights.as_ref(), questionnaire.option_count());
    let outcome = engine.score(&questionnaire, &answers);

    if json {
        let report = ScoreReport {
            weights: engine.weights().as_slice(),
            summary: outcome.summary(),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Diagnosis score");
    println!("Weights: {:?}", engine.weights().as_slice());
    render_outcome(&outcome);
    Ok(())
}

pub(crate) fn run_question_import(args: ImportArgs) -> Result<(), AppError> {
    let scopes = QuestionImporter::from_path(&args.path)?;

    if args.json {
        let drafts: Vec<_> = scopes
            .iter()
            .map(|scope| {
                serde_json::json!({
                    "industry": scope.industry_name,
                    "questionnaire": scope.draft,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&drafts)?);
        return Ok(());
    }

    println!("Questions spreadsheet: {}", args.path.display());
    for scope in &scopes {
        println!(
            "\n{} ({} sections, {} questions)",
            scope.industry_name,
            scope.draft.sections.len(),
            scope.question_count()
        );
        for section in &scope.draft.sections {
            println!(
                "  - {}: {} questions",
                section.title.as_deref().unwrap_or_default(),
                section.questions.len()
            );
        }
    }
    Ok(())
}

pub(crate) fn run_feedback_import(args: ImportArgs) -> Result<(), AppError> {
    let rows = FeedbackImporter::from_path(&args.path)?;

    if args.json {
        let payload: Vec<_> = rows
            .iter()
            .map(|row| {
                serde_json::json!({
                    "industry": row.industry_name,
                    "area": row.area,
                    "feedback": row.levels,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Feedback spreadsheet: {}", args.path.display());
    for row in &rows {
        let filled = [
            &row.levels.initial,
            &row.levels.basic,
            &row.levels.intermediate,
            &row.levels.advanced,
        ]
        .into_iter()
        .filter(|text| text.is_some())
        .count();
        println!("  {} / {}: {filled} of 4 levels", row.industry_name, row.area);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = DiagnosisService::new(
        Arc::new(InMemoryCatalogRepository::default()),
        Arc::new(InMemoryHistoryRepository::default()),
    );
    service.seed_standard_catalog()?;

    let industry_id = IndustryId::from(STANDARD_INDUSTRY_ID);
    let submission = demo_submission(&service, &industry_id, args.company)?;
    let record = service.submit(submission)?;

    println!("Maturity diagnosis demo");
    println!(
        "Respondent: {} ({})",
        record.respondent.name, record.respondent.company
    );
    println!("Diagnosis id: {}", record.id);
    render_outcome(&record.outcome);

    let history = service.history(&HistoryFilter::default())?;
    println!("\nHistory ({} stored)", history.len());
    for entry in history {
        let summary = entry.summary_view();
        println!(
            "- {} {} {} {}% ({})",
            summary.created_at.format("%Y-%m-%d %H:%M"),
            summary.id,
            summary.company,
            summary.overall_score,
            summary.maturity.label()
        );
    }

    if args.json {
        println!("\n{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}

fn demo_submission(
    service: &DiagnosisService<InMemoryCatalogRepository, InMemoryHistoryRepository>,
    industry_id: &IndustryId,
    company: Option<String>,
) -> Result<DiagnosisSubmission, AppError> {
    let questionnaire = service.questionnaire(industry_id)?;
    let option_count = questionnaire.option_count();

    // Strong in the first areas, weaker towards the end, so the report shows every tier.
    let answers = questionnaire
        .sections()
        .iter()
        .enumerate()
        .flat_map(|(section_index, section)| {
            section
                .questions
                .iter()
                .enumerate()
                .map(move |(question_index, question)| {
                    let ceiling = option_count.saturating_sub(1 + section_index / 2);
                    let pick = ceiling.saturating_sub(question_index % 2);
                    (question.id.clone(), pick)
                })
        })
        .collect();

    Ok(DiagnosisSubmission {
        industry_id: industry_id.clone(),
        respondent: RespondentProfile {
            name: "Helena Duarte".to_string(),
            email: "helena.duarte@example.com".to_string(),
            company: company.unwrap_or_else(|| "Distribuidora Horizonte".to_string()),
            position: "Diretora Financeira".to_string(),
            seller: Some("Rafael Nunes".to_string()),
            erp: Some("Protheus".to_string()),
            ..RespondentProfile::default()
        },
        answers,
    })
}

fn render_outcome(outcome: &DiagnosisOutcome) {
    println!("Overall: {}", outcome.summary());

    if outcome.sections.is_empty() {
        println!("\nNo section has enabled questions.");
        return;
    }

    println!("\nSections");
    for section in &outcome.sections {
        println!(
            "- {:<28} {:>3}% [{}]",
            section.title,
            section.score,
            section.tier.key()
        );
        println!("    {}", section.feedback);
    }

    if let (Some(weakest), Some(strongest)) =
        (outcome.weakest_section(), outcome.strongest_section())
    {
        println!("\nStrongest area: {} ({}%)", strongest.title, strongest.score);
        println!("Weakest area: {} ({}%)", weakest.title, weakest.score);
    }
}
