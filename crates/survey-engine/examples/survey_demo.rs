//! End-to-end walkthrough of a survey conversation against an in-memory
//! database, with scripted providers standing in for the real backends.
//!
//! Run with: cargo run -p survey-engine --example survey_demo

use std::sync::Arc;

use database::{form, user, Database};
use mock_provider::{CannedProvider, SequenceProvider};
use survey_engine::{
    AiConfigInput, AnswerSubmission, EngineConfig, Provider, QuestionInput, SurveyEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db = Database::connect("sqlite::memory:").await?;
    db.migrate().await?;

    // The scripted replies arrive in call order: one generated question,
    // then the sentiment batch, then the insight report.
    let llama: Arc<dyn Provider> = Arc::new(SequenceProvider::new(vec![
        "De 0 a 10, qual a probabilidade de nos recomendar a um amigo?".to_string(),
        r#"[
            {"sentiment": "positivo", "confidence": 0.93},
            {"sentiment": "positivo", "confidence": 0.88},
            {"sentiment": "neutro", "confidence": 0.61}
        ]"#
        .to_string(),
        r#"```json
        {
            "summary": "Clientes satisfeitos com o atendimento, com margem para melhorar os prazos.",
            "top_positives": ["Atendimento simpático", "Produto de qualidade"],
            "top_negatives": ["Prazo de entrega"],
            "suggested_actions": ["Rever o processo de expedição"]
        }
        ```"#
        .to_string(),
    ]));
    let gpt: Arc<dyn Provider> = Arc::new(CannedProvider::new("indisponível nesta demo"));

    let engine = SurveyEngine::new(db.clone(), llama, gpt, EngineConfig::default());

    let owner = user::create_user(db.pool(), "Maria", "maria@example.com").await?;
    let survey = form::create_form(db.pool(), owner.id, "Satisfação da loja", "", "llama").await?;

    engine
        .update_ai_config(
            owner.id,
            AiConfigInput {
                tone: "simpático".to_string(),
                style: "curta".to_string(),
                goal: "satisfação geral".to_string(),
                ai_mode: "llama".to_string(),
            },
        )
        .await?;

    for (order, text) in ["Como foi o atendimento?", "O que podemos melhorar?"]
        .iter()
        .enumerate()
    {
        engine
            .add_question(
                owner.id,
                survey.id,
                &QuestionInput {
                    question_text: text.to_string(),
                    sort_order: order as i64,
                    is_required: order == 0,
                },
            )
            .await?;
    }

    let answers = [
        "Adorei o atendimento, muito simpáticos",
        "Os prazos de entrega podiam ser melhores",
        "9",
    ];

    for answer in answers {
        let turn = engine.next_question(survey.id).await?;
        println!("[{}] {}", turn.kind, turn.question);
        println!("  respondente: {answer}");

        engine
            .submit_answer(
                survey.id,
                AnswerSubmission {
                    kind: turn.kind,
                    question: turn.question,
                    question_id: turn.question_id,
                    answer: answer.to_string(),
                    ai_mode: Some(turn.ai_mode.as_str().to_string()),
                    ai_context: None,
                },
            )
            .await?;
    }

    let scores = engine.analyze_sentiment(owner.id, survey.id).await?;
    println!("\nSentimentos:");
    for score in &scores {
        println!(
            "  resposta {} -> {} ({:.2})",
            score.response_id, score.sentiment, score.confidence
        );
    }

    let report = engine.generate_insight(owner.id, survey.id, None).await?;
    println!("\nInsight: {}", report.summary);
    for action in &report.suggested_actions {
        println!("  ação sugerida: {action}");
    }

    match engine.nps(owner.id, survey.id).await? {
        Some(nps) => println!(
            "\nNPS: {:.2} (promotores {}, passivos {}, detratores {}, sem nota {})",
            nps.score,
            nps.buckets.promoters,
            nps.buckets.passives,
            nps.buckets.detractors,
            nps.unscored
        ),
        None => println!("\nNPS: sem notas ainda"),
    }

    let overview = engine.overview(owner.id, survey.id).await?;
    println!(
        "Respostas: {} no total, {} nos últimos 7 dias",
        overview.total_responses, overview.last_7_days
    );

    Ok(())
}
