//! Evaluation harness. Runs a fixed set of questions through a
//! chatbot and packages the answers as labeled test cases for an
//! external scorer.

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai::chat::{Chatbot, DEFAULT_K, Variant};

pub const PLAIN_QUESTIONS: [&str; 5] = [
    "おすすめの朝食メニューを教えてください",
    "効率的な勉強方法について教えて",
    "ストレス解消法を3つ教えてください",
    "東京のおすすめ観光スポットは？",
    "初心者向けのプログラミング言語を教えて",
];

pub const RAG_QUESTIONS: [&str; 5] = [
    "RAGとは何ですか？その利点を教えてください",
    "ベクトルデータベースの代表的な例を3つ挙げてください",
    "プロンプトエンジニアリングの主な手法は何ですか？",
    "ファインチューニングの種類について教えて",
    "LLMができることを5つ教えてください",
];

const METRIC_THRESHOLD: f64 = 0.7;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub actual_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_context: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub threshold: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvalReport {
    pub variant: Variant,
    pub generated_at: DateTime<Utc>,
    pub metrics: Vec<Metric>,
    pub test_cases: Vec<TestCase>,
}

pub fn questions_for(variant: Variant) -> &'static [&'static str] {
    match variant {
        Variant::Plain => &PLAIN_QUESTIONS,
        Variant::Rag => &RAG_QUESTIONS,
    }
}

/// Metrics the scorer should apply. Faithfulness needs retrieval
/// context so it only applies to the RAG bot.
pub fn metrics_for(variant: Variant) -> Vec<Metric> {
    let mut metrics = vec![Metric {
        name: String::from("answer_relevancy"),
        threshold: METRIC_THRESHOLD,
    }];
    if variant == Variant::Rag {
        metrics.push(Metric {
            name: String::from("faithfulness"),
            threshold: METRIC_THRESHOLD,
        });
    }
    metrics
}

/// Asks each question in a fresh conversation. Any failure aborts the
/// run.
pub async fn collect_test_cases(
    bot: &mut (dyn Chatbot + Send + Sync),
    questions: &[&str],
) -> Result<Vec<TestCase>, Error> {
    let mut test_cases = Vec::with_capacity(questions.len());

    for (idx, question) in questions.iter().enumerate() {
        tracing::info!("Evaluating question {}/{}", idx + 1, questions.len());
        let actual_output = bot.chat(question).await?;

        let retrieval_context = if bot.variant() == Variant::Rag {
            let sources = bot.sources(question, DEFAULT_K).await?;
            Some(sources.into_iter().map(|c| c.content).collect())
        } else {
            None
        };

        test_cases.push(TestCase {
            input: question.to_string(),
            actual_output,
            retrieval_context,
        });
        bot.reset();
    }

    Ok(test_cases)
}

pub async fn run(bot: &mut (dyn Chatbot + Send + Sync)) -> Result<EvalReport, Error> {
    let variant = bot.variant();
    let test_cases = collect_test_cases(bot, questions_for(variant)).await?;

    Ok(EvalReport {
        variant,
        generated_at: Utc::now(),
        metrics: metrics_for(variant),
        test_cases,
    })
}
