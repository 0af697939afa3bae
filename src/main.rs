// src/main.rs
// quizgen - interactive multiple-choice quiz generator

use anyhow::Result;
use clap::Parser;
use dialoguer::{Confirm, Input, Select};
use quizgen::config::QuizConfig;
use quizgen::http::create_shared_client;
use quizgen::llm::{LlmClient, Provider, ProviderFactory};
use quizgen::quiz::{
    Difficulty, Label, MAX_QUESTIONS, MIN_QUESTIONS, QuizOutcome, QuizRequest, QuizSession,
    generate_quiz,
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "quizgen")]
#[command(about = "Generate and take multiple-choice quizzes from an LLM backend")]
#[command(version)]
struct Cli {
    /// Backend to use: hf or gemini (overrides PROVIDER)
    #[arg(short, long, value_parser = parse_provider)]
    provider: Option<Provider>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_provider(s: &str) -> std::result::Result<Provider, String> {
    Provider::from_str(s).ok_or_else(|| format!("unknown provider '{}' (expected hf or gemini)", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the prompts
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match cli.provider {
        Some(provider) => QuizConfig::from_env_with_provider(provider)?,
        None => QuizConfig::from_env()?,
    };

    let factory = ProviderFactory::new(create_shared_client());
    let client = factory.client_for(config.provider);
    info!(provider = %config.provider, "Starting quiz session");
    println!("Using provider: {}", config.provider.to_string().to_uppercase());

    loop {
        run_round(client.as_ref(), &config).await?;

        let again = Confirm::new()
            .with_prompt("Generate another quiz?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
    }

    Ok(())
}

/// One generate-answer-score cycle. Backend failures are reported, not fatal.
async fn run_round(client: &dyn LlmClient, config: &QuizConfig) -> Result<()> {
    let request = match ask_request()? {
        Ok(request) => request,
        Err(message) => {
            eprintln!("{}", message);
            return Ok(());
        }
    };

    println!("Generating {} question(s)...", request.count());
    let quiz = match generate_quiz(client, &config.params, &request).await {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("Generation failed: {}", e.to_user_string());
            return Ok(());
        }
    };

    let outcome = QuizOutcome::classify(&quiz, request.count());
    if let Some(message) = outcome.user_message() {
        eprintln!("{}", message);
    }
    if outcome == QuizOutcome::Empty {
        return Ok(());
    }

    let mut session = QuizSession::new(quiz);
    take_quiz(&mut session)?;
    print_score(&session);
    Ok(())
}

/// Outer error is terminal I/O; inner error is a validation message for the user
fn ask_request() -> Result<std::result::Result<QuizRequest, String>> {
    let topic: String = Input::new()
        .with_prompt("Topic")
        .default("Python basics".to_string())
        .interact_text()?;

    let difficulties: Vec<String> = Difficulty::ALL.iter().map(|d| d.to_string()).collect();
    let choice = Select::new()
        .with_prompt("Difficulty")
        .items(&difficulties)
        .default(0)
        .interact()?;

    let count: usize = Input::new()
        .with_prompt(format!("Number of questions ({}-{})", MIN_QUESTIONS, MAX_QUESTIONS))
        .default(3)
        .validate_with(|n: &usize| -> std::result::Result<(), String> {
            if (MIN_QUESTIONS..=MAX_QUESTIONS).contains(n) {
                Ok(())
            } else {
                Err(format!("enter a number from {} to {}", MIN_QUESTIONS, MAX_QUESTIONS))
            }
        })
        .interact_text()?;

    Ok(QuizRequest::new(topic, Difficulty::ALL[choice], count).map_err(|e| e.to_user_string()))
}

fn take_quiz(session: &mut QuizSession) -> Result<()> {
    let total = session.quiz().len();
    for index in 0..total {
        let question = &session.quiz().questions[index];
        println!();
        println!("Q{}. {}", index + 1, question.text);

        // Prose replies can lack option lines; still let the user pick a letter
        let (labels, items): (Vec<Label>, Vec<String>) = if question.options.is_empty() {
            Label::ALL.iter().map(|l| (*l, l.to_string())).unzip()
        } else {
            question
                .options
                .iter()
                .map(|(l, text)| (*l, format!("{}) {}", l, text)))
                .unzip()
        };

        let choice = Select::new()
            .with_prompt("Your answer")
            .items(&items)
            .default(0)
            .interact()?;
        session.select(index, labels[choice])?;
    }
    Ok(())
}

fn print_score(session: &QuizSession) {
    let report = session.score();
    println!();
    for result in &report.results {
        let question = &session.quiz().questions[result.index];
        let selected = result.selected.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
        let expected = result
            .expected
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown".into());
        let mark = if result.is_correct { "correct" } else { "wrong" };
        println!(
            "Q{}: you chose {}, answer {} ({})",
            result.index + 1,
            selected,
            expected,
            mark
        );
        if let Some(ref explanation) = question.explanation {
            println!("    {}", explanation);
        }
    }
    println!();
    println!(
        "Score: {}/{} ({:.0}%)",
        report.correct,
        report.total,
        report.percentage()
    );
}
