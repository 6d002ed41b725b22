//! chartjudge - CLI demonstrator
//!
//! Drives the evaluation engine over a session snapshot on disk: annotate,
//! evaluate, select, assemble prompts, generate, and log a completed query.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use chartjudge::annotate::apply_annotations_all;
use chartjudge::config::Config;
use chartjudge::eval::{SelectionOutcome, TieAwareSelector};
use chartjudge::generate::{AnswerGenerator, OpenAiCompatClient};
use chartjudge::prompt::PromptAssembler;
use chartjudge::report::QueryLog;
use chartjudge::types::{Annotation, RetrievedDocument};
use chartjudge::QuerySession;

#[derive(Parser)]
#[command(name = "chartjudge", version, about = "Retrieval evaluation and model selection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach annotator grades to retrieved documents and start a session
    Annotate {
        /// Query text the documents were retrieved for
        #[arg(long)]
        query: String,
        /// JSON file: method name -> retrieved document list
        #[arg(long)]
        retrieved: PathBuf,
        /// JSON file: annotation list
        #[arg(long)]
        annotations: PathBuf,
        /// Where to write the session snapshot
        #[arg(long, default_value = "session.json")]
        out: PathBuf,
    },

    /// Score every method at the configured depths
    Evaluate {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
    },

    /// Rank methods at one depth with fair tie-breaking
    Select {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Seed the tie-break RNG for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Assemble generation payloads from the winning method's documents
    Prompt {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Documents to include; defaults to the depth
        #[arg(long)]
        top_n: Option<usize>,
        /// Where to write the payloads; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Assemble payloads and send them to the configured endpoints
    Generate {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
        #[arg(long, default_value_t = 1)]
        depth: usize,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Append a completed-query record to the query log
    Log {
        #[arg(long, default_value = "session.json")]
        session: PathBuf,
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Final generated answer to record
        #[arg(long)]
        answer: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Annotate {
            query,
            retrieved,
            annotations,
            out,
        } => annotate(&query, &retrieved, &annotations, &out),
        Commands::Evaluate { session } => evaluate(&session, &config),
        Commands::Select {
            session,
            depth,
            seed,
        } => {
            let session = load_session(&session)?;
            let outcome = select(&session, depth, seed)?;
            print_selection(&outcome);
            Ok(())
        }
        Commands::Prompt {
            session,
            depth,
            top_n,
            out,
            seed,
        } => prompt(&session, depth, top_n, out.as_deref(), seed),
        Commands::Generate {
            session,
            depth,
            top_n,
            seed,
        } => generate(&session, depth, top_n, seed, &config).await,
        Commands::Log {
            session,
            depth,
            answer,
            seed,
        } => log_query(&session, depth, &answer, seed, &config),
    }
}

fn annotate(
    query: &str,
    retrieved_path: &std::path::Path,
    annotations_path: &std::path::Path,
    out: &std::path::Path,
) -> Result<()> {
    let retrieved: BTreeMap<String, Vec<RetrievedDocument>> =
        read_json(retrieved_path).context("Failed to load retrieved documents")?;
    let annotations: Vec<Annotation> =
        read_json(annotations_path).context("Failed to load annotations")?;

    let outcomes = apply_annotations_all(retrieved.into_iter().collect(), &annotations);

    let mut methods = Vec::new();
    for outcome in outcomes {
        if !outcome.unmatched.is_empty() {
            warn!(
                method = %outcome.results.method,
                unmatched = outcome.unmatched.len(),
                "documents without annotations were excluded"
            );
        }
        methods.push(outcome.results);
    }

    let session = QuerySession::with_methods(query, methods);
    fs::write(out, serde_json::to_string_pretty(&session)?)?;
    println!("{} session {} -> {}", "created".green(), session.id, out.display());
    Ok(())
}

fn evaluate(session_path: &std::path::Path, config: &Config) -> Result<()> {
    let mut session = load_session(session_path)?;
    let report = session.evaluate(&config.evaluation.depths);

    println!(
        "{} unique documents across {} methods",
        report.unique_document_count,
        session.methods.len()
    );
    for (depth, methods) in &report.scores {
        println!("{}", format!("NDCG@{depth}").bold());
        for (method, score) in methods {
            println!("  {method:<24} {score:.4}");
        }
    }

    fs::write(session_path, serde_json::to_string_pretty(&session)?)?;
    Ok(())
}

fn select(session: &QuerySession, depth: usize, seed: Option<u64>) -> Result<SelectionOutcome> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut selector = TieAwareSelector::new(rng);
    Ok(selector.rank(&session.scoreboard, depth)?)
}

fn print_selection(outcome: &SelectionOutcome) {
    let tie_note = if outcome.winner_was_tied() {
        format!(" ({}-way tie broken at random)", outcome.leading_tie_size)
    } else {
        String::new()
    };
    println!(
        "{} {}{}",
        "winner:".green().bold(),
        outcome.winner().method,
        tie_note
    );
    for ranked in &outcome.ranking {
        println!("  #{} {:<24} {:.4}", ranked.rank, ranked.method, ranked.score);
    }
}

fn assemble_payloads(
    session: &QuerySession,
    depth: usize,
    top_n: Option<usize>,
    seed: Option<u64>,
) -> Result<(SelectionOutcome, Vec<chartjudge::prompt::PromptPayload>)> {
    let outcome = select(session, depth, seed)?;
    let winner = session
        .method_results(&outcome.winner().method)
        .context("winning method has no result list in this session")?;

    let assembler = PromptAssembler::new();
    // The original demonstrator feeds as many documents as the depth scored
    let top_n = top_n.unwrap_or(depth);
    let payloads = assembler.assemble(&session.query, winner, top_n)?;
    Ok((outcome, payloads))
}

fn prompt(
    session_path: &std::path::Path,
    depth: usize,
    top_n: Option<usize>,
    out: Option<&std::path::Path>,
    seed: Option<u64>,
) -> Result<()> {
    let session = load_session(session_path)?;
    let (outcome, payloads) = assemble_payloads(&session, depth, top_n, seed)?;
    print_selection(&outcome);

    let json = serde_json::to_string_pretty(&payloads)?;
    match out {
        Some(path) => {
            fs::write(path, json)?;
            println!("{} {} payloads -> {}", "wrote".green(), payloads.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn generate(
    session_path: &std::path::Path,
    depth: usize,
    top_n: Option<usize>,
    seed: Option<u64>,
    config: &Config,
) -> Result<()> {
    let session = load_session(session_path)?;
    let (outcome, payloads) = assemble_payloads(&session, depth, top_n, seed)?;
    print_selection(&outcome);

    // Payloads pair with endpoints positionally: first target profile to the
    // first configured endpoint, and so on
    for (payload, endpoint) in payloads.iter().zip(config.endpoints.iter()) {
        let client = OpenAiCompatClient::new(endpoint.clone())?;
        let answer = client.generate(payload).await?;
        println!("{}", format!("--- {} ({})", answer.endpoint, answer.model).bold());
        println!("{}", answer.content);
    }
    Ok(())
}

fn log_query(
    session_path: &std::path::Path,
    depth: usize,
    answer: &str,
    seed: Option<u64>,
    config: &Config,
) -> Result<()> {
    let session = load_session(session_path)?;
    let outcome = select(&session, depth, seed)?;

    let log = QueryLog::new(&config.evaluation.query_log);
    let record = log.append(
        &session.query,
        &outcome.winner().method,
        outcome.winner().score,
        answer,
    )?;
    println!(
        "{} record #{} ({} @ {:.4})",
        "logged".green(),
        record.sl,
        record.top_method,
        record.top_score
    );
    Ok(())
}

fn load_session(path: &std::path::Path) -> Result<QuerySession> {
    read_json(path).with_context(|| format!("Failed to load session from {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
