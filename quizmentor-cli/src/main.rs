//! QuizMentor CLI - build the index and run first-aid quizzes
//!
//! # Commands
//!
//! ```bash
//! # Build the retrieval index from the reference manual
//! quizmentor build-index manuel_secourisme.pdf
//!
//! # Inspect retrieval
//! quizmentor search "hémorragie externe" -k 5
//!
//! # Generate questions, or take a quiz in the terminal
//! quizmentor generate --level Débutant --count 3
//! quizmentor quiz --level Expert
//!
//! # Past sessions
//! quizmentor dashboard
//! ```
//!
//! Settings come from the environment (and `.env`); see `quizmentor_lib::config`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quizmentor_lib::{
    chunk::{Chunk, Chunker, FixedChunker, LineChunker},
    config::Config,
    embed::{Embedder, HashingEmbedder, MiniLmEmbedder},
    index::IndexBuilder,
    pdf,
    quiz::{GeneratedQuestion, Level, QuizAssembler, QuizSession},
    retrieve::Retriever,
    users::{NewUser, Role, UserStore},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quizmentor")]
#[command(about = "First-aid quiz generation over a retrieval index")]
#[command(version)]
struct Cli {
    /// Directory holding rag_index.json and rag_chunks.json
    #[arg(long, global = true, env = "QUIZMENTOR_INDEX_DIR")]
    index_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Fixed windows of at most --max-chars characters
    Fixed,
    /// Windows cut after the last newline that fits
    Line,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbedderKind {
    /// all-MiniLM-L6-v2 (downloads the model on first use)
    Minilm,
    /// Bag-of-words hashing, offline
    Hashing,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index pair from a PDF
    BuildIndex {
        /// Source PDF
        pdf: PathBuf,

        #[arg(short, long, value_enum, default_value = "fixed")]
        strategy: Strategy,

        /// Maximum chunk size in characters (strategy default when omitted)
        #[arg(long)]
        max_chars: Option<usize>,

        #[arg(long, value_enum, default_value = "minilm")]
        embedder: EmbedderKind,
    },

    /// Chunk a PDF or text file and show the result
    Chunk {
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "fixed")]
        strategy: Strategy,

        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Show the chunks closest to a query
    Search {
        query: String,

        /// Number of results to return
        #[arg(short, default_value = "5")]
        k: usize,

        #[arg(long, value_enum, default_value = "minilm")]
        embedder: EmbedderKind,
    },

    /// Generate questions and print them
    Generate {
        /// Débutant, Intermédiaire or Expert
        #[arg(short, long, default_value = "Débutant")]
        level: Level,

        #[arg(short, long, default_value = "3")]
        count: usize,

        /// Seed for topic selection
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling temperature (overrides MISTRAL_TEMPERATURE)
        #[arg(long)]
        temperature: Option<f32>,

        #[arg(long, value_enum, default_value = "minilm")]
        embedder: EmbedderKind,
    },

    /// Take a quiz in the terminal and record the result
    Quiz {
        #[arg(short, long, default_value = "Débutant")]
        level: Level,

        #[arg(short, long, default_value = "3")]
        count: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value = "minilm")]
        embedder: EmbedderKind,
    },

    /// Summarise recorded quiz sessions
    Dashboard,

    /// Create a user account
    Register {
        username: String,

        #[arg(long)]
        password: String,

        /// formateur, secouriste or grand_public
        #[arg(long, default_value = "grand_public")]
        role: Role,

        #[arg(long, default_value = "")]
        fullname: String,

        #[arg(long, default_value = "")]
        email: String,
    },

    /// Check credentials and print the account role
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Ask the hosted RAG service a question
    Ask { question: String },

    /// List the upper-case sections of a PDF
    Sections { pdf: PathBuf },
}

fn make_embedder(kind: EmbedderKind) -> Result<Box<dyn Embedder>> {
    Ok(match kind {
        EmbedderKind::Minilm => {
            println!("Loading all-MiniLM-L6-v2 (first run downloads the model)...");
            Box::new(MiniLmEmbedder::new()?)
        }
        EmbedderKind::Hashing => Box::new(HashingEmbedder::default()),
    })
}

fn open_retriever(config: &Config, kind: EmbedderKind) -> Result<Retriever<Box<dyn Embedder>>> {
    let embedder = make_embedder(kind)?;
    let retriever = Retriever::load(embedder, &config.index_paths())
        .with_context(|| format!("loading index from {}", config.index_dir.display()))?;
    Ok(retriever)
}

fn read_document(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(pdf::extract_text(path).with_context(|| format!("reading {}", path.display()))?)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn chunk_text(text: &str, strategy: Strategy, max_chars: Option<usize>) -> Vec<Chunk> {
    match strategy {
        Strategy::Fixed => {
            let chunker = max_chars.map_or_else(FixedChunker::default, |max_chars| FixedChunker { max_chars });
            chunker.chunk(text)
        }
        Strategy::Line => {
            let chunker = max_chars.map_or_else(LineChunker::default, |max_chars| LineChunker { max_chars });
            chunker.chunk(text)
        }
    }
}

fn build_index<C: Chunker>(
    chunker: C,
    embedder: &mut Box<dyn Embedder>,
    pdf: &Path,
    config: &Config,
) -> Result<usize> {
    let index = IndexBuilder::new(chunker, embedder)
        .build_and_save(pdf, &config.index_paths())
        .with_context(|| format!("building index from {}", pdf.display()))?;
    Ok(index.len())
}

fn print_question(number: usize, generated: &GeneratedQuestion) {
    let q = &generated.question;
    println!("Question {number} [{}]", generated.topic);
    println!("{}", q.question);
    for choice in &q.choices {
        println!("  {choice}");
    }
}

fn preview(text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        format!("{head}...")
    } else {
        head
    }
}

async fn generate_questions(
    config: &Config,
    level: Level,
    count: usize,
    seed: Option<u64>,
    temperature: Option<f32>,
    kind: EmbedderKind,
) -> Result<Vec<GeneratedQuestion>> {
    let retriever = open_retriever(config, kind)?;
    let generator = config.mistral_client()?;
    let mut assembler = QuizAssembler::new(retriever, generator)
        .with_temperature(temperature.unwrap_or(config.temperature));
    if let Some(seed) = seed {
        assembler = assembler.with_seed(seed);
    }
    Ok(assembler.generate(level, count).await?)
}

/// Run the question loop on stdin. Returns `None` if input ends early.
fn run_quiz(session: &mut QuizSession) -> Result<Option<()>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(question) = session.current().cloned() {
        println!("\nQuestion {}/{}", session.position() + 1, session.total());
        println!("{}", question.question);
        for choice in &question.choices {
            println!("  {choice}");
        }

        let given = loop {
            print!("Votre réponse (A-D) : ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut letters = line.chars();
            let as_label = match (letters.next(), letters.next()) {
                (Some(c), None) => question.choice_for_label(c),
                _ => None,
            };
            break as_label.unwrap_or(line).to_string();
        };

        if let Some(outcome) = session.answer(&given) {
            if outcome.correct {
                println!("Bonne réponse !");
            } else if outcome.correct_answer.is_empty() {
                println!("Pas de réponse attendue pour cette question.");
            } else {
                println!("Mauvaise réponse. La bonne réponse était : {}", outcome.correct_answer);
            }
        }
    }
    Ok(Some(()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.index_dir {
        config.index_dir = dir;
    }

    match cli.command {
        Commands::BuildIndex {
            pdf,
            strategy,
            max_chars,
            embedder,
        } => {
            let mut embedder = make_embedder(embedder)?;
            println!("Indexing '{}'...", pdf.display());
            let chunks = match strategy {
                Strategy::Fixed => {
                    let chunker = max_chars.map_or_else(FixedChunker::default, |max_chars| FixedChunker { max_chars });
                    build_index(chunker, &mut embedder, &pdf, &config)?
                }
                Strategy::Line => {
                    let chunker = max_chars.map_or_else(LineChunker::default, |max_chars| LineChunker { max_chars });
                    build_index(chunker, &mut embedder, &pdf, &config)?
                }
            };
            let paths = config.index_paths();
            println!(
                "Done! {chunks} chunks written to {} and {}",
                paths.index.display(),
                paths.chunks.display()
            );
        }

        Commands::Chunk {
            input,
            strategy,
            max_chars,
        } => {
            let text = read_document(&input)?;
            let chunks = chunk_text(&text, strategy, max_chars);

            println!("Chunked '{}' into {} chunks:\n", input.display(), chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                println!(
                    "--- Chunk {} ({} chars, offset {}, id: {}) ---",
                    i + 1,
                    chunk.content.chars().count(),
                    chunk.metadata.offset,
                    &chunk.id[..chunk.id.len().min(8)]
                );
                println!("{}\n", preview(&chunk.content, 200));
            }
        }

        Commands::Search { query, k, embedder } => {
            let mut retriever = open_retriever(&config, embedder)?;
            println!("Index contains {} chunks", retriever.len());
            println!("\nSearching: '{query}' (k={k})");
            let results = retriever.search(&query, k)?;

            println!("\n=== Results ===\n");
            for (i, result) in results.iter().enumerate() {
                println!(
                    "#{} (chunk {}, distance: {:.4})",
                    i + 1,
                    result.position,
                    result.distance
                );
                println!("---");
                println!("{}\n", preview(&result.content, 300));
            }
        }

        Commands::Generate {
            level,
            count,
            seed,
            temperature,
            embedder,
        } => {
            let questions = generate_questions(&config, level, count, seed, temperature, embedder).await?;
            for (i, generated) in questions.iter().enumerate() {
                println!();
                print_question(i + 1, generated);
                if generated.question.answer.is_empty() {
                    println!("  -> (no answer found)");
                } else {
                    println!("  -> {}", generated.question.answer);
                }
                for gap in &generated.gaps {
                    println!("  ! {gap}");
                }
            }
        }

        Commands::Quiz {
            level,
            count,
            seed,
            embedder,
        } => {
            let questions = generate_questions(&config, level, count, seed, None, embedder).await?;
            let mut session = QuizSession::new(
                level,
                questions.into_iter().map(|g| g.question).collect(),
            );

            if run_quiz(&mut session)?.is_none() {
                println!("\nInput closed, session not recorded.");
                return Ok(());
            }

            println!("\nScore : {}/{}", session.score(), session.total());
            let log = config.result_log();
            log.append(&session.into_record_now())
                .with_context(|| format!("recording session in {}", log.path().display()))?;
            info!(path = %log.path().display(), "session recorded");
        }

        Commands::Dashboard => {
            let log = config.result_log();
            let records = log.load()?;
            let summary = log.summary()?;

            println!("Sessions: {}", summary.sessions);
            if summary.sessions == 0 {
                return Ok(());
            }
            println!("Mean score: {:.2}", summary.mean_score);
            for (level, stats) in &summary.per_level {
                println!("  {level}: {} sessions, mean {:.2}", stats.sessions, stats.mean_score);
            }

            println!("\n=== History ===\n");
            for record in records.iter().rev() {
                println!(
                    "{}  {:<14} {}/{}",
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.level.label(),
                    record.score,
                    record.total
                );
            }
        }

        Commands::Register {
            username,
            password,
            role,
            fullname,
            email,
        } => {
            let store = UserStore::open(&config.users_db)?;
            let created = store.register(&NewUser {
                username: username.clone(),
                password,
                role,
                fullname,
                email,
            })?;
            if !created {
                bail!("username '{username}' is already taken");
            }
            println!("Account '{username}' created ({role})");
        }

        Commands::Login { username, password } => {
            let store = UserStore::open(&config.users_db)?;
            match store.login(&username, &password)? {
                Some(role) => println!("Welcome {username} ({role})"),
                None => bail!("invalid username or password"),
            }
        }

        Commands::Ask { question } => {
            let client = config.rag_client()?;
            let answer = client.ask(&question).await?;
            println!("{answer:#}");
        }

        Commands::Sections { pdf } => {
            let pages = pdf::extract_pages(&pdf).with_context(|| format!("reading {}", pdf.display()))?;
            let sections = pdf::split_sections(&pages);
            println!("{} sections in '{}':\n", sections.len(), pdf.display());
            for section in &sections {
                println!("{} ({} chars)", section.title, section.body.chars().count());
            }
        }
    }

    Ok(())
}
