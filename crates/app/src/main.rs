use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use course_core::model::ReviewDecision;
use services::{AppServices, Clock, CourseSettings};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "course")]
#[command(about = "HTML, CSS and JavaScript course: lessons, quizzes, reviews and progress")]
#[command(version)]
struct Cli {
    /// SQLite database url or file path
    #[arg(long = "db", env = "COURSE_DB_URL", default_value = "sqlite://course.sqlite3", global = true)]
    db_url: String,

    /// Learner name shown on the profile and stamped on submissions
    #[arg(long = "user", env = "COURSE_USER_NAME", default_value = "Alae", global = true)]
    user_name: String,

    /// Name recorded on reviewed results
    #[arg(long, env = "COURSE_REVIEWER", default_value = "Tatawi", global = true)]
    reviewer: String,

    /// Password the admin commands are checked against
    #[arg(
        long = "admin-secret",
        env = "COURSE_ADMIN_PASSWORD",
        default_value = "tatawi123",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    admin_secret: String,

    /// JSON file of `{ topic: [correct option, ...] }` answer keys
    #[arg(long, env = "COURSE_ANSWER_KEYS", global = true)]
    answer_keys: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List lessons with completion and progress
    Lessons,

    /// Mark a lesson as completed
    CompleteLesson { lesson_id: String },

    /// Quiz submission and status
    #[command(subcommand)]
    Quiz(QuizCommand),

    /// Admin review panel
    Admin {
        /// Admin password
        #[arg(long)]
        password: String,

        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Submit the final project from three source files
    Project {
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        css: PathBuf,
        #[arg(long)]
        js: PathBuf,
        /// Only run the checks, do not record anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show XP, level, badges and recent results
    Profile,
}

#[derive(Subcommand)]
enum QuizCommand {
    /// Submit answers (option indexes, comma separated) for review
    Submit {
        topic: String,
        #[arg(value_delimiter = ',', required = true)]
        answers: Vec<u8>,
    },
    /// Status of one topic, or every topic
    Status { topic: Option<String> },
    /// Reviewed result and feedback for a topic
    Result { topic: String },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Submissions waiting for review
    Pending,
    /// Counts and the most recent reviews
    Stats,
    /// Per-question breakdown and suggested grade
    Show { id: String },
    /// Close the review of a submission
    Grade {
        id: String,
        #[arg(value_enum)]
        decision: Decision,
        /// Override the computed score
        #[arg(long)]
        score: Option<u32>,
        #[arg(long)]
        feedback: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Decision {
    Pass,
    Fail,
}

impl From<Decision> for ReviewDecision {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Pass => Self::Pass,
            Decision::Fail => Self::Fail,
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let curriculum = config::load_curriculum(cli.answer_keys.as_deref())?;
    let db_url = config::normalize_sqlite_url(&cli.db_url);

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    config::prepare_sqlite_file(&db_url)?;
    let settings = CourseSettings {
        user_name: cli.user_name,
        reviewer: cli.reviewer,
        admin_password: cli.admin_secret,
    };
    let app = AppServices::new_sqlite(&db_url, Clock::default_clock(), curriculum, settings).await?;
    tracing::debug!(db = %db_url, "services ready");

    match cli.command {
        Commands::Lessons => commands::lessons(&app).await?,
        Commands::CompleteLesson { lesson_id } => commands::complete_lesson(&app, &lesson_id).await?,
        Commands::Quiz(QuizCommand::Submit { topic, answers }) => {
            commands::submit_quiz(&app, &topic, answers).await?;
        }
        Commands::Quiz(QuizCommand::Status { topic }) => {
            commands::quiz_status(&app, topic.as_deref()).await?;
        }
        Commands::Quiz(QuizCommand::Result { topic }) => commands::quiz_result(&app, &topic).await?,
        Commands::Admin { password, command } => {
            let session = app.admin_gate().login(&password)?;
            match command {
                AdminCommand::Pending => commands::admin_pending(&app, &session).await?,
                AdminCommand::Stats => commands::admin_stats(&app, &session).await?,
                AdminCommand::Show { id } => commands::admin_show(&app, &session, &id).await?,
                AdminCommand::Grade {
                    id,
                    decision,
                    score,
                    feedback,
                } => {
                    commands::admin_grade(
                        &app,
                        &session,
                        &id,
                        decision.into(),
                        score,
                        feedback.as_deref(),
                    )
                    .await?;
                }
            }
        }
        Commands::Project {
            html,
            css,
            js,
            dry_run,
        } => commands::project(&app, &html, &css, &js, dry_run).await?,
        Commands::Profile => commands::profile(&app).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
