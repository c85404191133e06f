//! fxpad CLI - interactive form and one-shot calls against the evaluation
//! service

use clap::{Parser, Subcommand};
use colored::Colorize;

use fxpad::client::{create_backend, CheckQuery, EvalQuery, HttpBackend};
use fxpad::config::ClientConfig;
use fxpad::error::{ClientError, FixSuggestion};

#[derive(Parser)]
#[command(name = "fxpad")]
#[command(about = "Terminal client for a remote math expression evaluation service")]
#[command(version)]
struct Cli {
    /// Override the service base URL (or set FXPAD_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Backend implementation (http, mock)
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive form (default)
    Tui,

    /// Evaluate an expression once and print the result
    Eval {
        /// Expression to evaluate
        expression: String,

        /// Variable binding as name=value (repeatable)
        #[arg(short = 'V', long = "var")]
        vars: Vec<String>,

        /// Print the request URL without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the service whether an expression is valid
    Check {
        /// Expression to validate
        expression: String,

        /// Variable name (repeatable)
        #[arg(short = 'V', long = "var")]
        vars: Vec<String>,

        /// Print the request URL without sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never corrupt the alternate screen or
    // one-shot output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::resolve(cli.base_url.clone(), cli.backend.clone());

    let result: anyhow::Result<()> = match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => fxpad::tui::run(config).await,
        Commands::Eval {
            expression,
            vars,
            dry_run,
        } => eval_once(&config, expression, &vars, dry_run)
            .await
            .map_err(Into::into),
        Commands::Check {
            expression,
            vars,
            dry_run,
        } => check_once(&config, expression, &vars, dry_run)
            .await
            .map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<ClientError>()
            .and_then(|c| c.fix_suggestion())
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn eval_once(
    config: &ClientConfig,
    expression: String,
    vars: &[String],
    dry_run: bool,
) -> Result<(), ClientError> {
    let mut query = EvalQuery::new(expression);
    for var in vars {
        // "name=value"; a bare name binds the empty value
        let (name, value) = var.split_once('=').unwrap_or((var.as_str(), ""));
        query = query.with_binding(name, value);
    }

    if dry_run {
        let backend = HttpBackend::new(&config.base_url)?;
        println!("{}", backend.evaluate_url(&query)?);
        return Ok(());
    }

    let backend = create_backend(config)?;
    let outcome = backend.evaluate(&query).await?;
    println!("{} {}", "Result:".cyan().bold(), outcome.display());

    Ok(())
}

async fn check_once(
    config: &ClientConfig,
    expression: String,
    vars: &[String],
    dry_run: bool,
) -> Result<(), ClientError> {
    let mut query = CheckQuery::new(expression);
    for var in vars {
        query = query.with_name(var.clone());
    }

    if dry_run {
        let backend = HttpBackend::new(&config.base_url)?;
        println!("{}", backend.validate_url(&query)?);
        return Ok(());
    }

    let backend = create_backend(config)?;
    let outcome = backend.validate(&query).await?;

    if outcome.valid {
        println!("{} The expression is valid.", "✓".green());
    } else {
        println!("{} The expression is invalid.", "✗".red());
        for error in &outcome.errors {
            println!("  - {}", error);
        }
    }

    Ok(())
}
