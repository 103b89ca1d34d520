use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use induct::{read_input, split_messages};
use induct_core::{Config, Normalizer, Submitter, SubmissionSource};
use induct_feeds::{
    ingest_rows, text, Envelope, InMemorySessionStore, InboundMessage, JsonLinesSink,
    MessageRelay, RelaySession, SessionStore, SheetFormat,
};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "induct", about = "Trainset induction intake — reports and bulk sheets to induction records")]
struct Cli {
    /// Config file layered over the built-in defaults
    /// (default: ~/.config/induct/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (logs go to stderr; RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse one message (file or stdin) and print its induction record.
    Parse {
        file: Option<PathBuf>,
        #[arg(long, default_value = "manual_entry")]
        source: SubmissionSource,
        /// Print the extracted fields instead of the record.
        #[arg(long)]
        fields_only: bool,
        #[command(flatten)]
        submitter: SubmitterArgs,
    },
    /// Read a CSV sheet or XML upload and print one record per line.
    Bulk {
        file: PathBuf,
        /// `csv` or `xml` (default: from the file extension).
        #[arg(long)]
        format: Option<SheetFormat>,
        #[command(flatten)]
        submitter: SubmitterArgs,
    },
    /// Run `---`-separated messages through the chat relay and print replies.
    Relay {
        file: Option<PathBuf>,
        /// Append accepted records here as JSON lines.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Sender address recorded on every message.
        #[arg(long, default_value = "cli")]
        from: String,
        #[command(flatten)]
        submitter: SubmitterArgs,
    },
}

#[derive(Args)]
struct SubmitterArgs {
    #[arg(long, default_value = "cli")]
    user_id: String,
    #[arg(long, default_value = "")]
    user_name: String,
    #[arg(long, default_value = "")]
    user_email: String,
    /// Submission date, YYYY-MM-DD (default: today, UTC).
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl SubmitterArgs {
    fn submitter(&self) -> Submitter {
        Submitter::new(&self.user_id, &self.user_name, &self.user_email)
    }

    fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(p) => Config::load_from(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to built-in config");
            Config::defaults()
        })),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let config = load_config(cli.config.as_deref())?;
    let normalizer = Normalizer::from_config(&config);

    match cli.command {
        Command::Parse {
            file,
            source,
            fields_only,
            submitter,
        } => {
            let raw = read_input(file.as_deref()).context("reading message")?;
            let fields = text::parse_message_bytes(&normalizer, &raw)?;
            if fields_only {
                println!("{}", serde_json::to_string_pretty(&fields)?);
                return Ok(());
            }
            if !fields.has_train_id() {
                bail!("no train set id found in message (e.g. Train Set: KMRC-012)");
            }
            let record = normalizer.build(&fields, &submitter.submitter(), source, submitter.date());
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Bulk {
            file,
            format,
            submitter,
        } => {
            let sheet = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let format = format.unwrap_or_else(|| SheetFormat::from_path(&file));
            let rows = format
                .read(&sheet)
                .with_context(|| format!("reading {} as {format}", file.display()))?;
            let file_name = file.file_name().map(|name| name.to_string_lossy());

            let sink = JsonLinesSink::new(std::io::stdout());
            let report = ingest_rows(
                &rows,
                &submitter.submitter(),
                submitter.date(),
                &normalizer,
                &sink,
                file_name.as_deref(),
            )
            .await?;
            if !report.skipped_rows.is_empty() {
                tracing::warn!(rows = ?report.skipped_rows, "rows skipped for missing train id");
            }
        }
        Command::Relay {
            file,
            out,
            from,
            submitter,
        } => {
            let raw = read_input(file.as_deref()).context("reading messages")?;
            let batch = String::from_utf8_lossy(&raw);
            let writer: Box<dyn Write + Send> = match &out {
                Some(path) => Box::new(
                    File::options()
                        .create(true)
                        .append(true)
                        .open(path)
                        .with_context(|| format!("opening {}", path.display()))?,
                ),
                None => Box::new(std::io::sink()),
            };

            let identity = submitter.submitter();
            let account_id = identity.id.clone();
            let sessions = InMemorySessionStore::new();
            sessions.put(RelaySession::connected(identity));
            let relay = MessageRelay::new(&config, JsonLinesSink::new(writer), sessions);

            let (inbound_tx, inbound_rx) = mpsc::channel(32);
            let (reply_tx, mut reply_rx) = mpsc::channel(32);
            let relay_task = tokio::spawn(relay.run(inbound_rx, reply_tx));

            let date = submitter.date();
            let messages = split_messages(&batch);
            let feeder = tokio::spawn(async move {
                for body in messages {
                    let message = InboundMessage::text(from.clone(), from.clone(), &body, date);
                    let envelope = Envelope {
                        account_id: account_id.clone(),
                        message,
                    };
                    if inbound_tx.send(envelope).await.is_err() {
                        break;
                    }
                }
            });

            while let Some(reply) = reply_rx.recv().await {
                println!("{}\n---", reply.text);
            }
            feeder.await?;
            let stats = relay_task.await?;
            tracing::info!(
                accepted = stats.accepted,
                rejected = stats.rejected,
                ignored = stats.ignored,
                failed = stats.failed,
                "relay batch done"
            );
        }
    }

    Ok(())
}
