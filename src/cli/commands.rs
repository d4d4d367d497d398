//! CLI command implementations
//!
//! Each command opens a `LogEngine`, performs one operation and reports the
//! outcome. `TopicNotFound`, `RecordNotFound`, "already exists" and "does
//! not exist" are informational: they are printed and the command succeeds.

use serde_json::json;

use crate::config::EngineConfig;
use crate::engine::{EngineError, LogEngine};
use crate::observability::{Logger, Severity};
use crate::topic::{CreateOutcome, DeleteOutcome};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::Output;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let output = Output::new(cli.json);

    let result = run_cli(cli, output);
    if let Err(ref e) = result {
        output.failure(e.code_str(), e.message())?;
    }
    result
}

/// Run a parsed command line
pub fn run_cli(cli: Cli, output: Output) -> CliResult<()> {
    Logger::set_min_severity(severity_for(cli.verbose));

    let config = resolve_config(&cli)?;
    let engine = LogEngine::open(config)?;
    run_command(&engine, cli.command, output)
}

/// Run one command against an open engine
pub fn run_command(engine: &LogEngine, cmd: Command, output: Output) -> CliResult<()> {
    match cmd {
        Command::CreateTopic { topic } => create_topic(engine, &topic, output),
        Command::Produce { topic, message } => produce(engine, &topic, &message, output),
        Command::Consume { topic } => consume(engine, &topic, None, output),
        Command::ConsumeFromId { topic, from_id } => {
            consume(engine, &topic, Some(from_id), output)
        }
        Command::DeleteTopic { topic } => delete_topic(engine, &topic, output),
        Command::LastId { topic } => last_id(engine, &topic, output),
        Command::ListTopics => list_topics(engine, output),
    }
}

/// Build the engine configuration.
///
/// Config file (if any), then environment, then `--topics-dir`.
pub fn resolve_config(cli: &Cli) -> CliResult<EngineConfig> {
    let mut config = EngineConfig::from_env(cli.config.as_deref())?;

    if let Some(dir) = &cli.topics_dir {
        config = config.with_topics_dir(dir);
        config.validate()?;
    }
    Ok(config)
}

fn severity_for(verbose: u8) -> Severity {
    match verbose {
        0 => Severity::Warn,
        1 => Severity::Info,
        _ => Severity::Trace,
    }
}

/// Create a topic
pub fn create_topic(engine: &LogEngine, topic: &str, output: Output) -> CliResult<()> {
    let (text, created) = match engine.create_topic(topic)? {
        CreateOutcome::Created => (format!("Topic '{}' created.", topic), true),
        CreateOutcome::AlreadyExists => (format!("Topic '{}' already exists.", topic), false),
    };
    output.outcome(&text, json!({ "topic": topic, "created": created }))
}

/// Append one message
pub fn produce(engine: &LogEngine, topic: &str, message: &str, output: Output) -> CliResult<()> {
    match engine.produce(topic, message) {
        Ok(id) => output.outcome(
            &format!(
                "Message '{}' written to topic '{}' with id {}.",
                message, topic, id
            ),
            json!({ "topic": topic, "id": id }),
        ),
        Err(e) => informational(e, output),
    }
}

/// Print messages, from the start or from `from_id` onward
pub fn consume(
    engine: &LogEngine,
    topic: &str,
    from_id: Option<u32>,
    output: Output,
) -> CliResult<()> {
    let opened = match from_id {
        Some(id) => engine.consume_from(topic, id),
        None => engine.consume(topic),
    };
    let records = match opened {
        Ok(records) => records,
        Err(e) => return informational(e, output),
    };

    for record in records {
        output.record(&record?)?;
    }
    Ok(())
}

/// Delete a topic
pub fn delete_topic(engine: &LogEngine, topic: &str, output: Output) -> CliResult<()> {
    let (text, deleted) = match engine.delete_topic(topic)? {
        DeleteOutcome::Deleted => (format!("Topic '{}' deleted.", topic), true),
        DeleteOutcome::NotFound => (format!("Topic '{}' does not exist.", topic), false),
    };
    output.outcome(&text, json!({ "topic": topic, "deleted": deleted }))
}

/// Print the last assigned id
pub fn last_id(engine: &LogEngine, topic: &str, output: Output) -> CliResult<()> {
    match engine.last_id(topic) {
        Ok(id) => output.outcome(
            &id.to_string(),
            json!({ "topic": topic, "last_id": id }),
        ),
        Err(e) => informational(e, output),
    }
}

/// Print every topic name
pub fn list_topics(engine: &LogEngine, output: Output) -> CliResult<()> {
    let topics = engine.list_topics()?;
    if output.is_json() {
        return output.outcome("", json!({ "topics": topics }));
    }
    for topic in &topics {
        output.outcome(topic, json!(topic))?;
    }
    Ok(())
}

/// Report `TopicNotFound` / `RecordNotFound` as a message; anything else
/// is a failure.
fn informational(err: EngineError, output: Output) -> CliResult<()> {
    let text = match &err {
        EngineError::TopicNotFound(topic) => format!("Topic '{}' does not exist.", topic),
        EngineError::RecordNotFound { topic, id } => {
            format!("No message with id {} in topic '{}'.", id, topic)
        }
        _ => return Err(CliError::from(err)),
    };
    output.outcome(&text, json!({ "code": err.code(), "message": text }))
}
