//! CLI argument definitions using clap
//!
//! Commands:
//! - kafkalite create_topic <topic>
//! - kafkalite produce <topic> -m <message>
//! - kafkalite consume <topic>
//! - kafkalite consume_from_id <topic> --from_id <id>
//! - kafkalite delete_topic <topic>
//! - kafkalite last_id <topic>
//! - kafkalite list_topics

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// KafkaLite - a single-process, file-backed topic log
#[derive(Parser, Debug)]
#[command(name = "kafkalite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root directory holding the topics (overrides config and environment)
    #[arg(long, global = true)]
    pub topics_dir: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object per result
    #[arg(long, global = true)]
    pub json: bool,

    /// Raise log verbosity (-v info, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a topic
    #[command(name = "create_topic")]
    CreateTopic {
        /// Topic name
        topic: String,
    },

    /// Append a message to a topic
    Produce {
        /// Topic name
        topic: String,

        /// Message to append (must not be empty)
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        message: String,
    },

    /// Print every message of a topic
    Consume {
        /// Topic name
        topic: String,
    },

    /// Print messages starting at a given id
    #[command(name = "consume_from_id")]
    ConsumeFromId {
        /// Topic name
        topic: String,

        /// First message id to print
        #[arg(long = "from_id", default_value_t = 1)]
        from_id: u32,
    },

    /// Delete a topic and all of its messages
    #[command(name = "delete_topic")]
    DeleteTopic {
        /// Topic name
        topic: String,
    },

    /// Print the last assigned message id of a topic
    #[command(name = "last_id")]
    LastId {
        /// Topic name
        topic: String,
    },

    /// Print the names of all topics
    #[command(name = "list_topics")]
    ListTopics,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
