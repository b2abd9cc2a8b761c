//! twin-protocol CLI: inspect topics, envelopes and the adapter dispatch tree.
//!
//! Usage:
//!   twin-protocol [-v...] [--config FILE] parse-topic <TOPIC>
//!   twin-protocol [-v...] [--config FILE] resolve [FILE]
//!   twin-protocol [-v...] [--config FILE] translate [FILE]
//!   twin-protocol [-v...] [--config FILE] adapters
//!   twin-protocol [-v...] [--config FILE] tree

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;
use twin_protocol::topic::TopicAttribute;
use twin_protocol::{Adaptable, Capabilities, ProtocolAdapter, ProtocolConfig, TopicPath};

#[derive(Parser)]
#[command(
    name = "twin-protocol",
    version,
    about = "Digital-twin protocol adaptation layer"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML protocol configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a topic path and print its fields
    ParseTopic {
        /// Slash-delimited topic path
        topic: String,
    },
    /// Print the adapter selected for a JSON envelope
    Resolve {
        /// Envelope file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Decode a JSON envelope into a signal and encode it back
    Translate {
        /// Envelope file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// List registered adapters and their capabilities
    Adapters,
    /// Print the dispatch tree
    Tree,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn open_protocol(config: Option<&Path>) -> Result<ProtocolAdapter, String> {
    let config = match config {
        Some(path) => ProtocolConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {}", path.display(), e))?,
        None => ProtocolConfig::default(),
    };
    ProtocolAdapter::new(&config).map_err(|e| format!("Failed to build resolver: {}", e))
}

fn read_envelope(file: Option<&Path>) -> Result<Adaptable, String> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            text
        }
    };
    Adaptable::from_json_str(&text).map_err(|e| e.to_string())
}

fn cmd_parse_topic(topic: &str) -> i32 {
    let path = match TopicPath::parse(topic) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!("namespace:  {}", path.namespace());
    println!("name:       {}", path.entity_name());
    println!("group:      {}", path.group());
    println!("channel:    {}", path.channel());
    println!("criterion:  {}", path.criterion());
    if let Some(action) = path.action_token() {
        println!("action:     {}", action);
    }
    if let Some(subject) = path.subject() {
        println!("subject:    {}", subject);
    }
    println!("wildcard:   {}", path.is_wildcard_topic());
    println!("rendered:   {}", path.render());
    0
}

fn cmd_resolve(protocol: &ProtocolAdapter, file: Option<&Path>) -> i32 {
    let adaptable = match read_envelope(file) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let adapter = match protocol.resolve(&adaptable) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!("adapter:  {}", adapter.id());
    match adapter.validate_and_preprocess(adaptable) {
        Ok(preprocessed) => match adapter.type_tag(&preprocessed) {
            Some(tag) => println!("type-tag: {}", tag),
            None => println!("type-tag: (unrecognised payload path)"),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    }
    0
}

fn cmd_translate(protocol: &ProtocolAdapter, file: Option<&Path>) -> i32 {
    let adaptable = match read_envelope(file) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let channel = adaptable.topic_path().channel();
    let signal = match protocol.from_adaptable(adaptable) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!("{:#?}", signal);
    match protocol.to_json_string(&signal, channel) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn join<T: TopicAttribute>(values: impl IntoIterator<Item = T>) -> String {
    let tokens: Vec<&str> = values.into_iter().map(TopicAttribute::token).collect();
    if tokens.is_empty() {
        "-".to_string()
    } else {
        tokens.join(",")
    }
}

fn flags(capabilities: &Capabilities) -> String {
    let mut flags = Vec::new();
    if capabilities.for_responses {
        flags.push("responses");
    }
    if capabilities.requires_subject {
        flags.push("subject");
    }
    if capabilities.supports_wildcard_topics {
        flags.push("wildcard");
    }
    flags.join(",")
}

fn cmd_adapters(protocol: &ProtocolAdapter) -> i32 {
    println!(
        "{:<32}  {:<11}  {:<14}  {:<13}  {:<44}  FLAGS",
        "ADAPTER", "GROUPS", "CHANNELS", "CRITERIA", "ACTIONS"
    );
    println!("{}", "-".repeat(132));
    for adapter in protocol.resolver().adapters() {
        let caps = adapter.capabilities();
        let actions = [
            join(caps.actions.iter().copied()),
            join(caps.search_actions.iter().copied()),
            join(caps.streaming_actions.iter().copied()),
        ]
        .into_iter()
        .filter(|a| a != "-")
        .collect::<Vec<_>>();
        let actions = if actions.is_empty() {
            "-".to_string()
        } else {
            actions.join(",")
        };
        println!(
            "{:<32}  {:<11}  {:<14}  {:<13}  {:<44}  {}",
            adapter.id(),
            join(caps.groups.iter().copied()),
            join(caps.channels.iter().copied()),
            join(caps.criteria.iter().copied()),
            actions,
            flags(caps)
        );
    }
    0
}

fn cmd_tree(protocol: &ProtocolAdapter) -> i32 {
    let resolver = protocol.resolver();
    print!("{}", resolver.describe());
    println!(
        "({} nodes, depth {})",
        resolver.node_count(),
        resolver.depth()
    );
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::ParseTopic { topic } = &cli.command {
        std::process::exit(cmd_parse_topic(topic));
    }

    let protocol = match open_protocol(cli.config.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let code = match cli.command {
        Commands::ParseTopic { .. } => 0,
        Commands::Resolve { file } => cmd_resolve(&protocol, file.as_deref()),
        Commands::Translate { file } => cmd_translate(&protocol, file.as_deref()),
        Commands::Adapters => cmd_adapters(&protocol),
        Commands::Tree => cmd_tree(&protocol),
    };
    std::process::exit(code);
}
