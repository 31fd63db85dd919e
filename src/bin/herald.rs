// src/bin/herald.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use herald::{
    arguments::{
        mention::UserArg,
        primitives::{IntArg, RemainderArg, WordArg},
    },
    constants::CONFIG_FILENAME,
    core::{
        builder::NodeBuilder,
        config::DispatchConfig,
        dispatcher::FeedbackSink,
        walker::DispatchError,
    },
    models::{ArgValue, MessageEvent},
    state,
    system::pool::DispatchPool,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

/// A console playground for the herald dispatch engine: every line you type
/// is treated as one incoming chat message.
#[derive(Parser, Debug)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Path to the engine configuration file.
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Override the command prefix from the config file.
    #[arg(long)]
    prefix: Option<String>,

    /// Override the worker-pool size from the config file.
    #[arg(long)]
    workers: Option<usize>,

    /// Grant the demo author the "admin" role (unlocks the mod commands).
    #[arg(long)]
    admin: bool,
}

/// Renders dispatch failures to the console, one colored line per error.
struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn report(&self, _event: &MessageEvent, error: &DispatchError) {
        match error {
            DispatchError::Unexpected(_) => {
                println!("{} {}", "✖".red().bold(), error.to_string().red());
            }
            _ => println!("{} {}", "✖".yellow().bold(), error),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut config = DispatchConfig::load_or_default(&cli.config)?;
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    state::set_prefix(&config.prefix)?;
    register_demo_commands()?;
    let registry = state::freeze();

    let pool = DispatchPool::new(registry, Arc::new(ConsoleSink), config.workers)?;

    println!(
        "herald console — prefix '{}', {} workers. Type messages; 'quit' to exit.",
        config.prefix.cyan(),
        config.workers
    );

    let author_roles = if cli.admin {
        vec!["admin".to_string()]
    } else {
        Vec::new()
    };

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".dimmed());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line == "quit" {
            break;
        }

        pool.submit(MessageEvent {
            author_id: 1,
            channel_id: 1,
            guild_id: Some(1),
            roles: author_roles.clone(),
            content: line.to_string(),
        });
    }

    Ok(())
}

/// The demo grammar: a small but representative command set covering
/// literals, typed arguments, optional arguments, and requirements.
fn register_demo_commands() -> Result<()> {
    state::register(
        ["ping", "p"],
        NodeBuilder::root().executes(|_ctx| {
            println!("{}", "pong".green());
            Ok(())
        }),
    )?;

    state::register(
        ["echo"],
        NodeBuilder::root().child(
            NodeBuilder::argument("text", "the text to repeat", RemainderArg).executes(|ctx| {
                let text = ctx.arg(0).and_then(ArgValue::as_str).unwrap_or_default();
                println!("{}", text.green());
                Ok(())
            }),
        ),
    )?;

    state::register(
        ["count"],
        NodeBuilder::root().child(
            NodeBuilder::argument("n", "how high to count", IntArg::between(1, 100)).executes(
                |ctx| {
                    let n = ctx.arg(0).and_then(ArgValue::as_int).unwrap_or_default();
                    let sequence: Vec<String> = (1..=n).map(|i| i.to_string()).collect();
                    println!("{}", sequence.join(" ").green());
                    Ok(())
                },
            ),
        ),
    )?;

    // `role add <user>` / `role remove <user>`, gated behind the admin role.
    let admin_only = |event: &MessageEvent| {
        if event.has_role("admin") {
            Ok(())
        } else {
            Err("requires the admin role (run with --admin)".to_string())
        }
    };
    state::register(
        ["role"],
        NodeBuilder::root()
            .require(admin_only)
            .child(
                NodeBuilder::literal("add").child(
                    NodeBuilder::argument("user", "who to promote", UserArg).executes(|ctx| {
                        println!("{} promoted user {}", "✔".green(), ctx.arg(0).map(ToString::to_string).unwrap_or_default());
                        Ok(())
                    }),
                ),
            )
            .child(
                NodeBuilder::literal("remove").child(
                    NodeBuilder::argument("user", "who to demote", UserArg).executes(|ctx| {
                        println!("{} demoted user {}", "✔".green(), ctx.arg(0).map(ToString::to_string).unwrap_or_default());
                        Ok(())
                    }),
                ),
            ),
    )?;

    // `rename [user] <name>`: the leading user argument is optional, which
    // the grammar expresses as two sibling paths.
    state::register(
        ["rename"],
        NodeBuilder::root()
            .child(
                NodeBuilder::argument("user", "who to rename", UserArg).child(
                    NodeBuilder::argument("name", "the new name", WordArg).executes(|ctx| {
                        println!(
                            "{} renamed {} to '{}'",
                            "✔".green(),
                            ctx.arg(0).map(ToString::to_string).unwrap_or_default(),
                            ctx.arg(1).and_then(ArgValue::as_str).unwrap_or_default()
                        );
                        Ok(())
                    }),
                ),
            )
            .child(
                NodeBuilder::argument("name", "the new name", WordArg).executes(|ctx| {
                    println!(
                        "{} renamed yourself to '{}'",
                        "✔".green(),
                        ctx.arg(0).and_then(ArgValue::as_str).unwrap_or_default()
                    );
                    Ok(())
                }),
            ),
    )?;

    Ok(())
}
