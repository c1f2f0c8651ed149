//! The interactive console loop.
//!
//! Rendering here is deliberately plain: the session core produces markdown
//! and rendering hints for a richer front end; this loop prints them as-is.

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use aegis_application::{ConsoleSession, DispatchOutcome};
use aegis_core::config::ConsoleConfig;
use aegis_core::logbook::LogChannel;
use aegis_core::session::ConnectionState;

pub async fn run(config: ConsoleConfig) -> Result<()> {
    let session = ConsoleSession::connect(config);

    println!("Probing backend at {}...", session.config().backend_url);
    session.start().await;

    match session.connection_state().await {
        ConnectionState::Online => println!("[{}]", "connected".green()),
        _ => println!("[{}]", "demo mode".yellow()),
    }

    // The greeting is the first transcript entry
    if let Some(greeting) = session.messages().await.first() {
        println!("\n{}\n", greeting.content);
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("aegis> ") {
            Ok(line) => {
                let input = line.trim().to_string();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&input);

                match input.as_str() {
                    ":quit" | ":q" => break,
                    ":metrics" => print_metrics(&session).await,
                    ":logs" => print_logs(&session).await,
                    ":reset" => {
                        session.reset().await;
                        println!("{}", "session reset".yellow());
                    }
                    _ => match session.submit(&input).await {
                        DispatchOutcome::Replied(reply) if reply.is_error => {
                            println!("\n{}\n", reply.content.red());
                        }
                        DispatchOutcome::Replied(reply) => {
                            println!("\n{}\n", reply.content);
                        }
                        DispatchOutcome::Ignored => {}
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                tracing::error!(error = %err, "readline failed");
                break;
            }
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn print_metrics(session: &ConsoleSession) {
    let sample = session.current_sample().await;
    let origin = if sample.synthetic { "synthetic" } else { "live" };

    println!("  cpu     {:>7}%", sample.cpu.display());
    println!("  memory  {:>7}%", sample.memory.display());
    println!("  disk    {:>7}%", sample.disk.display());
    println!("  latency {:>7} ms", sample.latency.display());
    println!("  rps     {:>7}", sample.rps.display());
    println!(
        "  ({origin}, {} chart points)",
        session.chart_points().await.len()
    );
}

async fn print_logs(session: &ConsoleSession) {
    for channel in [LogChannel::Pipeline, LogChannel::Dispatcher] {
        println!("--- {channel} ---");
        for entry in session.log_entries(channel).await {
            let level = match entry.level {
                aegis_core::logbook::LogLevel::Info => format!("{}", "INFO".green()),
                aegis_core::logbook::LogLevel::Warn => format!("{}", "WARN".yellow()),
                aegis_core::logbook::LogLevel::Err => format!("{}", "ERR".red()),
            };
            println!("  {} {:<4} {}", entry.time, level, entry.message);
        }
    }
}
