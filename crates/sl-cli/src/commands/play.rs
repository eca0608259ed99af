use std::io::{self, BufRead, Write};

use colored::Colorize;
use sl_core::StateStore;
use sl_pipeline::{RESET_CONFIRMATION, TurnResponse, TurnStatus, is_reset_command};

use super::{OracleArgs, PipelineArgs};

/// Read one line. Returns `false` on EOF.
fn read_line(reader: &mut impl BufRead, line: &mut String) -> Result<bool, String> {
    line.clear();
    match reader.read_line(line) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(true),
        Err(e) => Err(e.to_string()),
    }
}

fn prompt(text: &str) -> Result<(), String> {
    print!("{text}");
    io::stdout().flush().map_err(|e| e.to_string())
}

fn print_response(response: &TurnResponse) {
    match response.status {
        TurnStatus::GuardVeto => {
            println!("{} {}\n", "[Guard veto]".red().bold(), response.message);
        }
        TurnStatus::WorldVeto => {
            println!("{} {}\n", "[World veto]".yellow().bold(), response.message);
        }
        TurnStatus::Resolved => {
            println!("{}", response.message);
            if let Some(rules) = &response.rules {
                let line = format!(
                    "d20 {} vs {}: {}",
                    rules.roll, rules.difficulty, rules.outcome
                );
                println!("{}", line.dimmed());
            }
            println!();
        }
        TurnStatus::ResetDone => println!("{}\n", response.message.green()),
        TurnStatus::Empty | TurnStatus::ResetConfirmationRequired => {
            println!("{}\n", response.message);
        }
    }
}

pub fn run(store: StateStore, oracle: &OracleArgs, pipeline: &PipelineArgs) -> Result<(), String> {
    let mut gm = super::game_master(store, oracle, pipeline)?;
    let state = gm.store().load().map_err(|e| e.to_string())?;

    println!("  {} Spielleiter", "Starting".bold());
    let location = state.world.current_location.as_deref().unwrap_or("somewhere");
    println!(
        "  {} ({}) at {} | Model: {}",
        state.character.name, state.character.class, location, oracle.model
    );
    println!("  Type 'quit' or 'exit' to save and leave.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        prompt("> ")?;
        if !read_line(&mut reader, &mut line)? {
            break;
        }

        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Game saved.");
            break;
        }

        let mut confirm = false;
        if is_reset_command(&input) {
            prompt(&format!(
                "This discards all progress. Type {RESET_CONFIRMATION} to confirm: "
            ))?;
            if !read_line(&mut reader, &mut line)? {
                break;
            }
            if line.trim() != RESET_CONFIRMATION {
                println!("Reset cancelled.\n");
                continue;
            }
            confirm = true;
        }

        match gm.handle_action(&input, confirm) {
            Ok(response) => print_response(&response),
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    Ok(())
}
