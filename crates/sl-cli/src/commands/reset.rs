use std::io::{self, Write};

use sl_core::StateStore;
use sl_pipeline::RESET_CONFIRMATION;

pub fn run(store: &StateStore, force: bool) -> Result<(), String> {
    if !force {
        print!(
            "This discards all progress in {}. Type {RESET_CONFIRMATION} to confirm: ",
            store.path().display()
        );
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .map_err(|e| e.to_string())?;
        if answer.trim() != RESET_CONFIRMATION {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    store
        .reset(store.template())
        .map_err(|e| format!("reset failed: {e}"))?;
    println!(
        "Reset {} from {}",
        store.path().display(),
        store.template().display()
    );
    Ok(())
}
