use colored::Colorize;

use super::OracleArgs;

pub fn run(oracle: &OracleArgs) -> Result<(), String> {
    let client = oracle.client()?;
    let status = client
        .test_connection()
        .map_err(|e| format!("cannot reach {}: {e}", client.config().base_url))?;
    println!("{} {}", status.green(), client.config().base_url);
    Ok(())
}
