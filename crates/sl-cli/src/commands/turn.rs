use sl_core::StateStore;

use super::{OracleArgs, PipelineArgs};

pub fn run(
    store: StateStore,
    action: &str,
    confirm_reset: bool,
    oracle: &OracleArgs,
    pipeline: &PipelineArgs,
) -> Result<(), String> {
    let mut gm = super::game_master(store, oracle, pipeline)?;
    let response = gm
        .handle_action(action, confirm_reset)
        .map_err(|e| e.to_string())?;
    tracing::debug!(status = %response.status, "turn finished");

    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
