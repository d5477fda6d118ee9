//! Headless Blockscape session.
//!
//! Usage: `blockscape [config-path]`
//!
//! Loads the configuration (defaults when the file is absent), replays a
//! short editing session through the command surface and prints the
//! resulting graph as JSON.

use blockscape::{default_config_path, init_logging, Command, Config, Session};
use serde_json::json;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("Blockscape {} (built {})", blockscape::VERSION, blockscape::BUILD_DATE);

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => default_config_path()?,
    };
    let config = Config::load_or_default(&path)?;
    let session = Session::new(&config);

    let width = config.scene.canvas_width;
    let height = config.scene.canvas_height;
    let reach = width * config.scene.default_catchment_area;

    let source = session
        .run(Command::CreateSource, json!({ "x": width / 2.0, "y": height / 2.0 }))
        .await?;
    let effect = session
        .run(Command::CreateEffect, json!({ "x": width / 2.0 + reach * 2.0, "y": height / 2.0 }))
        .await?;
    tracing::info!("Created source {} and effect {}", source["id"], effect["id"]);

    // Pull the effect into range, tune it, then take the tuning back and forth.
    session
        .run(
            Command::MoveBlock,
            json!({ "id": effect["id"], "x": width / 2.0 + reach / 2.0, "y": height / 2.0 }),
        )
        .await?;
    session
        .run(Command::SetParam, json!({ "id": effect["id"], "param": "roomSize", "value": 0.8 }))
        .await?;
    session.run(Command::Undo, json!(null)).await?;
    session.run(Command::Redo, json!(null)).await?;

    let history = session.scene().history().await?;
    tracing::info!("Undo history: {:?}", history.undo);

    println!("{}", serde_json::to_string_pretty(&session.describe())?);
    Ok(())
}
