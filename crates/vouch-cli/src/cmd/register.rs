use std::path::Path;

use crate::output::{print_json, print_table};

use super::{discord_api, load_config};

pub fn run(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let api = discord_api(&config);

    let rt = tokio::runtime::Runtime::new()?;
    let registered = rt.block_on(vouch_server::registrar::register_commands(
        api.as_ref(),
        &config,
    ))?;

    if json {
        let items: Vec<_> = registered
            .iter()
            .map(|c| serde_json::json!({ "id": c.id, "name": c.name }))
            .collect();
        return print_json(&items);
    }

    println!(
        "Registered {} command(s) in guild {}",
        registered.len(),
        config.guild_id
    );
    let rows = registered
        .iter()
        .map(|c| vec![format!("/{}", c.name), c.id.clone()])
        .collect();
    print_table(&["COMMAND", "ID"], rows);
    Ok(())
}
