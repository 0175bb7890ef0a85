//! Store and configuration status command.

use anyhow::Result;
use console::style;

use switchboard_types::memory::MemoryDocument;

use crate::state::AppState;

/// Display data-dir, config, and memory-store status.
///
/// Reads the persisted document directly so the numbers reflect what is on
/// disk, not what a running server holds in memory.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let doc = match tokio::fs::read_to_string(&state.store_path).await {
        Ok(content) => serde_json::from_str::<MemoryDocument>(&content).unwrap_or_default(),
        Err(_) => MemoryDocument::new(),
    };

    let users = doc.len();
    let notes: usize = doc.values().map(|r| r.notes.len()).sum();
    let pairs = pair_count(&doc);

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "store_path": state.store_path.display().to_string(),
            "model": state.config.model,
            "browse_base_url": state.config.browse_base_url,
            "memory": {
                "users": users,
                "notes": notes,
                "pairs": pairs,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Switchboard v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Config ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).bold());
    println!("  Model:    {}", style(&state.config.model).bold());
    println!(
        "  Browser:  {}",
        style(&state.config.browse_base_url).bold()
    );
    println!();

    println!("  {}", style("── Memory ──").dim());
    println!("  Store:    {}", state.store_path.display());
    println!("  Users:    {}", style(users).bold());
    println!("  Notes:    {}", style(notes).bold());
    println!("  Pairs:    {}", style(pairs).bold());
    println!();

    Ok(())
}

/// Count distinct associations. Each symmetric pair stores two map
/// entries, a self-pair stores one; counting entries where key <= value
/// tallies both correctly.
fn pair_count(doc: &MemoryDocument) -> usize {
    doc.values()
        .map(|r| r.pairs.iter().filter(|(k, v)| k <= v).count())
        .sum()
}
