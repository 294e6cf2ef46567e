use super::Context;
use anyhow::{Result, bail};
use gamebox_catalog::{CatalogGame, GameStatus, fallback_games};
use gamebox_library::{EntryPatch, LibraryEntry, LibraryView, SortOrder};

/// Find a game by catalog id, falling back to the curated picks
async fn resolve_game(ctx: &Context, id: &str) -> Result<CatalogGame> {
    if let Ok(numeric) = id.parse::<u64>()
        && let Some(game) = ctx.catalog()?.lookup(numeric).await
    {
        return Ok(game);
    }

    match fallback_games().into_iter().find(|game| game.id == id) {
        Some(game) => Ok(game),
        None => bail!("No catalog game with id {}", id),
    }
}

pub async fn add(ctx: &Context, id: &str, status: GameStatus) -> Result<()> {
    let game = resolve_game(ctx, id).await?;
    let mut library = ctx.library().await?;

    let entry = library.add_game(&game, status).await?;
    println!("Added {} as {}", entry.title, entry.status);
    Ok(())
}

pub async fn list(
    ctx: &Context,
    sort: SortOrder,
    filter: Option<&str>,
    view: LibraryView,
) -> Result<()> {
    let library = ctx.library().await?;
    let entries = library.select(view, filter, sort);

    if entries.is_empty() {
        println!("no signals");
        return Ok(());
    }

    for entry in entries {
        print_entry(entry);
    }
    Ok(())
}

pub async fn update(ctx: &Context, id: &str, patch: EntryPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to update; pass --status, --rating, --review, --platform or --completed");
    }

    let mut library = ctx.library().await?;
    library.update(id, patch).await?;

    if let Some(entry) = library.get(id) {
        print_entry(entry);
    }
    Ok(())
}

pub async fn remove(ctx: &Context, id: &str) -> Result<()> {
    let mut library = ctx.library().await?;
    let title = library.get(id).map(|entry| entry.title.clone());

    library.remove(id).await?;
    println!("Removed {}", title.as_deref().unwrap_or(id));
    Ok(())
}

fn print_entry(entry: &LibraryEntry) {
    let completed = entry
        .completed_at
        .map(|date| format!("  done {}", date))
        .unwrap_or_default();
    println!(
        "{:>8}  {:<10} {:.1}/5  {} [{}]{}",
        entry.id,
        entry.status.as_str(),
        entry.rating,
        entry.title,
        entry.played_on,
        completed
    );
    if entry.has_review() {
        println!("          \"{}\"", entry.user_review.trim());
    }
}
