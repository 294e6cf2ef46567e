use super::{Context, print_games};
use anyhow::Result;
use gamebox_catalog::SearchDebouncer;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn search(ctx: &Context, query: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let games = catalog.search(query).await;
    print_games(&games);
    Ok(())
}

/// Search as lines arrive on stdin; only the line before a pause is sent
pub async fn interactive(ctx: &Context) -> Result<()> {
    let catalog = Arc::new(ctx.catalog()?);
    let (debouncer, mut outcomes) = SearchDebouncer::from_settings(catalog, &ctx.config.search);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => pending = Some(debouncer.input(line)),
                None => break,
            },
            Some(outcome) = outcomes.recv() => {
                if pending == Some(outcome.generation) {
                    pending = None;
                }
                println!("> {}", outcome.query);
                print_games(&outcome.games);
            }
        }
    }

    // Input closed with a search still waiting out its quiet period
    if pending.is_some()
        && let Some(outcome) = outcomes.recv().await
    {
        println!("> {}", outcome.query);
        print_games(&outcome.games);
    }

    Ok(())
}

/// Top rated games, or the curated picks when the catalog is unreachable
pub async fn top(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let games = catalog.landing().await;
    print_games(&games);
    Ok(())
}
