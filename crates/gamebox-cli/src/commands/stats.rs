use super::Context;
use anyhow::Result;
use chrono::{Datelike, Utc};
use gamebox_library::ProfileStats;

const BAR_WIDTH: usize = 20;

pub async fn run(ctx: &Context) -> Result<()> {
    let library = ctx.library().await?;
    let year = Utc::now().year();
    let stats = library.stats(year);

    println!("Profile: {}", library.user_id());
    println!(
        "  {} games in collection, {} added in {}, {} on the wishlist, {} reviews",
        stats.total,
        stats.this_year,
        year,
        stats.wishlist.len(),
        stats.reviews.len()
    );

    if !stats.favorites.is_empty() {
        println!("\nFavorites");
        for entry in &stats.favorites {
            println!("  {:.1}/5  {}", entry.rating, entry.title);
        }
    }

    print_histogram(&stats);

    if !stats.top_platforms.is_empty() {
        println!("\nPlatforms");
        for share in &stats.top_platforms {
            println!("  {:<16} {:>3}  {:>3}%", share.name, share.count, share.percent);
        }
    }

    if !stats.recent_activity.is_empty() {
        println!("\nRecent activity");
        for entry in &stats.recent_activity {
            println!("  {:<10} {}", entry.status.as_str(), entry.title);
        }
    }

    Ok(())
}

fn print_histogram(stats: &ProfileStats<'_>) {
    if stats.ratings_histogram.iter().all(|count| *count == 0) {
        return;
    }

    println!("\nRatings");
    for (bin, count) in stats.ratings_histogram.iter().enumerate() {
        let upper = (bin + 1) as f32 / 2.0;
        let width = count * BAR_WIDTH / stats.max_rating_count;
        println!("  {:>3.1}  {:<bar$} {}", upper, "#".repeat(width), count, bar = BAR_WIDTH);
    }
}
