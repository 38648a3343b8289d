use chrono::{DateTime, Utc};
use nr_core::{Article, PageLink};
use nr_feed::FeedSnapshot;

pub fn print_results(snapshot: &FeedSnapshot, now: DateTime<Utc>) {
    let total = snapshot.total_results();
    let Some((first, last)) = snapshot.pagination.visible_range(total) else {
        println!("No articles found");
        return;
    };

    if snapshot.filters.is_active() {
        println!("🏷️  {} active filter(s)", snapshot.filters.active_count());
    }
    for article in snapshot.articles() {
        println!(
            "📰 {}\n   {} · {} · {}\n   {}",
            article.title,
            article.source.name,
            article.category,
            article.published_ago(now),
            article.id
        );
    }
    if snapshot.articles().is_empty() {
        println!("Nothing on page {}", snapshot.current_page());
    } else {
        println!("\nShowing {} - {} of {} results", first, last, total);
    }
    println!("Pages: {}", page_bar(snapshot));
}

fn page_bar(snapshot: &FeedSnapshot) -> String {
    snapshot
        .page_links()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == snapshot.current_page() => format!("[{}]", n),
            PageLink::Page(n) => n.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_article(article: &Article) {
    println!("{}", article.title);
    println!("{} · {} · {}", article.source.name, article.category, article.published_label());
    println!("{}\n", article.url);
    for paragraph in article.paragraphs() {
        println!("{}\n", paragraph);
    }
}
