use anyhow::Context;
use books_api::utils::logger;
use books_api::{BookDetails, BooksClient};
use clap::Parser;
use std::time::Duration;

/// Runs create, list, update, get and delete against a running books-api.
#[derive(Debug, Parser)]
#[command(name = "books-client")]
#[command(about = "Smoke test for the books API")]
struct ClientArgs {
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,

    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ClientArgs::parse();
    logger::init_client_logger(args.verbose);

    let client = BooksClient::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;

    let mut sample = BookDetails {
        title: "The Alchemist".to_string(),
        author: "Paulo Coelho".to_string(),
        isbn: "978-0062315007".to_string(),
    };

    let inserted = client
        .create_book(&sample)
        .await
        .context("create failed")?;
    println!("Created: {}", serde_json::to_string(&inserted)?);

    let books = client.list_books().await.context("list failed")?;
    println!("Books: {}", books.len());
    for book in &books {
        println!("  {:?}", book);
    }

    let first = books
        .first()
        .context("no books returned after create")?
        .id
        .to_hex();
    println!("First book id: {}", first);

    sample.title = "Updated Book".to_string();
    let updated = client
        .update_book(&first, &sample)
        .await
        .context("update failed")?;
    println!("Updated: {}", serde_json::to_string(&updated)?);

    let book = client.get_book(&first).await.context("get failed")?;
    println!("Fetched: {}", serde_json::to_string(&book)?);

    let deleted = client.delete_book(&first).await.context("delete failed")?;
    println!("Deleted: {}", serde_json::to_string(&deleted)?);

    Ok(())
}
