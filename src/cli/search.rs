use tabled::Table;

use crate::{
    cli, error, info,
    types::{Artist, ArtistTableRow, Envelope},
    warning,
};

pub async fn search(query: String, limit: u32) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Searching catalogue...");
    let result = client.search_artists(&query, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => print_artists(envelope, &format!("No artists matched '{}'.", query)),
        Err(e) => error!("Search failed: {}", e),
    }
}

pub async fn similar(artist_id: String, limit: u32) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching similar artists...");
    let result = client.similar_artists(&artist_id, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => print_artists(envelope, "No similar artists found."),
        Err(e) => error!("Similar-artist lookup failed: {}", e),
    }
}

fn print_artists(envelope: Envelope<Vec<Artist>>, empty_message: &str) {
    match envelope.result {
        Some(artists) if !artists.is_empty() => {
            let table_rows: Vec<ArtistTableRow> = artists
                .into_iter()
                .map(|a| ArtistTableRow {
                    name: a.name,
                    genres: a
                        .genres
                        .iter()
                        .take(3)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(","),
                })
                .collect();

            let table = Table::new(table_rows);
            println!("{}", table);
        }
        Some(_) => info!("{}", empty_message),
        None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
    }
}
