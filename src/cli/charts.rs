use tabled::Table;

use crate::{
    cli, error,
    error::ApiError,
    info,
    management::TokenCache,
    types::{ArtistTableRow, GenreTableRow, ReleaseTableRow},
    warning,
};

pub async fn charts(limit: u32) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching top artists...");
    let result = client.top_artists(limit).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => match envelope.result {
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
                println!("{}", Table::new(table_rows));
            }
            Some(_) => info!("The chart is empty right now."),
            None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
        },
        Err(e) => error!("Failed to fetch charts: {}", e),
    }
}

pub async fn genres() {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching genres...");
    let result = client.genres().await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => match envelope.result {
            Some(genres) if !genres.is_empty() => {
                let table_rows: Vec<GenreTableRow> = genres
                    .into_iter()
                    .map(|g| GenreTableRow {
                        id: g.id,
                        name: g.name,
                    })
                    .collect();
                println!("{}", Table::new(table_rows));
            }
            Some(_) => info!("No genres listed."),
            None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
        },
        Err(e) => error!("Failed to fetch genres: {}", e),
    }
}

pub async fn favourites(limit: u32) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching your favourites...");
    let result = client.favourites(limit).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => {
            // A refresh may have replaced the token; keep the cache current.
            if let Some(token) = client.current_token().await {
                let _ = TokenCache::new(token).persist().await;
            }

            match envelope.result {
                Some(releases) if !releases.is_empty() => {
                    let table_rows: Vec<ReleaseTableRow> = releases
                        .iter()
                        .map(|r| ReleaseTableRow {
                            date: r.release_date.clone().unwrap_or_default(),
                            name: r.name.clone(),
                            artists: cli::releases::artist_names(r),
                        })
                        .collect();
                    println!("{}", Table::new(table_rows));
                }
                Some(_) => info!("You have no saved releases yet."),
                None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
            }
        }
        Err(ApiError::AuthenticationRequired(_)) => {
            error!("You are not signed in. Run tonalcli auth first.");
        }
        Err(e) => error!("Failed to fetch favourites: {}", e),
    }
}
