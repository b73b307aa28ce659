use tabled::Table;

use crate::{
    cli, error, info,
    types::{Release, ReleaseTableRow},
    warning,
};

pub async fn releases(limit: u32) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching new releases...");
    let result = client.new_releases(limit).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => match envelope.result {
            Some(releases) if !releases.is_empty() => print_release_table(releases),
            Some(_) => info!("No new releases right now."),
            None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
        },
        Err(e) => error!("Failed to fetch releases: {}", e),
    }
}

pub async fn release(release_id: String) {
    let client = cli::client_with_cached_token().await;

    let pb = cli::spinner("Fetching release...");
    let result = client.release(&release_id).await;
    pb.finish_and_clear();

    match result {
        Ok(envelope) => match envelope.result {
            Some(releases) => match releases.into_iter().next() {
                Some(release) => print_release(&release),
                None => info!("No release with id '{}'.", release_id),
            },
            None => warning!("Request failed. {}", cli::failure_summary(&envelope)),
        },
        Err(e) => error!("Failed to fetch release: {}", e),
    }
}

fn print_release(release: &Release) {
    info!("{} [{}]", release.name, release.id);
    if let Some(date) = &release.release_date {
        info!("Released: {}", date);
    }
    if let Some(kind) = &release.kind {
        info!("Type: {}", kind);
    }
    if !release.artists.is_empty() {
        info!("By: {}", artist_names(release));
    }
}

fn print_release_table(releases: Vec<Release>) {
    let table_rows: Vec<ReleaseTableRow> = releases
        .iter()
        .map(|r| ReleaseTableRow {
            date: r.release_date.clone().unwrap_or_default(),
            name: r.name.clone(),
            artists: artist_names(r),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

pub(crate) fn artist_names(release: &Release) -> String {
    release
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
