use crate::{
    error::Result,
    tonal::{client::TonalClient, parse::Payload},
    types::{Artist, Envelope, Genre, Release},
};

impl TonalClient {
    /// The current top-artists chart.
    pub async fn top_artists(&self, limit: u32) -> Result<Envelope<Vec<Artist>>> {
        let path = format!("/artists/top?limit={limit}");
        self.get_list(&path, false, Payload::NamedList("items"), Artist::from_value)
            .await
    }

    /// All catalogue genres.
    pub async fn genres(&self) -> Result<Envelope<Vec<Genre>>> {
        self.get_list("/genres", false, Payload::NamedList("items"), Genre::from_value)
            .await
    }

    /// The signed-in user's saved releases. Requires a user token; fails
    /// with an authentication-required error before any network I/O when
    /// none is usable.
    pub async fn favourites(&self, limit: u32) -> Result<Envelope<Vec<Release>>> {
        let path = format!("/user/favourites?limit={limit}");
        self.get_list(&path, true, Payload::NamedList("items"), Release::from_value)
            .await
    }
}
