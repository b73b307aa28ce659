use crate::{
    error::Result,
    tonal::{client::TonalClient, parse::Payload},
    types::{Artist, Envelope},
};

impl TonalClient {
    /// Search the catalogue for artists matching `query`.
    ///
    /// Anonymous (signed) call. The endpoint answers with a named `items`
    /// list; an empty or omitted list is a successful empty result.
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Envelope<Vec<Artist>>> {
        let path = format!(
            "/artists/search?q={q}&limit={limit}",
            q = urlencoding::encode(query),
        );
        self.get_list(&path, false, Payload::NamedList("items"), Artist::from_value)
            .await
    }

    /// Artists similar to the given one, catalogue-ranked.
    ///
    /// This endpoint returns its items as a bare JSON array.
    pub async fn similar_artists(
        &self,
        artist_id: &str,
        limit: u32,
    ) -> Result<Envelope<Vec<Artist>>> {
        let path = format!("/artists/{artist_id}/similar?limit={limit}");
        self.get_list(&path, false, Payload::Array, Artist::from_value)
            .await
    }
}
