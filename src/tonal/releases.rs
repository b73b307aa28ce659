use crate::{
    error::Result,
    tonal::{client::TonalClient, parse::Payload},
    types::{Envelope, Release},
};

impl TonalClient {
    /// Latest releases across the catalogue, newest first.
    pub async fn new_releases(&self, limit: u32) -> Result<Envelope<Vec<Release>>> {
        let path = format!("/products/new-releases?limit={limit}");
        self.get_list(&path, false, Payload::NamedList("items"), Release::from_value)
            .await
    }

    /// A single release by catalogue id.
    ///
    /// The endpoint returns the release as the whole document; the envelope
    /// result holds zero or one element.
    pub async fn release(&self, release_id: &str) -> Result<Envelope<Vec<Release>>> {
        let path = format!("/products/{release_id}");
        self.get_list(&path, false, Payload::SingleItem, Release::from_value)
            .await
    }
}
