use crate::{
    error::{ApiError, Result},
    tonal::client::TonalClient,
    types::UserToken,
};

impl TonalClient {
    /// URL of the consent page the host application sends the user to.
    ///
    /// The redirect back to `redirect_uri` carries the authorization code
    /// for [`exchange_code`](TonalClient::exchange_code). How the page is
    /// presented (browser tab, embedded view) is the host's business.
    pub fn authorize_url(&self) -> String {
        let config = self.config();
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
            auth_url = config.auth_url,
            client_id = config.credentials.app_id,
            redirect_uri = urlencoding::encode(&config.redirect_uri),
            scope = urlencoding::encode(&config.scope),
        )
    }

    /// Exchange an authorization code for a user token.
    ///
    /// On success the new token is stored in the client (replacing any
    /// previous one whole) and returned for the caller to persist.
    pub async fn exchange_code(&self, code: &str) -> Result<UserToken> {
        let config = self.config();
        let form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), config.redirect_uri.clone()),
            ("client_id".to_string(), config.credentials.app_id.clone()),
            (
                "client_secret".to_string(),
                config.credentials.app_secret.clone(),
            ),
        ];

        let response = self
            .request_token(form)
            .await
            .map_err(|status| ApiError::CodeExchangeFailed { status })?;

        let token = response.into_user_token(chrono::Utc::now().naive_utc());
        self.set_token(Some(token.clone())).await;
        tracing::info!(target: "tonal", "authorization code exchanged for user token");
        Ok(token)
    }
}
