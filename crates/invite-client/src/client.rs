use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use uuid::Uuid;

use invite_types::api::{
    AddReactionRequest, AdminLoginRequest, DashboardResponse, ErrorBody, LoginRequest, LoginResponse,
    ParticipantUpsert, ReactionsView, RegisterRequest, SubmitRsvpRequest, SubmitWishRequest, WishPage,
};
use invite_types::models::{Participant, Rsvp, Wish};

use crate::error::ClientError;

/// Typed access to the invitation service. Holds the session token after a
/// successful login. Requests are never retried.
pub struct InviteClient {
    http: Client,
    base_url: String,
    session: Option<LoginResponse>,
}

impl InviteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    /// The logged-in participant, if any.
    pub fn participant(&self) -> Option<&Participant> {
        self.session.as_ref().map(|s| &s.participant)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn remember(&mut self, login: &LoginResponse) {
        info!(username = %login.participant.username, role = login.participant.role.as_str(), "Logged in");
        self.session = Some(LoginResponse {
            token: login.token.clone(),
            participant: login.participant.clone(),
        });
    }

    /// Fails with a 404 [`ClientError::Status`] when the username was never
    /// invited; see [`ClientError::is_not_invited`].
    pub async fn login(&mut self, username: &str) -> Result<LoginResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest {
                username: username.to_string(),
            })
            .send()
            .await?;
        let login: LoginResponse = parse(resp).await?;
        self.remember(&login);
        Ok(login)
    }

    pub async fn register(
        &mut self,
        username: &str,
        display_name: &str,
        salutation: Option<&str>,
    ) -> Result<LoginResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                username: username.to_string(),
                display_name: display_name.to_string(),
                salutation: salutation.map(str::to_string),
            })
            .send()
            .await?;
        let login: LoginResponse = parse(resp).await?;
        self.remember(&login);
        Ok(login)
    }

    pub async fn admin_login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/auth/admin/login")
            .json(&AdminLoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let login: LoginResponse = parse(resp).await?;
        self.remember(&login);
        Ok(login)
    }

    pub async fn me(&self) -> Result<Participant, ClientError> {
        parse(self.request(Method::GET, "/me").send().await?).await
    }

    pub async fn submit_rsvp(&self, answers: &SubmitRsvpRequest) -> Result<Rsvp, ClientError> {
        parse(self.request(Method::POST, "/rsvp").json(answers).send().await?).await
    }

    pub async fn wishes(&self, page: u32, limit: u32) -> Result<WishPage, ClientError> {
        let resp = self
            .request(Method::GET, "/wishes")
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn post_wish(&self, message: &str) -> Result<Wish, ClientError> {
        let resp = self
            .request(Method::POST, "/wishes")
            .json(&SubmitWishRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        parse(resp).await
    }

    /// Server-derived reaction strip for one wish, as seen by `session_id`.
    pub async fn reactions(&self, wish_id: Uuid, session_id: &str) -> Result<ReactionsView, ClientError> {
        let resp = self
            .request(Method::GET, &format!("/wishes/{}/reactions", wish_id))
            .query(&[("session_id", session_id)])
            .send()
            .await?;
        parse(resp).await
    }

    /// Adds a sticker. A 409 means this session already used it on this wish.
    pub async fn react(
        &self,
        wish_id: Uuid,
        sticker: &str,
        session_id: &str,
        reactor_name: Option<&str>,
    ) -> Result<ReactionsView, ClientError> {
        let resp = self
            .request(Method::POST, &format!("/wishes/{}/reactions", wish_id))
            .json(&AddReactionRequest {
                sticker: sticker.to_string(),
                session_id: session_id.to_string(),
                reactor_name: reactor_name.map(str::to_string),
            })
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn participants(&self) -> Result<Vec<Participant>, ClientError> {
        parse(self.request(Method::GET, "/admin/participants").send().await?).await
    }

    pub async fn save_participant(&self, input: &ParticipantUpsert) -> Result<Participant, ClientError> {
        parse(self.request(Method::POST, "/admin/participants").json(input).send().await?).await
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse, ClientError> {
        parse(self.request(Method::GET, "/admin/dashboard").send().await?).await
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        debug!(status = status.as_u16(), "Request rejected: {}", body);
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
