use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::config::DataServiceConfig;

use super::error::DataServiceError;
use super::models::{Credentials, NewNote, Note, NoteChanges, Session, User};
use super::repository::{IdentityProvider, NotesRepository};

const NOTES_TABLE: &str = "rest/v1/notes";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// HTTP client for the hosted data service.
///
/// Constructed once at startup and shared through `AppState`; it holds only
/// the public project URL and anonymous key; user tokens are passed per call.
#[derive(Clone)]
pub struct DataService {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl DataService {
    pub fn new(config: &DataServiceConfig) -> Result<Self, DataServiceError> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &DataServiceConfig, http: reqwest::Client) -> Result<Self, DataServiceError> {
        let mut base_url = Url::parse(&config.url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DataServiceError> {
        Ok(self.base_url.join(path)?)
    }

    fn note_url(&self, id: Uuid) -> Result<Url, DataServiceError> {
        let mut url = self.endpoint(NOTES_TABLE)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        Ok(url)
    }

    fn token_url(&self, grant_type: &str) -> Result<Url, DataServiceError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    /// Every call carries the anon key; `bearer` is the user's access token,
    /// or the anon key itself for calls made before a session exists.
    fn request(&self, method: Method, url: Url, bearer: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Row writes that must echo back exactly one row
    fn single_row(&self, method: Method, url: Url, access_token: &str) -> RequestBuilder {
        self.request(method, url, access_token)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DataServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DataServiceError::from_response(status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| DataServiceError::Decode(e.to_string()))
}

async fn expect_success(response: Response) -> Result<(), DataServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DataServiceError::from_response(status, &body))
}

#[async_trait]
impl NotesRepository for DataService {
    async fn list_notes(&self, access_token: &str) -> Result<Vec<Note>, DataServiceError> {
        let mut url = self.endpoint(NOTES_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url, access_token).send().await?;
        read_json(response).await
    }

    async fn create_note(&self, access_token: &str, note: &NewNote) -> Result<Note, DataServiceError> {
        let url = self.endpoint(NOTES_TABLE)?;
        let response = self
            .single_row(Method::POST, url, access_token)
            .json(note)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_note(
        &self,
        access_token: &str,
        id: Uuid,
        changes: &NoteChanges,
    ) -> Result<Note, DataServiceError> {
        let url = self.note_url(id)?;
        let response = self
            .single_row(Method::PATCH, url, access_token)
            .json(changes)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_note(&self, access_token: &str, id: Uuid) -> Result<(), DataServiceError> {
        let url = self.note_url(id)?;
        let response = self.request(Method::DELETE, url, access_token).send().await?;
        expect_success(response).await
    }
}

#[async_trait]
impl IdentityProvider for DataService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), DataServiceError> {
        let url = self.endpoint("auth/v1/signup")?;
        let response = self
            .request(Method::POST, url, &self.anon_key)
            .json(credentials)
            .send()
            .await?;
        expect_success(response).await
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, DataServiceError> {
        let url = self.token_url("password")?;
        let response = self
            .request(Method::POST, url, &self.anon_key)
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, DataServiceError> {
        let url = self.token_url("refresh_token")?;
        let response = self
            .request(Method::POST, url, &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_user(&self, access_token: &str) -> Result<User, DataServiceError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self.request(Method::GET, url, access_token).send().await?;
        read_json(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), DataServiceError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self.request(Method::POST, url, access_token).send().await?;
        expect_success(response).await
    }
}
