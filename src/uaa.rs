//! Client for the UAA identity API.

use std::sync::Arc;

use reqwest::{
    header::{self, HeaderValue},
    Method,
};

use crate::{
    wire::{NewUaaUserRequest, NewUaaUserResponse, UaaEmail, UaaUserName},
    ApiClient, ApiKind, ClientOptions, Connection, Error, RequestOptions, Result, Route, UaaUser,
};

pub const NEW_USER_REQUEST: &str = "NewUser";

/// Routes served by UAA.
pub static ROUTES: &[Route] = &[Route::new(NEW_USER_REQUEST, Method::POST, "/Users")];

/// UAA client whose errors are classified against the UAA error schema.
#[derive(Clone, Debug)]
pub struct UaaClient {
    inner: ApiClient,
}

impl UaaClient {
    pub fn new(uaa_url: impl AsRef<str>, token: impl AsRef<str>, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            inner: ApiClient::new(ApiKind::Uaa, uaa_url, ROUTES, token, options)?,
        })
    }

    /// Uses `connection` instead of the default chain.
    pub fn with_connection(
        uaa_url: impl AsRef<str>,
        token: impl AsRef<str>,
        options: &ClientOptions,
        connection: Arc<dyn Connection>,
    ) -> Result<Self> {
        Ok(Self {
            inner: ApiClient::with_connection(uaa_url, ROUTES, token, options, connection)?,
        })
    }

    /// Creates a UAA user account with the given password.
    ///
    /// A 409 for an existing user surfaces as [`Error::Api`].
    pub async fn new_user(&self, username: &str, password: &str) -> Result<UaaUser> {
        let payload = NewUaaUserRequest {
            user_name: username.to_owned(),
            password: password.to_owned(),
            name: UaaUserName {
                family_name: username.to_owned(),
                given_name: username.to_owned(),
            },
            emails: vec![UaaEmail {
                value: username.to_owned(),
                primary: false,
            }],
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|err| Error::Encode(format!("user request: {err}")))?;

        let options = RequestOptions::new(NEW_USER_REQUEST)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body);
        let (response, _) = self.inner.make::<NewUaaUserResponse>(options).await?;

        Ok(UaaUser { id: response.id })
    }
}
