//! Client for the Cloud Controller v2 API.

use std::sync::Arc;

use reqwest::Method;

use crate::{
    wire::{CcResource, NewCcUserRequest},
    ApiClient, ApiKind, ClientOptions, Connection, CcUser, Error, RequestOptions, Result, Route,
    Warnings,
};

pub const NEW_USER_REQUEST: &str = "NewUser";

/// Routes served by Cloud Controller.
pub static ROUTES: &[Route] = &[Route::new(NEW_USER_REQUEST, Method::POST, "/v2/users")];

/// Cloud Controller client whose errors are classified against the
/// Cloud Controller error schema.
#[derive(Clone, Debug)]
pub struct CloudControllerClient {
    inner: ApiClient,
}

impl CloudControllerClient {
    pub fn new(api_url: impl AsRef<str>, token: impl AsRef<str>, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            inner: ApiClient::new(ApiKind::CloudController, api_url, ROUTES, token, options)?,
        })
    }

    /// Uses `connection` instead of the default chain.
    pub fn with_connection(
        api_url: impl AsRef<str>,
        token: impl AsRef<str>,
        options: &ClientOptions,
        connection: Arc<dyn Connection>,
    ) -> Result<Self> {
        Ok(Self {
            inner: ApiClient::with_connection(api_url, ROUTES, token, options, connection)?,
        })
    }

    /// Registers a UAA user id with Cloud Controller.
    pub async fn new_user(&self, uaa_user_id: &str) -> Result<(CcUser, Warnings)> {
        let body = serde_json::to_vec(&NewCcUserRequest {
            guid: uaa_user_id.to_owned(),
        })
        .map_err(|err| Error::Encode(format!("user request: {err}")))?;

        let (resource, warnings) = self
            .inner
            .make::<CcResource>(RequestOptions::new(NEW_USER_REQUEST).body(body))
            .await?;

        Ok((
            CcUser {
                guid: resource.metadata.guid,
            },
            warnings,
        ))
    }
}
