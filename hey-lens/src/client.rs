use crate::documents::{
    HIDE_MANAGED_PROFILE, HIDE_MANAGED_PROFILE_OPERATION, PROFILES_MANAGED_OPERATION,
    UNHIDE_MANAGED_PROFILE, UNHIDE_MANAGED_PROFILE_OPERATION, profiles_managed_document,
};
use crate::errors::{GraphQlError, LensError};
use crate::types::{
    HideManagedProfileRequest, ProfilesManagedData, ProfilesManagedVariables, RequestVariables,
    UnhideManagedProfileRequest,
};
use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api-v2.lens.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Listing side of the managed-profile API.
#[async_trait]
pub trait ProfilesManagedApi: Send + Sync {
    async fn profiles_managed(
        &self,
        variables: &ProfilesManagedVariables,
    ) -> Result<ProfilesManagedData, LensError>;
}

/// Hide/unhide side of the managed-profile API.
#[async_trait]
pub trait ManagedProfileMutations: Send + Sync {
    async fn hide_managed_profile(
        &self,
        request: &HideManagedProfileRequest,
    ) -> Result<(), LensError>;

    async fn unhide_managed_profile(
        &self,
        request: &UnhideManagedProfileRequest,
    ) -> Result<(), LensError>;
}

#[derive(Clone, Debug, Default)]
pub struct LensClientOpts {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'a str,
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Clone, Debug)]
pub struct LensClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl LensClient {
    pub fn new(opts: LensClientOpts) -> Result<Self, LensError> {
        let endpoint = Url::parse(opts.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = opts.access_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| LensError::InvalidAccessToken)?;
            value.set_sensitive(true);
            headers.insert(ACCESS_TOKEN_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(opts.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn execute<V: Serialize + Sync, D: DeserializeOwned>(
        &self,
        operation_name: &'static str,
        query: &str,
        variables: &V,
    ) -> Result<D, LensError> {
        tracing::debug!("POST {} operation={}", self.endpoint, operation_name);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GraphQlRequest {
                operation_name,
                query,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(LensError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GraphQlResponse<D> = response.json().await?;
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            tracing::debug!(
                "{} failed with {} GraphQL error(s)",
                operation_name,
                errors.len()
            );
            return Err(LensError::GraphQl(errors));
        }

        response.data.ok_or(LensError::MissingData(operation_name))
    }
}

#[async_trait]
impl ProfilesManagedApi for LensClient {
    async fn profiles_managed(
        &self,
        variables: &ProfilesManagedVariables,
    ) -> Result<ProfilesManagedData, LensError> {
        let document = profiles_managed_document();
        self.execute(PROFILES_MANAGED_OPERATION, &document, variables)
            .await
    }
}

#[async_trait]
impl ManagedProfileMutations for LensClient {
    async fn hide_managed_profile(
        &self,
        request: &HideManagedProfileRequest,
    ) -> Result<(), LensError> {
        let _: Value = self
            .execute(
                HIDE_MANAGED_PROFILE_OPERATION,
                HIDE_MANAGED_PROFILE,
                &RequestVariables { request },
            )
            .await?;
        Ok(())
    }

    async fn unhide_managed_profile(
        &self,
        request: &UnhideManagedProfileRequest,
    ) -> Result<(), LensError> {
        let _: Value = self
            .execute(
                UNHIDE_MANAGED_PROFILE_OPERATION,
                UNHIDE_MANAGED_PROFILE,
                &RequestVariables { request },
            )
            .await?;
        Ok(())
    }
}
