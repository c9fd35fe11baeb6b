pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{NewScheduleRequest, UpdateScheduleRequest};

/// Backend endpoints the schedule view depends on. Fetches hand back raw
/// records with the response wrapper already removed.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_schedules(&self) -> Result<Vec<Value>, AppError>;
    async fn fetch_schedule(&self, id: &str) -> Result<Option<Value>, AppError>;
    async fn create_schedule(&self, req: &NewScheduleRequest) -> Result<(), AppError>;
    async fn update_schedule(&self, id: &str, req: &UpdateScheduleRequest) -> Result<(), AppError>;
    async fn delete_schedule(&self, id: &str) -> Result<(), AppError>;
}

pub struct HttpScheduleApi {
    client: Client,
    config: ApiConfig,
}

impl HttpScheduleApi {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn read_envelope(response: Response) -> Result<dto::Envelope, AppError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Api {
                status,
                message: dto::ErrorBody::parse(&body),
            });
        }

        serde_json::from_str::<dto::Envelope>(&body)
            .map_err(|e| AppError::Decode(format!("Failed to parse schedule response: {}", e)))
    }

    /// 200/201/204 count as success unless the body says `success: false`.
    /// Any other status needs an explicit `success: true` body.
    async fn read_mutation(response: Response) -> Result<(), AppError> {
        let status = response.status();
        let body = response.text().await?;
        let reply = serde_json::from_str::<dto::MutationReply>(&body).ok();

        let accepted_status = matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
        );

        match reply {
            Some(dto::MutationReply { success: true, .. }) if status.is_success() => Ok(()),
            Some(dto::MutationReply { success: false, message }) => Err(AppError::Api {
                status,
                message: message.or_else(|| dto::ErrorBody::parse(&body)),
            }),
            _ if accepted_status => Ok(()),
            _ => Err(AppError::Api {
                status,
                message: dto::ErrorBody::parse(&body),
            }),
        }
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn fetch_schedules(&self) -> Result<Vec<Value>, AppError> {
        let url = self.config.schedules_url();
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let records = Self::read_envelope(response).await?.into_records()?;

        info!("Fetched {} schedule records", records.len());
        Ok(records)
    }

    async fn fetch_schedule(&self, id: &str) -> Result<Option<Value>, AppError> {
        let url = self.config.schedule_url(id);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_envelope(response).await?.into_single()
    }

    async fn create_schedule(&self, req: &NewScheduleRequest) -> Result<(), AppError> {
        let url = self.config.schedules_url();
        debug!("POST {}", url);

        let response = self
            .authorize(self.client.post(&url))
            .json(req)
            .send()
            .await?;
        Self::read_mutation(response).await
    }

    async fn update_schedule(&self, id: &str, req: &UpdateScheduleRequest) -> Result<(), AppError> {
        let url = self.config.schedule_url(id);
        debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(&url))
            .json(req)
            .send()
            .await?;
        Self::read_mutation(response).await
    }

    async fn delete_schedule(&self, id: &str) -> Result<(), AppError> {
        let url = self.config.schedule_url(id);
        debug!("DELETE {}", url);

        let response = self.authorize(self.client.delete(&url)).send().await?;
        Self::read_mutation(response).await
    }
}

pub struct NoopScheduleApi;

#[async_trait]
impl ScheduleApi for NoopScheduleApi {
    async fn fetch_schedules(&self) -> Result<Vec<Value>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_schedule(&self, _id: &str) -> Result<Option<Value>, AppError> {
        Ok(None)
    }

    async fn create_schedule(&self, _req: &NewScheduleRequest) -> Result<(), AppError> {
        Ok(())
    }

    async fn update_schedule(&self, _id: &str, _req: &UpdateScheduleRequest) -> Result<(), AppError> {
        Ok(())
    }

    async fn delete_schedule(&self, _id: &str) -> Result<(), AppError> {
        Ok(())
    }
}
