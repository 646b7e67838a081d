use crate::request::ApiRequest;
use crate::weather_data::error::{FetchStage, WeatherDataError};
use log::{debug, info};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Body of the pointer response. Only `datos` is needed to continue, the rest is
/// kept for diagnostics.
#[derive(Debug, Deserialize)]
struct DataPointer {
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    estado: Option<u16>,
    /// Anything but a non-empty string counts as missing.
    #[serde(default)]
    datos: Option<Value>,
    #[serde(default)]
    metadatos: Option<String>,
}

impl DataPointer {
    fn into_data_url(self) -> Result<String, WeatherDataError> {
        match self.datos {
            Some(Value::String(url)) if !url.is_empty() => Ok(url),
            _ => Err(WeatherDataError::MissingDataUrl {
                estado: self.estado,
                descripcion: self.descripcion,
            }),
        }
    }
}

enum FetchState {
    AwaitingPointer,
    AwaitingData { data_url: String },
    Done(Value),
}

pub(crate) struct ObservationFetcher {
    client: Client,
}

impl ObservationFetcher {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Runs the pointer request, then downloads the resource it points to and
    /// returns its JSON body. No stage is retried.
    pub(crate) async fn fetch(&self, request: &ApiRequest) -> Result<Value, WeatherDataError> {
        let mut state = FetchState::AwaitingPointer;
        loop {
            state = match state {
                FetchState::AwaitingPointer => FetchState::AwaitingData {
                    data_url: self.fetch_pointer(request).await?,
                },
                FetchState::AwaitingData { data_url } => {
                    FetchState::Done(self.fetch_records(&data_url).await?)
                }
                FetchState::Done(records) => return Ok(records),
            };
        }
    }

    async fn fetch_pointer(&self, request: &ApiRequest) -> Result<String, WeatherDataError> {
        let url = request.url.as_str();
        let (status, body) = self.get(FetchStage::Pointer, url, Some(request)).await?;

        match status {
            StatusCode::UNAUTHORIZED => {
                return Err(WeatherDataError::Unauthorized {
                    url: url.to_string(),
                })
            }
            StatusCode::NOT_FOUND => {
                return Err(WeatherDataError::NotFound {
                    url: url.to_string(),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(WeatherDataError::RateLimited {
                    url: url.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(WeatherDataError::HttpStatus {
                    stage: FetchStage::Pointer,
                    url: url.to_string(),
                    status,
                })
            }
            _ => {}
        }

        let pointer: DataPointer =
            serde_json::from_str(&body).map_err(|e| WeatherDataError::InvalidJson {
                stage: FetchStage::Pointer,
                url: url.to_string(),
                source: e,
            })?;
        if let Some(metadata_url) = &pointer.metadatos {
            debug!("Metadata URL: {}", metadata_url);
        }
        let data_url = pointer.into_data_url()?;
        info!("Data available at {}", data_url);
        Ok(data_url)
    }

    async fn fetch_records(&self, data_url: &str) -> Result<Value, WeatherDataError> {
        let (status, body) = self.get(FetchStage::Data, data_url, None).await?;
        if !status.is_success() {
            return Err(WeatherDataError::HttpStatus {
                stage: FetchStage::Data,
                url: data_url.to_string(),
                status,
            });
        }
        serde_json::from_str(&body).map_err(|e| WeatherDataError::InvalidJson {
            stage: FetchStage::Data,
            url: data_url.to_string(),
            source: e,
        })
    }

    /// Sends one GET and reads the whole body as text, honoring the response charset.
    async fn get(
        &self,
        stage: FetchStage,
        url: &str,
        auth: Option<&ApiRequest>,
    ) -> Result<(StatusCode, String), WeatherDataError> {
        debug!("Request URL: {}", url);
        let mut builder = self.client.get(url);
        match auth {
            Some(request) => {
                debug!(
                    "Request Headers: {{\"Authorization\": \"{}\"}}",
                    request.redacted_authorization()
                );
                builder = builder.header(AUTHORIZATION, request.authorization.as_str());
            }
            None => debug!("Request Headers: {{}}"),
        }

        let network_error = |e: reqwest::Error| WeatherDataError::NetworkRequest {
            stage,
            url: url.to_string(),
            source: e,
        };
        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        debug!("Response Status Code: {}", status);
        debug!("Response Headers: {:?}", response.headers());

        let body = response.text().await.map_err(network_error)?;
        debug!("Response Content: {}", body);
        Ok((status, body))
    }
}
