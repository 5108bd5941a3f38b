use crate::config::AppConfig;
use crate::models::feedback::FeedbackSync;
use crate::remote::{ApiClient, ApiError};

/// Process-wide application state handed to every handler through
/// `web::Data`.
pub struct AppState {
    pub app_name: String,
    pub client: ApiClient,
    pub feedback: FeedbackSync<ApiClient>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.remote)?;
        Ok(Self::with_client(&config.app_name, client))
    }

    pub fn with_client(app_name: &str, client: ApiClient) -> Self {
        Self {
            app_name: app_name.to_string(),
            feedback: FeedbackSync::new(client.clone()),
            client,
        }
    }
}
