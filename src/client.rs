//! HTTP client for the clinic REST API

use agenda_core::date_range::DateRange;
use agenda_core::{
    AgendaApi, AgendaError, AgendaResult, CalendarEvent, ConsultationUpdate, NewConsultation,
    PatientOption, PatientRecord, UpcomingConsultation,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// HTTP client for the clinic backend
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(api_url: &str, token: Option<String>) -> AgendaResult<Self> {
        let parsed = Url::parse(api_url)
            .map_err(|e| AgendaError::Config(format!("api_url inválida '{}': {}", api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AgendaError::Config(format!(
                "api_url must be http(s), got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "request");
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> AgendaResult<Response> {
        let resp = builder
            .send()
            .await
            .map_err(|e| AgendaError::Http(format!("No se pudo conectar al servidor: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgendaError::Backend {
                status: status.as_u16(),
                message: error_message(status.canonical_reason().unwrap_or(""), &body),
            });
        }

        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AgendaResult<T> {
        let resp = self.send(builder).await?;
        resp.json()
            .await
            .map_err(|e| AgendaError::Serialization(e.to_string()))
    }
}

/// Extracts FastAPI's `{"detail": ...}` message, falling back to the raw body
/// and then to the status reason.
fn error_message(reason: &str, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        reason.to_string()
    } else {
        body.to_string()
    }
}

impl AgendaApi for Client {
    /// GET /dashboard/calendar
    async fn list_events(&self, range: &DateRange) -> AgendaResult<Vec<CalendarEvent>> {
        let builder = self
            .request(Method::GET, "/dashboard/calendar")
            .query(&[("start", range.start_param()), ("end", range.end_param())]);
        self.send_json(builder).await
    }

    /// POST /consultations
    async fn create_consultation(&self, consultation: &NewConsultation) -> AgendaResult<()> {
        let builder = self
            .request(Method::POST, "/consultations")
            .json(consultation);
        self.send(builder).await?;
        Ok(())
    }

    /// PUT /consultations/:id
    async fn update_consultation(&self, id: &str, update: &ConsultationUpdate) -> AgendaResult<()> {
        let builder = self
            .request(Method::PUT, &format!("/consultations/{}", id))
            .json(update);
        self.send(builder).await?;
        Ok(())
    }

    /// DELETE /consultations/:id
    async fn delete_consultation(&self, id: &str) -> AgendaResult<()> {
        let builder = self.request(Method::DELETE, &format!("/consultations/{}", id));
        self.send(builder).await?;
        Ok(())
    }

    /// GET /patients
    async fn list_patients(&self, limit: usize) -> AgendaResult<Vec<PatientOption>> {
        let builder = self
            .request(Method::GET, "/patients")
            .query(&[("limit", limit)]);
        let records: Vec<PatientRecord> = self.send_json(builder).await?;
        Ok(records.into_iter().map(PatientOption::from).collect())
    }

    /// GET /dashboard/upcoming
    async fn upcoming(&self, limit: usize) -> AgendaResult<Vec<UpcomingConsultation>> {
        let builder = self
            .request(Method::GET, "/dashboard/upcoming")
            .query(&[("limit", limit)]);
        self.send_json(builder).await
    }

    /// GET /dashboard/today
    async fn today(&self) -> AgendaResult<Vec<UpcomingConsultation>> {
        self.send_json(self.request(Method::GET, "/dashboard/today"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = Client::new("http://localhost:8000/api/v1/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/api/v1");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(Client::new("localhost:8000", None).is_err());
        assert!(Client::new("ftp://vet.example", None).is_err());
        assert!(Client::new("not a url", None).is_err());
    }

    #[test]
    fn detail_string() {
        let body = r#"{"detail": "Consultation not found"}"#;
        assert_eq!(error_message("Not Found", body), "Consultation not found");
    }

    #[test]
    fn detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "date"], "msg": "invalid datetime format"}]}"#;
        assert_eq!(error_message("Unprocessable Entity", body), "invalid datetime format");
    }

    #[test]
    fn plain_or_empty_body() {
        assert_eq!(error_message("Bad Gateway", "upstream down\n"), "upstream down");
        assert_eq!(error_message("Bad Gateway", ""), "Bad Gateway");
    }
}
