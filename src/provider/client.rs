//! Proxmox VE HTTP client: ticket-based login and the read-only listing calls
//! the inventory needs.

use crate::error::ApiError;
use crate::provider::{resolve_vm_ref, SessionProvider};
use crate::resource::{GuestKind, ResourceRecord, VmRef};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Per-call time budget handed to the transport.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_SERVER_URL: &str = "https://localhost:8006/api2/json";

const AUTH_COOKIE: &str = "PVEAuthCookie";
const CSRF_HEADER: &str = "CSRFPreventionToken";

/// Transport settings for one client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://pve:8006/api2/json`
    pub server_url: String,
    /// Disable certificate chain validation. Unsafe; opt-in only.
    pub skip_tls_verify: bool,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            skip_tls_verify: false,
            timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }
}

/// Authenticated ticket returned by `/access/ticket`.
#[derive(Debug, Clone)]
struct Ticket {
    ticket: String,
    username: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct TicketData {
    ticket: String,
    #[serde(rename = "CSRFPreventionToken", default)]
    csrf_token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(rename = "NeedTFA", default)]
    need_tfa: Option<Value>,
}

impl TicketData {
    fn needs_tfa(&self) -> bool {
        match &self.need_tfa {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0) != 0,
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct AgentInterfaces {
    #[serde(default)]
    result: Vec<Value>,
}

/// Second-factor answer in `<type>:<value>` form; a bare code is taken as TOTP.
fn tfa_answer(otp: &str) -> String {
    if otp.contains(':') {
        otp.to_string()
    } else {
        format!("totp:{}", otp)
    }
}

fn map_http_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::RequestFailed(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ApiError::InvalidResponse(format!("Failed to decode response: {}", error))
    } else {
        ApiError::RequestFailed(format!("HTTP error: {}", error))
    }
}

/// Proxmox VE API client.
pub struct PveClient {
    client: Client,
    base_url: String,
    ticket: Option<Ticket>,
}

impl PveClient {
    /// Build the transport. Does not contact the server.
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(settings.skip_tls_verify)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.server_url.trim_end_matches('/').to_string(),
            ticket: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.ticket.is_some()
    }

    /// Principal the server issued the ticket for.
    pub fn session_user(&self) -> Option<&str> {
        self.ticket.as_ref().map(|t| t.username.as_str())
    }

    fn require_ticket(&self) -> Result<&Ticket, ApiError> {
        self.ticket.as_ref().ok_or(ApiError::NotAuthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a form, optionally authenticated by a (partial) ticket.
    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        ticket: Option<&TicketData>,
    ) -> Result<Response, ApiError> {
        debug!(path, "POST");
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(ticket) = ticket {
            request = request.header("Cookie", format!("{}={}", AUTH_COOKIE, ticket.ticket));
            if let Some(csrf) = &ticket.csrf_token {
                request = request.header(CSRF_HEADER, csrf);
            }
        }
        request.send().await.map_err(map_http_error)
    }

    async fn request_ticket(&self, form: &[(&str, &str)]) -> Result<TicketData, ApiError> {
        let response = self.post_form("/access/ticket", form, None).await?;
        let response = check_status(response, true).await?;
        parse_data(response).await
    }

    /// Answer a second-factor challenge.
    ///
    /// Proxmox VE 7 and later take the answer as a second `/access/ticket`
    /// call carrying `tfa-challenge`. Older servers reject that parameter with
    /// 400 and expect `/access/tfa` instead.
    async fn complete_tfa(
        &self,
        principal: &str,
        partial: &TicketData,
        otp: &str,
    ) -> Result<TicketData, ApiError> {
        let answer = tfa_answer(otp);
        let form = [
            ("username", principal),
            ("tfa-challenge", partial.ticket.as_str()),
            ("password", answer.as_str()),
        ];
        let response = self.post_form("/access/ticket", &form, None).await?;
        if response.status().as_u16() == 400 {
            debug!("server does not take tfa-challenge; using /access/tfa");
            let response = self
                .post_form("/access/tfa", &[("response", otp)], Some(partial))
                .await?;
            let response = check_status(response, true).await?;
            return parse_data(response).await;
        }
        let response = check_status(response, true).await?;
        parse_data(response).await
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let ticket = self.require_ticket()?;
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .header("Cookie", format!("{}={}", AUTH_COOKIE, ticket.ticket))
            .query(query)
            .send()
            .await
            .map_err(map_http_error)?;
        let response = check_status(response, false).await?;
        parse_data(response).await
    }

    async fn get_records(
        &self,
        path: &str,
        query: &[(&str, &str)],
        category: &str,
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        let items: Vec<Value> = self.get_data(path, query).await?;
        items
            .into_iter()
            .map(|item| ResourceRecord::from_value(item, category))
            .collect()
    }
}

async fn check_status(response: Response, during_login: bool) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let reason = status.canonical_reason().unwrap_or("");
    let detail = format!("{} {} {}", status.as_u16(), reason, body.trim());
    Err(match status.as_u16() {
        401 | 403 if during_login => {
            ApiError::AuthenticationFailed(detail.trim_end().to_string())
        }
        _ => ApiError::RequestFailed(detail.trim_end().to_string()),
    })
}

async fn parse_data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    Ok(envelope.data)
}

#[async_trait]
impl SessionProvider for PveClient {
    async fn login(&mut self, principal: &str, password: &str, otp: &str) -> Result<(), ApiError> {
        let mut form = vec![("username", principal), ("password", password)];
        if !otp.is_empty() {
            form.push(("otp", otp));
        }

        let mut data = self.request_ticket(&form).await?;
        if data.needs_tfa() {
            if otp.is_empty() {
                return Err(ApiError::AuthenticationFailed(
                    "second factor required but no OTP supplied".to_string(),
                ));
            }
            debug!("server requested second factor");
            data = self.complete_tfa(principal, &data, otp).await?;
        }

        self.ticket = Some(Ticket {
            username: data.username.unwrap_or_else(|| principal.to_string()),
            ticket: data.ticket,
        });
        Ok(())
    }

    async fn node_list(&self) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get_records("/nodes", &[], "node").await
    }

    async fn list_storages(&self, node: &str) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get_records(&format!("/nodes/{}/storage", node), &[], "storage")
            .await
    }

    async fn vm_list(&self) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get_records("/cluster/resources", &[("type", "vm")], "vm")
            .await
    }

    async fn vm_ref_by_name(&self, name: &str) -> Result<VmRef, ApiError> {
        let vms = self.vm_list().await?;
        resolve_vm_ref(&vms, name)
    }

    async fn vm_config(&self, vm_ref: &VmRef) -> Result<ResourceRecord, ApiError> {
        let data: Value = self
            .get_data(&format!("{}/config", vm_ref.api_path()), &[])
            .await?;
        ResourceRecord::from_value(data, "vm config")
    }

    async fn vm_agent_network_interfaces(
        &self,
        vm_ref: &VmRef,
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        if vm_ref.kind != GuestKind::Qemu {
            return Err(ApiError::PartialDataUnavailable(format!(
                "guest agent is only available for QEMU guests ({})",
                vm_ref
            )));
        }
        let data: AgentInterfaces = self
            .get_data(
                &format!("{}/agent/network-get-interfaces", vm_ref.api_path()),
                &[],
            )
            .await?;
        data.result
            .into_iter()
            .map(|item| ResourceRecord::from_value(item, "network interface"))
            .collect()
    }
}
