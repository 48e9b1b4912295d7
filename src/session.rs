//! Session establishment: build the transport, then log in exactly once.

use crate::credentials::Principal;
use crate::error::ApiError;
use crate::policy::{self, CallSite};
use crate::provider::{ClientSettings, PveClient, SessionProvider};
use tracing::{debug, info, warn};

/// Build a client for `settings`. Disabling certificate validation is logged
/// at warn level every time.
pub fn connect(settings: &ClientSettings) -> Result<PveClient, ApiError> {
    if settings.skip_tls_verify {
        warn!(
            server = %settings.server_url,
            "TLS certificate verification is disabled; the server identity is not checked"
        );
    }
    debug!(
        server = %settings.server_url,
        timeout_secs = settings.timeout.as_secs(),
        skip_tls_verify = settings.skip_tls_verify,
        "Creating API client"
    );
    PveClient::new(settings)
}

/// Log in on `provider`. Any failure is fatal; there is no retry.
pub async fn establish<P>(
    provider: &mut P,
    principal: &Principal,
    password: &str,
    otp: &str,
) -> Result<(), ApiError>
where
    P: SessionProvider + ?Sized,
{
    debug!(
        principal = %principal,
        password = "<redacted>",
        otp_supplied = !otp.is_empty(),
        "Logging in"
    );
    policy::require(
        CallSite::Login,
        provider.login(principal.as_str(), password, otp).await,
    )?;
    info!(principal = %principal, "Session established");
    Ok(())
}
