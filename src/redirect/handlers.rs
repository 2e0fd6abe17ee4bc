use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::analytics::{classify, extract_client_ip, visitor_hash, GeoIpService};
use crate::models::Click;
use crate::storage::Storage;

pub struct RedirectState {
    pub storage: Arc<dyn Storage>,
    pub geoip: Arc<GeoIpService>,
    pub visitor_salt: String,
}

/// Resolve a short code and redirect to the original URL.
///
/// The 302 is returned before the click record is durable: recording is
/// scheduled as a fire-and-forget task so storage latency never couples
/// to redirect latency. Unknown and deactivated codes both answer with a
/// plain 404 and record nothing.
pub async fn redirect_to_target(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let link = match state.storage.find_active_by_code(&code).await {
        Ok(Some(link)) => link,
        Ok(None) => return (StatusCode::NOT_FOUND, "link not found").into_response(),
        Err(err) => {
            tracing::error!(short_code = %code, error = %err, "redirect lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response();
        }
    };

    schedule_click(&state, link.id, &headers, addr.ip());

    (StatusCode::FOUND, [(header::LOCATION, link.original_url)]).into_response()
}

/// Spawn the click write. Classification and GeoIP lookup run inside the
/// task, off the redirect path; a failed write is logged and swallowed.
fn schedule_click(
    state: &Arc<RedirectState>,
    link_id: String,
    headers: &HeaderMap,
    socket_ip: IpAddr,
) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let client_ip = extract_client_ip(headers, socket_ip);
    let clicked_at = Utc::now().timestamp();
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let ua = classify(&user_agent);
        let geo = state.geoip.lookup(client_ip);

        let click = Click {
            link_id,
            visitor_hash: visitor_hash(&client_ip.to_string(), &state.visitor_salt),
            country: geo.country,
            city: geo.city,
            region: geo.region,
            device_type: ua.device_type,
            browser: ua.browser,
            os: ua.os,
            user_agent,
            referer,
            clicked_at,
        };

        if let Err(err) = state.storage.append_click(&click).await {
            tracing::warn!(link_id = %click.link_id, error = %err, "dropped click record");
        }
    });
}
