//! HTTP server for the tweak panel.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use jovian_shading::params::COLOR_SCHEME_KEY;
use jovian_shading::{ColorScheme, ControlDescriptor, ParamId};
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use crate::page::{control_list, render_page};
use crate::{CommandSender, PanelCommand, SharedSnapshot};

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("failed to bind panel to {address}: {error}")]
    Bind { address: String, error: String },
}

/// Serves the panel page and JSON API on a background thread.
pub struct PanelServer {
    address: String,
    port: u16,
    actual_port: Option<u16>,
    server: Option<Arc<Server>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Deserialize)]
struct SetParamRequest {
    param: String,
    value: f32,
}

#[derive(Deserialize)]
struct SetSchemeRequest {
    scheme: String,
}

#[derive(Deserialize)]
struct CommandRequest {
    command: String,
}

#[derive(Serialize)]
struct QueuedResponse {
    queued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f32>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: f64,
}

type HttpResponse = Response<Cursor<Vec<u8>>>;

impl PanelServer {
    /// `port` 0 lets the OS pick; see [`actual_port`](Self::actual_port).
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            actual_port: None,
            server: None,
            handle: None,
        }
    }

    pub fn start(
        &mut self,
        snapshot: SharedSnapshot,
        commands: CommandSender,
    ) -> Result<(), PanelError> {
        let address = format!("{}:{}", self.address, self.port);
        let server = Arc::new(Server::http(&address).map_err(|e| PanelError::Bind {
            address: address.clone(),
            error: e.to_string(),
        })?);

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let worker = Arc::clone(&server);
        let handle = thread::Builder::new()
            .name("jovian-panel".into())
            .spawn(move || run_server(&worker, snapshot, commands))
            .map_err(|e| PanelError::Bind {
                address,
                error: e.to_string(),
            })?;
        self.server = Some(server);
        self.handle = Some(handle);

        info!("Tweak panel listening on http://{}:{}/", self.address, actual_port);
        Ok(())
    }

    /// Unblock the accept loop and join the server thread.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.unblock();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Panel server thread panicked");
            }
        }
    }

    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PanelServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_server(server: &Server, snapshot: SharedSnapshot, commands: CommandSender) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &snapshot, &commands) {
            warn!("Panel request failed: {e}");
        }
    }
}

fn handle_request(
    mut request: Request,
    snapshot: &SharedSnapshot,
    commands: &CommandSender,
) -> std::io::Result<()> {
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    let method = request.method().clone();
    debug!(%method, %path, "Panel request");

    let response = match (&method, path.as_str()) {
        (Method::Get, "/") => with_content_type(
            Response::from_string(render_page()),
            "text/html; charset=utf-8",
        ),
        (Method::Get, "/controls") => json_response(200, &control_list()),
        (Method::Get, "/params") => {
            let snap = snapshot.lock().unwrap_or_else(|p| p.into_inner()).clone();
            json_response(200, &snap)
        }
        (Method::Get, "/health") => {
            let uptime_seconds = snapshot
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .timing
                .uptime_seconds;
            json_response(
                200,
                &HealthResponse {
                    status: "ok",
                    uptime_seconds,
                },
            )
        }
        (Method::Post, "/params") => match read_json::<SetParamRequest>(&mut request) {
            Ok(body) => set_param(body, commands),
            Err(response) => response,
        },
        (Method::Post, "/scheme") => match read_json::<SetSchemeRequest>(&mut request) {
            Ok(body) => match ColorScheme::from_label(&body.scheme) {
                Ok(scheme) => queue(commands, PanelCommand::SetScheme(scheme), None, None),
                Err(e) => error_response(400, e.to_string()),
            },
            Err(response) => response,
        },
        (Method::Post, "/randomize") => queue(commands, PanelCommand::Randomize, None, None),
        (Method::Post, "/command") => match read_json::<CommandRequest>(&mut request) {
            Ok(body) => match body.command.as_str() {
                "quit" => queue(commands, PanelCommand::Quit, None, None),
                "randomize" => queue(commands, PanelCommand::Randomize, None, None),
                "next_scheme" => queue(commands, PanelCommand::NextScheme, None, None),
                other => error_response(400, format!("unknown command '{other}'")),
            },
            Err(response) => response,
        },
        _ => error_response(404, format!("no route for {method} {path}")),
    };

    request.respond(response)
}

fn set_param(body: SetParamRequest, commands: &CommandSender) -> HttpResponse {
    // Numbers past the f32 range deserialize to infinity.
    if !body.value.is_finite() {
        return error_response(400, format!("value for '{}' is not finite", body.param));
    }
    if body.param == COLOR_SCHEME_KEY {
        let scheme = (body.value.fract() == 0.0)
            .then(|| ColorScheme::from_value(body.value as i32))
            .flatten();
        return match scheme {
            Some(scheme) => queue(
                commands,
                PanelCommand::SetScheme(scheme),
                Some(body.param),
                Some(scheme.value() as f32),
            ),
            None => error_response(400, format!("invalid color scheme value {}", body.value)),
        };
    }

    let Some(param) = ParamId::from_key(&body.param) else {
        return error_response(400, format!("unknown parameter '{}'", body.param));
    };
    let value = ControlDescriptor::for_param(param).clamp(body.value);
    queue(
        commands,
        PanelCommand::SetParam {
            param,
            value: body.value,
        },
        Some(body.param),
        Some(value),
    )
}

fn queue(
    commands: &CommandSender,
    command: PanelCommand,
    param: Option<String>,
    value: Option<f32>,
) -> HttpResponse {
    match commands.send(command) {
        Ok(()) => json_response(
            200,
            &QueuedResponse {
                queued: true,
                param,
                value,
            },
        ),
        Err(_) => error_response(503, "renderer is not accepting commands".to_string()),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(request: &mut Request) -> Result<T, HttpResponse> {
    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| error_response(400, format!("unreadable body: {e}")))?;
    serde_json::from_str(&body).map_err(|e| error_response(400, format!("invalid JSON: {e}")))
}

fn json_response<T: Serialize>(status: u16, value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => with_content_type(
            Response::from_string(json).with_status_code(status),
            "application/json",
        ),
        Err(e) => Response::from_string(e.to_string()).with_status_code(500),
    }
}

fn error_response(status: u16, error: String) -> HttpResponse {
    json_response(status, &ErrorResponse { error })
}

fn with_content_type(response: HttpResponse, content_type: &str) -> HttpResponse {
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
