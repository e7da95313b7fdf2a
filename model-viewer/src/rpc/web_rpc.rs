use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::camera::viewport::ViewportContext;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadSequence;
use crate::engine::scene::model::LoadedModel;
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::teardown::UnmountRequest;
use crate::tools::interaction::state::ZoomState;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing queues towards the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn queued_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Filled by the browser callback, drained by the ECS.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC bridge disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Ownership passes to the JS side for the lifetime of the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message received from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Viewer state and controls reachable from the host page.
#[derive(SystemParam)]
pub struct ViewerControl<'w> {
    zoom: ResMut<'w, ZoomState>,
    diagnostics: Res<'w, DiagnosticsStore>,
    state: Res<'w, State<AppState>>,
    sequence: Res<'w, LoadSequence>,
    orbit: Res<'w, OrbitCamera>,
    model: Option<Res<'w, LoadedModel>>,
    viewport: Option<Res<'w, ViewportContext>>,
    unmount: EventWriter<'w, UnmountRequest>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut control: ViewerControl,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut control) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Executes one request. Only requests carrying an ID get a response.
pub fn handle_rpc_request(request: &RpcRequest, control: &mut ViewerControl) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_view_state" => handle_get_view_state(control),
        "toggle_zoom" => handle_toggle_zoom(control),
        "set_zoom" => handle_set_zoom(&request.params, control),
        "get_fps" => handle_get_fps(&control.diagnostics),
        "unmount" => handle_unmount(control),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_get_view_state(control: &ViewerControl) -> Result<serde_json::Value, RpcError> {
    let (surface, pixel_ratio) = control
        .viewport
        .as_ref()
        .map_or(([0.0, 0.0], 1.0), |viewport| {
            (viewport.surface_size.to_array(), viewport.scale_factor)
        });

    Ok(serde_json::json!({
        "state": control.state.get().as_str(),
        "load_stage": control.sequence.stage.as_str(),
        "model_loaded": control.model.is_some(),
        "zoomed": control.zoom.zoomed,
        "scale": control.zoom.scale(),
        "surface": surface,
        "pixel_ratio": pixel_ratio,
        "camera": {
            "distance": control.orbit.radius,
            "settled": control.orbit.is_settled(),
        },
    }))
}

fn handle_toggle_zoom(control: &mut ViewerControl) -> Result<serde_json::Value, RpcError> {
    let zoomed = control.zoom.toggle();
    Ok(serde_json::json!({ "zoomed": zoomed }))
}

fn handle_set_zoom(
    params: &serde_json::Value,
    control: &mut ViewerControl,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SetZoomParams {
        zoomed: bool,
    }

    let zoom_params = serde_json::from_value::<SetZoomParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'zoomed' parameter"))?;

    if control.zoom.zoomed != zoom_params.zoomed {
        control.zoom.zoomed = zoom_params.zoomed;
    }
    Ok(serde_json::json!({ "zoomed": zoom_params.zoomed }))
}

fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "fps": current_fps(diagnostics).unwrap_or(0.0)
    }))
}

fn handle_unmount(control: &mut ViewerControl) -> Result<serde_json::Value, RpcError> {
    if *control.state.get() == AppState::Unmounted {
        return Ok(serde_json::json!({ "success": true, "already_unmounted": true }));
    }
    control.unmount.write(UnmountRequest);
    info!("Unmount requested by host");
    Ok(serde_json::json!({ "success": true }))
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Notifications first, then responses.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn control_world() -> World {
        let mut world = World::new();
        world.init_resource::<ZoomState>();
        world.init_resource::<DiagnosticsStore>();
        world.insert_resource(State::new(AppState::Running));
        world.init_resource::<LoadSequence>();
        world.init_resource::<OrbitCamera>();
        world.init_resource::<Events<UnmountRequest>>();
        world
    }

    fn call(world: &mut World, message: &str) -> Option<RpcResponse> {
        let request: RpcRequest = serde_json::from_str(message).expect("valid request JSON");
        world
            .run_system_once(move |mut control: ViewerControl| {
                handle_rpc_request(&request, &mut control)
            })
            .expect("dispatch runs")
    }

    #[test]
    fn toggle_zoom_flips_state_and_answers() {
        let mut world = control_world();
        let response = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"toggle_zoom","params":null,"id":1}"#,
        )
        .expect("request with id gets a response");

        assert_eq!(response.result, Some(serde_json::json!({ "zoomed": true })));
        assert!(world.resource::<ZoomState>().zoomed);
    }

    #[test]
    fn set_zoom_validates_params() {
        let mut world = control_world();
        let response = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"set_zoom","params":{"zoomed":"yes"},"id":2}"#,
        )
        .expect("response");
        assert_eq!(response.error.map(|e| e.code), Some(-32602));

        call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"set_zoom","params":{"zoomed":true},"id":3}"#,
        );
        assert!(world.resource::<ZoomState>().zoomed);
    }

    #[test]
    fn unknown_method_is_reported() {
        let mut world = control_world();
        let response = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"spin","params":{},"id":"a"}"#,
        )
        .expect("response");
        assert_eq!(response.error.map(|e| e.code), Some(-32601));
    }

    #[test]
    fn unmount_without_id_still_requests_teardown() {
        let mut world = control_world();
        let response = call(&mut world, r#"{"jsonrpc":"2.0","method":"unmount"}"#);
        assert!(response.is_none());
        assert_eq!(world.resource::<Events<UnmountRequest>>().len(), 1);
    }

    #[test]
    fn view_state_reports_missing_model() {
        let mut world = control_world();
        let response = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"get_view_state","id":4}"#,
        )
        .expect("response");
        let result = response.result.expect("result");
        assert_eq!(result["state"], "running");
        assert_eq!(result["model_loaded"], false);
        assert_eq!(result["scale"], 1.0);
        assert_eq!(result["camera"]["settled"], true);
    }
}
