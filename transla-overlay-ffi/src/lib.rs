//! FFI bindings for the TranslaScreen overlay controller.
//!
//! This crate provides C ABI functions for the Android host, called through
//! JNI. The host hands over a table of callbacks that draw surfaces, probe
//! the overlay permission and show toasts; the engine drives them from the
//! commands, touches and clock ticks the host feeds in.
//!
//! All functions use panic::catch_unwind to prevent Rust panics from
//! unwinding across the FFI boundary.

use serde::Deserialize;
use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr, CString};
use std::panic;
use std::ptr;
use transla_overlay_rs::platform::{
    ActionMessage, ForegroundNotification, LifecycleHost, PermissionProbe, ToastDuration, Toaster,
};
use transla_overlay_rs::surface::{Size, SurfaceContent, SurfaceSpec, WindowError};
use transla_overlay_rs::{
    logging, Action, ActionBridge, CommandErrorCode, DisplayMetrics, HostCommand, OverlayConfig,
    OverlayService, SurfaceId, TouchInput, WindowSystem,
};

// ============================================================================
// Error Handling
// ============================================================================

/// Error codes returned by FFI functions.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    InvalidHandle = -1,
    InvalidArgument = -2,
    PermissionDenied = -3,
    StartFailed = -4,
    JsonError = -5,
    PayloadInvalid = -6,
    Panic = -99,
}

impl From<CommandErrorCode> for ErrorCode {
    fn from(code: CommandErrorCode) -> Self {
        match code {
            CommandErrorCode::PermissionDenied => ErrorCode::PermissionDenied,
            CommandErrorCode::InvalidArgs => ErrorCode::InvalidArgument,
            CommandErrorCode::StartFailed => ErrorCode::StartFailed,
            CommandErrorCode::PayloadInvalid => ErrorCode::PayloadInvalid,
        }
    }
}

/// Thread-local storage for the last error.
thread_local! {
    static LAST_ERROR: RefCell<Option<(ErrorCode, String)>> = const { RefCell::new(None) };
}

fn set_last_error(code: ErrorCode, message: impl Into<String>) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some((code, message.into()));
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

// ============================================================================
// Host Callbacks
// ============================================================================

/// Callbacks implemented by the host. Every entry may be null.
///
/// Callbacks returning `i32` report 0 on success. JSON arguments are only
/// valid for the duration of the call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HostCallbacks {
    /// Passed back as the first argument of every callback
    pub user_data: *mut c_void,

    /// Non-zero when the app may draw over other apps. Null means denied.
    pub can_draw_overlays: Option<extern "C" fn(*mut c_void) -> i32>,

    /// Attach a surface: `(user_data, surface_id, spec_json)`
    pub add_surface: Option<extern "C" fn(*mut c_void, u32, *const c_char) -> i32>,

    /// Push a new spec for an attached surface
    pub update_surface: Option<extern "C" fn(*mut c_void, u32, *const c_char) -> i32>,

    pub remove_surface: Option<extern "C" fn(*mut c_void, u32) -> i32>,

    /// Measure content: `(user_data, content_json, out_width, out_height)`.
    /// When null or failing, the intrinsic size is used.
    pub measure: Option<extern "C" fn(*mut c_void, *const c_char, *mut i32, *mut i32) -> i32>,

    /// Deliver an action message as JSON. When null, actions are queued for
    /// `overlay_engine_take_actions`.
    pub emit_action: Option<extern "C" fn(*mut c_void, *const c_char)>,

    /// Show a toast: `(user_data, message, long)`
    pub toast: Option<extern "C" fn(*mut c_void, *const c_char, i32)>,

    /// Enter the foreground with a notification given as JSON
    pub start_foreground: Option<extern "C" fn(*mut c_void, *const c_char)>,

    pub stop_foreground: Option<extern "C" fn(*mut c_void)>,
}

impl HostCallbacks {
    /// A table with every callback unset.
    pub fn empty() -> Self {
        Self {
            user_data: ptr::null_mut(),
            can_draw_overlays: None,
            add_surface: None,
            update_surface: None,
            remove_surface: None,
            measure: None,
            emit_action: None,
            toast: None,
            start_foreground: None,
            stop_foreground: None,
        }
    }
}

/// Host backed by a [`HostCallbacks`] table.
struct CallbackHost {
    callbacks: HostCallbacks,
    metrics: DisplayMetrics,
    /// Actions waiting for `overlay_engine_take_actions`
    pending: Vec<ActionMessage>,
}

impl CallbackHost {
    fn new(callbacks: HostCallbacks) -> Self {
        Self {
            callbacks,
            metrics: DisplayMetrics::default(),
            pending: Vec::new(),
        }
    }

    fn send_spec(
        &self,
        callback: Option<extern "C" fn(*mut c_void, u32, *const c_char) -> i32>,
        id: SurfaceId,
        spec: &SurfaceSpec,
    ) -> Result<(), WindowError> {
        let refused = |reason: String| WindowError::Refused { id, reason };
        let callback = callback.ok_or_else(|| refused("no window callback".to_string()))?;
        let json = serde_json::to_string(spec).map_err(|e| refused(e.to_string()))?;
        let json = CString::new(json).map_err(|e| refused(e.to_string()))?;
        match callback(self.callbacks.user_data, id.0, json.as_ptr()) {
            0 => Ok(()),
            code => Err(refused(format!("host returned {code}"))),
        }
    }
}

impl WindowSystem for CallbackHost {
    fn add_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        self.send_spec(self.callbacks.add_surface, id, spec)
    }

    fn update_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        self.send_spec(self.callbacks.update_surface, id, spec)
    }

    fn remove_surface(&mut self, id: SurfaceId) -> Result<(), WindowError> {
        let Some(callback) = self.callbacks.remove_surface else {
            return Err(WindowError::Refused {
                id,
                reason: "no window callback".to_string(),
            });
        };
        match callback(self.callbacks.user_data, id.0) {
            0 => Ok(()),
            code => Err(WindowError::Refused {
                id,
                reason: format!("host returned {code}"),
            }),
        }
    }

    fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    fn set_metrics(&mut self, metrics: DisplayMetrics) {
        self.metrics = metrics;
    }

    fn measure(&self, content: &SurfaceContent) -> Size {
        let intrinsic = content.intrinsic_size(self.metrics.screen_size());
        let Some(callback) = self.callbacks.measure else {
            return intrinsic;
        };
        let Some(json) = serde_json::to_string(content)
            .ok()
            .and_then(|json| CString::new(json).ok())
        else {
            return intrinsic;
        };
        let (mut width, mut height) = (0, 0);
        match callback(self.callbacks.user_data, json.as_ptr(), &mut width, &mut height) {
            0 => Size::new(width, height),
            code => {
                tracing::warn!(code, "Host measure failed, using intrinsic size");
                intrinsic
            }
        }
    }
}

impl ActionBridge for CallbackHost {
    fn emit(&mut self, action: Action) {
        let message = action.to_message();
        let Some(callback) = self.callbacks.emit_action else {
            self.pending.push(message);
            return;
        };
        match serde_json::to_string(&message) {
            Ok(json) => {
                let json = alloc_c_string(&json);
                callback(self.callbacks.user_data, json);
                overlay_engine_free_string(json);
            }
            Err(e) => tracing::error!(error = %e, "Failed to encode action"),
        }
    }
}

impl PermissionProbe for CallbackHost {
    fn can_draw_overlays(&self) -> bool {
        self.callbacks
            .can_draw_overlays
            .map(|callback| callback(self.callbacks.user_data) != 0)
            .unwrap_or(false)
    }
}

impl Toaster for CallbackHost {
    fn toast(&mut self, message: &str, duration: ToastDuration) {
        if let Some(callback) = self.callbacks.toast {
            let message = alloc_c_string(message);
            callback(
                self.callbacks.user_data,
                message,
                (duration == ToastDuration::Long) as i32,
            );
            overlay_engine_free_string(message);
        }
    }
}

impl LifecycleHost for CallbackHost {
    fn start_in_foreground(&mut self, notification: &ForegroundNotification) {
        let Some(callback) = self.callbacks.start_foreground else {
            return;
        };
        match serde_json::to_string(notification) {
            Ok(json) => {
                let json = alloc_c_string(&json);
                callback(self.callbacks.user_data, json);
                overlay_engine_free_string(json);
            }
            Err(e) => tracing::error!(error = %e, "Failed to encode notification"),
        }
    }

    fn stop_foreground(&mut self) {
        if let Some(callback) = self.callbacks.stop_foreground {
            callback(self.callbacks.user_data);
        }
    }
}

// ============================================================================
// Engine Handle Type
// ============================================================================

/// Configuration for engine creation.
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Metrics in effect before the first `update_display_metrics`
    #[serde(default)]
    pub metrics: Option<DisplayMetrics>,
}

/// Opaque handle to the overlay engine. Actually points to an OverlayEngine struct.
pub type OverlayEngineHandle = *mut c_void;

/// Internal engine state.
struct OverlayEngine {
    service: OverlayService<CallbackHost>,
}

impl OverlayEngine {
    fn new(callbacks: HostCallbacks, config: EngineConfig) -> Self {
        let mut host = CallbackHost::new(callbacks);
        if let Some(metrics) = config.metrics {
            host.set_metrics(metrics);
        }
        Self {
            service: OverlayService::new(host, config.overlay),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Allocate a C string from a Rust string. Caller must free with overlay_engine_free_string.
fn alloc_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        // Interior NUL: hand back the text up to it
        Err(e) => {
            let end = e.nul_position();
            let mut bytes = e.into_vec();
            bytes.truncate(end);
            CString::new(bytes).map_or(ptr::null_mut(), CString::into_raw)
        }
    }
}

/// Parse a C string to a Rust string slice.
unsafe fn parse_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Borrow the engine behind a handle.
unsafe fn engine_mut<'a>(handle: OverlayEngineHandle) -> Option<&'a mut OverlayEngine> {
    (handle as *mut OverlayEngine).as_mut()
}

// ============================================================================
// FFI Functions - Lifecycle
// ============================================================================

/// Create a new overlay engine instance.
///
/// # Arguments
/// * `config_json` - JSON configuration string (can be null for defaults)
/// * `callbacks` - Host callback table, copied by the engine (can be null)
///
/// # Returns
/// Handle to the engine, or null on failure. Check overlay_engine_last_error_code() on failure.
///
/// # Safety
/// The returned handle must be freed with overlay_engine_destroy(). `user_data`
/// must stay valid until then.
#[no_mangle]
pub extern "C" fn overlay_engine_create(
    config_json: *const c_char,
    callbacks: *const HostCallbacks,
) -> OverlayEngineHandle {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let config = if config_json.is_null() {
            EngineConfig::default()
        } else {
            let Some(json) = (unsafe { parse_c_str(config_json) }) else {
                set_last_error(ErrorCode::InvalidArgument, "Config is not valid UTF-8");
                return ptr::null_mut();
            };
            match serde_json::from_str::<EngineConfig>(json) {
                Ok(config) => config,
                Err(e) => {
                    set_last_error(ErrorCode::JsonError, format!("Invalid engine config: {e}"));
                    return ptr::null_mut();
                }
            }
        };

        let level = config.log_level.clone().or_else(|| config.overlay.log_level.clone());
        logging::init(level.as_deref());

        let callbacks = unsafe { callbacks.as_ref() }
            .copied()
            .unwrap_or_else(HostCallbacks::empty);
        let engine = Box::new(OverlayEngine::new(callbacks, config));
        tracing::info!("Overlay engine created");
        Box::into_raw(engine) as OverlayEngineHandle
    });

    match result {
        Ok(handle) => handle,
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during engine creation");
            ptr::null_mut()
        }
    }
}

/// Destroy an overlay engine instance. Every surface is detached first.
///
/// # Safety
/// The handle must have been created by overlay_engine_create() and must not be used after this call.
#[no_mangle]
pub extern "C" fn overlay_engine_destroy(handle: OverlayEngineHandle) {
    if handle.is_null() {
        return;
    }

    let _ = panic::catch_unwind(|| {
        let mut engine = unsafe { Box::from_raw(handle as *mut OverlayEngine) };
        engine.service.stop();
    });
}

// ============================================================================
// FFI Functions - Input
// ============================================================================

/// Run a host command.
///
/// # Arguments
/// * `handle` - Engine handle
/// * `command_json` - e.g. `{"method":"show_floating_bubble"}`
/// * `now_ms` - Host clock in milliseconds
///
/// # Returns
/// JSON reply `{"success":..,"error":{..},"value":..}`. Caller must free with
/// overlay_engine_free_string(). Returns null only for a bad handle.
#[no_mangle]
pub extern "C" fn overlay_engine_command(
    handle: OverlayEngineHandle,
    command_json: *const c_char,
    now_ms: u64,
) -> *mut c_char {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let Some(engine) = (unsafe { engine_mut(handle) }) else {
            set_last_error(ErrorCode::InvalidHandle, "Invalid engine handle");
            return None;
        };
        let reply = match unsafe { parse_c_str(command_json) } {
            Some(json) => engine.service.handle_command_json(json, now_ms),
            None => transla_overlay_rs::CommandReply::error(
                CommandErrorCode::InvalidArgs,
                "Command is null or not valid UTF-8",
            ),
        };
        if let Some(error) = &reply.error {
            set_last_error(ErrorCode::from(error.code), error.message.clone());
        }
        serde_json::to_string(&reply).ok()
    });

    match result {
        Ok(Some(json)) => alloc_c_string(&json),
        Ok(None) => ptr::null_mut(),
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during command");
            ptr::null_mut()
        }
    }
}

/// Route a touch event.
///
/// # Arguments
/// * `handle` - Engine handle
/// * `touch_json` - e.g. `{"target":{"surface":"bubble"},"event":{"action":"down","raw_x":1000,"raw_y":500,"time_ms":0}}`
///
/// # Returns
/// 0 on success, negative error code on failure.
#[no_mangle]
pub extern "C" fn overlay_engine_touch(
    handle: OverlayEngineHandle,
    touch_json: *const c_char,
) -> i32 {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let Some(engine) = (unsafe { engine_mut(handle) }) else {
            set_last_error(ErrorCode::InvalidHandle, "Invalid engine handle");
            return ErrorCode::InvalidHandle as i32;
        };
        let Some(json) = (unsafe { parse_c_str(touch_json) }) else {
            set_last_error(ErrorCode::InvalidArgument, "Invalid touch");
            return ErrorCode::InvalidArgument as i32;
        };
        match serde_json::from_str::<TouchInput>(json) {
            Ok(input) => {
                engine.service.handle_touch(input.target, input.event);
                ErrorCode::Success as i32
            }
            Err(e) => {
                set_last_error(ErrorCode::JsonError, format!("Invalid touch: {e}"));
                ErrorCode::JsonError as i32
            }
        }
    });

    match result {
        Ok(code) => code,
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during touch");
            ErrorCode::Panic as i32
        }
    }
}

/// Advance the engine clock, firing due long-presses and stepping fades.
///
/// # Returns
/// Host time at which to call again, -1 when nothing is pending, or -2 for a
/// bad handle or panic.
#[no_mangle]
pub extern "C" fn overlay_engine_tick(handle: OverlayEngineHandle, now_ms: u64) -> i64 {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let Some(engine) = (unsafe { engine_mut(handle) }) else {
            set_last_error(ErrorCode::InvalidHandle, "Invalid engine handle");
            return -2;
        };
        engine
            .service
            .tick(now_ms)
            .map_or(-1, |next| i64::try_from(next).unwrap_or(i64::MAX))
    });

    match result {
        Ok(next) => next,
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during tick");
            -2
        }
    }
}

/// Report new display metrics.
///
/// # Returns
/// 0 on success, negative error code on failure.
#[no_mangle]
pub extern "C" fn overlay_engine_set_metrics(
    handle: OverlayEngineHandle,
    density: f32,
    width_px: i32,
    height_px: i32,
    api_level: u32,
    now_ms: u64,
) -> i32 {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let Some(engine) = (unsafe { engine_mut(handle) }) else {
            set_last_error(ErrorCode::InvalidHandle, "Invalid engine handle");
            return ErrorCode::InvalidHandle as i32;
        };
        if !(density > 0.0) || width_px <= 0 || height_px <= 0 {
            set_last_error(ErrorCode::InvalidArgument, "Invalid display metrics");
            return ErrorCode::InvalidArgument as i32;
        }
        let metrics = DisplayMetrics {
            density,
            width_px,
            height_px,
            api_level,
        };
        engine
            .service
            .handle_command(HostCommand::UpdateDisplayMetrics(metrics), now_ms);
        ErrorCode::Success as i32
    });

    match result {
        Ok(code) => code,
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during set metrics");
            ErrorCode::Panic as i32
        }
    }
}

/// Take the queued action messages.
///
/// # Returns
/// JSON array of `{"method":..,"payload":..}`. Caller must free with
/// overlay_engine_free_string(). Returns null on failure.
#[no_mangle]
pub extern "C" fn overlay_engine_take_actions(handle: OverlayEngineHandle) -> *mut c_char {
    clear_last_error();

    let result = panic::catch_unwind(|| {
        let Some(engine) = (unsafe { engine_mut(handle) }) else {
            set_last_error(ErrorCode::InvalidHandle, "Invalid engine handle");
            return None;
        };
        let pending = std::mem::take(&mut engine.service.host_mut().pending);
        match serde_json::to_string(&pending) {
            Ok(json) => Some(json),
            Err(e) => {
                set_last_error(ErrorCode::JsonError, e.to_string());
                None
            }
        }
    });

    match result {
        Ok(Some(json)) => alloc_c_string(&json),
        Ok(None) => ptr::null_mut(),
        Err(_) => {
            set_last_error(ErrorCode::Panic, "Panic during take actions");
            ptr::null_mut()
        }
    }
}

// ============================================================================
// FFI Functions - Memory Management
// ============================================================================

/// Free a string allocated by this library.
///
/// # Safety
/// The pointer must have been returned by one of the overlay_engine_* functions.
/// Do not call this on strings from other sources.
#[no_mangle]
pub extern "C" fn overlay_engine_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }

    let _ = panic::catch_unwind(|| unsafe {
        let _ = CString::from_raw(ptr);
    });
}

// ============================================================================
// FFI Functions - Error Handling
// ============================================================================

/// Get the last error code.
///
/// # Returns
/// The error code from the last failed operation, or 0 if no error.
#[no_mangle]
pub extern "C" fn overlay_engine_last_error_code() -> i32 {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|(code, _)| *code as i32)
            .unwrap_or(0)
    })
}

/// Get the last error message.
///
/// # Returns
/// Error message string. Caller must free with overlay_engine_free_string().
/// Returns null if no error.
#[no_mangle]
pub extern "C" fn overlay_engine_last_error_message() -> *mut c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|(_, msg)| alloc_c_string(msg))
            .unwrap_or(ptr::null_mut())
    })
}

// ============================================================================
// FFI Functions - Utility
// ============================================================================

/// Get the library version.
///
/// # Returns
/// Version string. Caller must free with overlay_engine_free_string().
#[no_mangle]
pub extern "C" fn overlay_engine_version() -> *mut c_char {
    alloc_c_string(env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Tests
// ============================================================================
