//! [`WindowPlacer`] and [`ScreenProvider`] implementations backed by
//! Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation.
//!
//! Hyprland's layout space has its origin at the top-left and y growing
//! downward, in logical pixels.  Placement space is the same space shifted so
//! that the reference monitor's top-left corner is the origin; the reference
//! monitor is the one at the layout origin, or the first one reported.

use crate::geometry::{Rect, ScreenArea};
use crate::traits::{ScreenProvider, WindowPlacer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// How windows are moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Float a tiled window before moving it.  Tiled windows ignore
    /// pixel-exact moves.  Default: `true`.
    pub float_window: bool,
    /// Resize again after moving, for windows whose size is clamped by the
    /// monitor they were on.  Default: `true`.
    pub reapply_size: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            float_window: true,
            reapply_size: true,
        }
    }
}

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

/// Hyprland-backed window placer and screen provider.
///
/// Each call opens short-lived IPC requests; nothing is cached between
/// calls.  The handle is cheap to clone, so one clone can serve as the
/// placer and another as the screen provider.
#[derive(Debug, Clone)]
pub struct HyprlandPlacer {
    socket: PathBuf,
    config: PlacementConfig,
}

impl HyprlandPlacer {
    /// Locate the running Hyprland instance from the environment.
    pub fn new(config: PlacementConfig) -> Result<Self, HyprlandError> {
        Ok(Self::with_socket(socket_path()?, config))
    }

    /// Talk to the Hyprland command socket at `socket`.
    pub fn with_socket(socket: impl AsRef<Path>, config: PlacementConfig) -> Self {
        Self {
            socket: socket.as_ref().to_path_buf(),
            config,
        }
    }

    /// Send a raw command to the Hyprland command socket and return the
    /// response as a string.
    fn ipc_request(&self, command: &str) -> Result<String, HyprlandError> {
        let mut stream = UnixStream::connect(&self.socket)
            .map_err(|e| HyprlandError(format!("connect to {}: {}", self.socket.display(), e)))?;

        stream
            .write_all(command.as_bytes())
            .map_err(|e| HyprlandError(format!("write: {}", e)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| HyprlandError(format!("read: {}", e)))?;

        String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
    }

    /// Send a JSON data query (`j/<command>`) and return the raw JSON string.
    fn ipc_json(&self, data_command: &str) -> Result<String, HyprlandError> {
        self.ipc_request(&format!("j/{}", data_command))
    }

    /// Send a dispatch command and check for `"ok"`.
    fn ipc_dispatch(&self, args: &str) -> Result<(), HyprlandError> {
        debug!("dispatch {}", args);
        let response = self.ipc_request(&format!("/dispatch {}", args))?;
        if response.trim() == "ok" {
            Ok(())
        } else {
            Err(HyprlandError(format!("dispatch {:?} failed: {}", args, response)))
        }
    }

    fn monitors(&self) -> Result<Vec<MonitorJson>, HyprlandError> {
        let json = self.ipc_json("monitors")?;
        serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse monitors: {}", e)))
    }

    fn active_window(&self) -> Result<Option<ActiveWindowJson>, HyprlandError> {
        let json = self.ipc_json("activewindow")?;
        // Hyprland returns an empty object `{}` when no window is focused.
        if json.trim() == "{}" {
            return Ok(None);
        }
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| HyprlandError(format!("parse activewindow: {}", e)))
    }
}

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!("{}/hypr/{}/.socket.sock", runtime_dir, his)))
}

//  Minimal serde structs for the JSON we care about

fn default_scale() -> f64 {
    1.0
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Clone, Deserialize)]
struct MonitorJson {
    name: String,
    /// Physical pixels.
    width: u32,
    height: u32,
    /// Layout position, logical pixels.
    x: i32,
    y: i32,
    #[serde(default = "default_scale")]
    scale: f64,
    /// wl_output transform; odd values rotate by 90°.
    #[serde(default)]
    transform: u8,
    #[serde(default)]
    focused: bool,
    /// Space taken by bars and panels: left, top, right, bottom.
    #[serde(default)]
    reserved: [f64; 4],
}

impl MonitorJson {
    /// Size in logical pixels.
    fn logical_size(&self) -> (f64, f64) {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        let (w, h) = (self.width as f64 / scale, self.height as f64 / scale);
        if self.transform % 2 == 1 {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Usable rectangle in Hyprland layout space (y down).
    fn usable_layout_rect(&self) -> Rect {
        let (w, h) = self.logical_size();
        let [left, top, right, bottom] = self.reserved;
        Rect::new(
            self.x as f64 + left,
            self.y as f64 + top,
            w - left - right,
            h - top - bottom,
        )
    }
}

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Debug, Clone, Deserialize)]
struct ActiveWindowJson {
    address: String,
    #[serde(default)]
    floating: bool,
}

//  Pure helpers

fn reference_monitor(monitors: &[MonitorJson]) -> Option<&MonitorJson> {
    monitors
        .iter()
        .find(|m| m.x == 0 && m.y == 0)
        .or_else(|| monitors.first())
}

fn target_monitor(monitors: &[MonitorJson]) -> Option<&MonitorJson> {
    monitors.iter().find(|m| m.focused).or_else(|| monitors.first())
}

/// Describe the focused monitor in bottom-left usable space.
///
/// Usable space shares its x axis with placement space; its y axis points
/// up with `0` at the reference monitor's bottom edge.
fn screen_area_from(monitors: &[MonitorJson]) -> Result<ScreenArea, HyprlandError> {
    let reference = reference_monitor(monitors).ok_or_else(|| HyprlandError("no monitors".into()))?;
    let target = target_monitor(monitors).ok_or_else(|| HyprlandError("no monitors".into()))?;

    let (_, reference_height) = reference.logical_size();
    let layout = target.usable_layout_rect();
    let rel_x = layout.x - reference.x as f64;
    let rel_y = layout.y - reference.y as f64;

    debug!(
        "target {} usable {:?}, reference {} height {}",
        target.name, layout, reference.name, reference_height
    );

    Ok(ScreenArea {
        usable: Rect::new(
            rel_x,
            reference_height - rel_y - layout.height,
            layout.width,
            layout.height,
        ),
        reference_top: reference_height,
    })
}

/// Dispatch arguments that move the window at `address` to `rect`, given
/// in placement space.  `origin` is the reference monitor's layout position.
fn placement_commands(
    address: &str,
    rect: &Rect,
    origin: (i32, i32),
    floating: bool,
    config: &PlacementConfig,
) -> Vec<String> {
    let x = (rect.x + origin.0 as f64).round() as i64;
    let y = (rect.y + origin.1 as f64).round() as i64;
    let w = rect.width.round() as i64;
    let h = rect.height.round() as i64;

    let resize = format!("resizewindowpixel exact {} {},address:{}", w, h, address);
    let mut commands = Vec::with_capacity(4);
    if config.float_window && !floating {
        commands.push(format!("setfloating address:{}", address));
    }
    commands.push(resize.clone());
    commands.push(format!("movewindowpixel exact {} {},address:{}", x, y, address));
    if config.reapply_size {
        commands.push(resize);
    }
    commands
}

//  Trait implementations

impl ScreenProvider for HyprlandPlacer {
    type Error = HyprlandError;

    fn screen_area(&self) -> Result<ScreenArea, Self::Error> {
        screen_area_from(&self.monitors()?)
    }
}

impl WindowPlacer for HyprlandPlacer {
    type Error = HyprlandError;

    fn place(&self, rect: Rect) -> Result<bool, Self::Error> {
        let Some(window) = self.active_window()? else {
            return Ok(false);
        };
        let monitors = self.monitors()?;
        let origin = reference_monitor(&monitors)
            .map(|m| (m.x, m.y))
            .unwrap_or((0, 0));

        for args in placement_commands(&window.address, &rect, origin, window.floating, &self.config) {
            self.ipc_dispatch(&args)?;
        }
        Ok(true)
    }
}

//  Tests
