//! Hyprland-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`WindowPlacer`](crate::traits::WindowPlacer) and
//! [`ScreenProvider`](crate::traits::ScreenProvider) traits, powered by
//! Hyprland's IPC socket.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod placer;
