//! # Widget Engine
//!
//! A retained-mode widget toolkit: a tree of rectangular components with
//! z-ordered hit testing, plus an address bus for decoupled messaging
//! between them.
//!
//! ## Features
//!
//! - **Widget Tree**: Arena-backed hierarchy with absolute-from-relative
//!   geometry, z-order as child order, and pointer capture
//! - **Event Dispatch**: Front-to-back offering with first-consumer-wins
//!   semantics and passthrough nodes
//! - **Address Bus**: Queued packet delivery with broadcast, liveness
//!   pings, and theme distribution
//! - **Stock Widgets**: Panels, labels, buttons, sliders, draggable
//!   windows with edge snapping
//! - **Backend Agnostic**: Widgets draw through a small surface trait; the
//!   host supplies the real target
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use widget_engine::prelude::*;
//!
//! fn main() {
//!     let mut shell = Shell::new(ToolkitConfig::default());
//!     GuiBuilder::create(Rect::new(100, 100, 400, 300))
//!         .with_title("Config")
//!         .with_toolbar(3)
//!         .with_controls()
//!         .build(&mut shell);
//!
//!     let mut surface = LoggingSurface::new(1024, 768);
//!     while shell.running() {
//!         shell.tick();
//!         shell.draw(&mut surface);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod builder;
pub mod bus;
pub mod foundation;
pub mod surface;
pub mod theme;
pub mod tree;
pub mod widgets;

mod shell;

pub use shell::{Shell, ShellError};

/// Common imports for toolkit users
pub mod prelude {
    pub use crate::{
        builder::{BuiltWindow, GuiBuilder},
        bus::{Address, AddressBus, Packet, PacketData, Response, BROADCAST, MASTER},
        core::config::{Config, ConfigError, ToolkitConfig},
        foundation::{
            geometry::{Point, Rect},
            time::Timer,
        },
        surface::{DrawSurface, LoggingSurface},
        theme::{Color, Theme},
        tree::{
            dispatch_event, InputEvent, NodeId, PointerButton, Widget, WidgetCtx, WidgetTree,
        },
        widgets::{
            Blinker, Button, Desktop, HAlign, Label, MultiLabel, Panel, Pulsar, Slider, Style,
            VAlign, Window,
        },
        Shell, ShellError,
    };
}
