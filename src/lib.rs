//! A quadrant planner for Iced.
//!
//! Tasks are placed on an urgency/importance chart, edited in a table or by dragging their
//! markers, and kept in a local JSON store (plus an optional tasks file shared with a host
//! shell).
//!
//! - [`mapper`] converts between task values and canvas pixels
//! - [`interaction`] turns pointer input into [`ChartEvent`]s
//! - [`planner`] owns the task list, [`store`] and [`transfer`] move it in and out
//!
//! ```no_run
//! use quadrant_planner::{ChartEvent, Planner};
//!
//! let mut planner = Planner::default();
//! let _ = planner.add_task();
//! let _ = planner.apply_chart_event(ChartEvent::DragUpdate {
//!     index: 0,
//!     urgency: 8.0,
//!     importance: 3.0,
//! });
//! assert_eq!(planner.tasks()[0].urgency, 8.0);
//! ```
pub mod advice;
pub mod app;
pub mod chart;
pub mod config;
pub mod controls;
pub mod icon;
pub mod icon_cache;
pub mod interaction;
pub mod layout;
pub mod legend;
pub mod mapper;
pub mod message;
pub mod picking;
pub mod planner;
pub mod store;
pub mod table;
pub mod task;
pub mod ticks;
pub mod transfer;

// Iced re-exports.
pub use iced::Color;

// Re-exports of public types.
pub use config::PlannerConfig;
pub use controls::ChartControls;
pub use icon::{BuiltinShape, IconRef};
pub use interaction::{DragState, InteractionController};
pub use layout::{ChartLayout, RenderedPoints};
pub use mapper::CoordinateMapper;
pub use message::{ChartEvent, PointerId, PointerInput};
pub use planner::Planner;
pub use store::{Persistence, SavedState, TaskStore};
pub use task::Task;
