//! twinslide is the interaction and geometry core of a dual-knob range slider.
//!
//! It turns pointer and keyboard input into a pair of bounded, step-quantized
//! values, lays out a track with two knobs, optional ticks, optional labels
//! and progress fills, and reports committed changes to a host.
//!
//! The crate does not draw. Rendering goes through the [`RenderTarget`]
//! trait, which any backend with absolutely positioned boxes can implement;
//! [`headless::HeadlessTarget`] is an in-memory implementation.
//!
//! # Quick start
//!
//! ```
//! use twinslide::prelude::*;
//!
//! let mut target = HeadlessTarget::new(HeadlessMetrics::default());
//! target.attach(PxSize::new(Px(100), Px(20)));
//!
//! let config = SliderConfig::default().step_size(5.0).label_count(4);
//! let mut slider = RangeSliderController::with_config(target, config);
//! slider.on_commit(|event| println!("{:?}", event.values));
//!
//! slider.handle_key_down(SliderKey::Space, false);
//! assert_eq!(slider.values(), CurrentValues::collapsed(50.0));
//! ```
//!
//! # Time
//!
//! Held arrow keys repeat on a cooperative timer. Hosts call
//! [`RangeSliderController::tick`] from their event loop, using
//! [`RangeSliderController::next_repeat_deadline`] to schedule the call.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod callback;
pub mod config;
pub mod confine;
pub mod controller;
pub mod geometry;
pub mod headless;
pub mod interaction;
pub mod key_repeat;
pub mod marks;
pub mod px;
pub mod render;
pub mod selector;

pub use callback::{CallbackWith, LabelFormatter};
pub use config::{ConfigError, CrossoverPolicy, HostState, RawSliderConfig, SliderConfig};
pub use confine::{CurrentValues, StepSize, ValueConfiner};
pub use controller::{CommitEvent, HostRequests, HostSync, RangeSliderController};
pub use geometry::{TrackGeometry, ValueRange};
pub use interaction::{InteractionState, SliderKey};
pub use key_repeat::{KeyRepeatScheduler, RepeatDelays, StepDirection};
pub use px::{Px, PxSize};
pub use render::{ElementRole, RenderTarget, Style, Visibility};
pub use selector::Knob;

/// Common imports for hosts.
pub mod prelude {
    pub use crate::{
        CommitEvent, CurrentValues, HostRequests, HostSync, Knob, Px, PxSize,
        RangeSliderController, RenderTarget, SliderConfig, SliderKey,
        headless::{HeadlessMetrics, HeadlessTarget},
    };
}
