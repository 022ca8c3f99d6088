#![no_std]

#[macro_use]
mod log;

pub mod bridge;
pub mod cancel;
pub mod channel;
pub mod color;
pub mod config;
pub mod driver;
pub mod effect;
pub mod math8;
pub mod renderer;
pub mod strip;

pub use bridge::{
    AttributeCache, AttributeValue, AttributeWrite, BridgeError, ClusterId, EndpointMap,
    EndpointTarget, IdentifyEffect, ProtocolBridge, WriteStatus,
};
pub use cancel::{CancelToken, JoinOutcome};
pub use channel::{ChannelIndex, ChannelSnapshot};
pub use config::{DriverConfig, EffectTimings, MAX_CHANNELS};
pub use driver::{DriverError, FixtureDriver};
pub use effect::{EffectJob, EffectKind, EffectSpawner, SpawnError};
pub use strip::{ChannelConfig, LedStrip, SmartLedsStrip, StripFactory};

pub use color::{Hsv, Rgb};
pub use embassy_time::Duration;
