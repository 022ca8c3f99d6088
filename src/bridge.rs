//! Protocol bridge
//!
//! Translates inbound Zigbee attribute writes and identify effects into
//! driver calls. The mesh stack itself stays outside the crate: it hands
//! over decoded [`AttributeWrite`]s and answers sibling lookups through
//! [`AttributeCache`].

use crate::channel::ChannelIndex;
use crate::config::MAX_CHANNELS;
use crate::driver::FixtureDriver;
use crate::effect::{EffectKind, EffectSpawner};
use crate::strip::LedStrip;

/// Attribute identifiers within the clusters the bridge understands
pub mod attribute {
    /// On/Off cluster
    pub const ON_OFF: u16 = 0x0000;
    /// Level Control cluster
    pub const CURRENT_LEVEL: u16 = 0x0000;
    /// Color Control cluster
    pub const CURRENT_HUE: u16 = 0x0000;
    pub const CURRENT_SATURATION: u16 = 0x0001;
    pub const CURRENT_X: u16 = 0x0003;
    pub const CURRENT_Y: u16 = 0x0004;
    pub const COLOR_TEMPERATURE: u16 = 0x0007;
    /// Identify cluster
    pub const IDENTIFY_TIME: u16 = 0x0000;
}

/// Effect codes of the Identify cluster's trigger-effect command
pub mod identify {
    pub const BLINK: u8 = 0x00;
    pub const BREATHE: u8 = 0x01;
    pub const OKAY: u8 = 0x02;
    pub const CHANNEL_CHANGE: u8 = 0x0B;
    pub const FINISH_EFFECT: u8 = 0xFE;
    pub const STOP_EFFECT: u8 = 0xFF;
}

const CLUSTER_IDENTIFY: u16 = 0x0003;
const CLUSTER_ON_OFF: u16 = 0x0006;
const CLUSTER_LEVEL_CONTROL: u16 = 0x0008;
const CLUSTER_COLOR_CONTROL: u16 = 0x0300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterId {
    Identify,
    OnOff,
    LevelControl,
    ColorControl,
    Other(u16),
}

impl ClusterId {
    pub const fn from_raw(value: u16) -> Self {
        match value {
            CLUSTER_IDENTIFY => Self::Identify,
            CLUSTER_ON_OFF => Self::OnOff,
            CLUSTER_LEVEL_CONTROL => Self::LevelControl,
            CLUSTER_COLOR_CONTROL => Self::ColorControl,
            other => Self::Other(other),
        }
    }

    pub const fn raw(self) -> u16 {
        match self {
            Self::Identify => CLUSTER_IDENTIFY,
            Self::OnOff => CLUSTER_ON_OFF,
            Self::LevelControl => CLUSTER_LEVEL_CONTROL,
            Self::ColorControl => CLUSTER_COLOR_CONTROL,
            Self::Other(value) => value,
        }
    }
}

/// Status the stack attached to a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Success,
    Failure,
}

/// Decoded attribute payload, tagged with its declared ZCL type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
}

/// Inbound attribute write notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeWrite {
    pub endpoint: u8,
    pub cluster: ClusterId,
    pub attribute: u16,
    pub status: WriteStatus,
    pub value: Option<AttributeValue>,
}

impl AttributeWrite {
    /// Successful write carrying `value`
    pub const fn new(
        endpoint: u8,
        cluster: ClusterId,
        attribute: u16,
        value: AttributeValue,
    ) -> Self {
        Self {
            endpoint,
            cluster,
            attribute,
            status: WriteStatus::Success,
            value: Some(value),
        }
    }
}

/// Inbound identify trigger-effect notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyEffect {
    pub endpoint: u8,
    pub effect: u8,
}

/// Read access to the stack's current attribute values.
///
/// Color writes arrive one attribute at a time; the bridge pulls the paired
/// coordinate (Y for X, saturation for hue and so on) from here.
pub trait AttributeCache {
    fn read(&self, endpoint: u8, cluster: ClusterId, attribute: u16) -> Option<AttributeValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// The stack reported the write as failed
    Rejected,
    /// The write carried no value
    EmptyPayload,
}

/// What an endpoint addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointTarget {
    /// Logical channel number
    Channel(usize),
    /// Every channel of the fixture at once
    Fixture,
}

/// Endpoint to channel mapping
///
/// Channel `i` lives on endpoint `base + i`. An optional fixture endpoint
/// controls all channels together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointMap {
    pub base: u8,
    pub count: u8,
    pub fixture_endpoint: Option<u8>,
}

impl EndpointMap {
    pub const fn new(base: u8, count: u8) -> Self {
        Self {
            base,
            count,
            fixture_endpoint: None,
        }
    }

    #[must_use]
    pub const fn with_fixture_endpoint(mut self, endpoint: u8) -> Self {
        self.fixture_endpoint = Some(endpoint);
        self
    }

    /// Endpoint of a logical channel, if it fits the map
    pub fn endpoint_of(&self, channel: usize) -> Option<u8> {
        let channel = u8::try_from(channel).ok()?;
        if channel >= self.count {
            return None;
        }
        self.base.checked_add(channel)
    }

    pub fn resolve(&self, endpoint: u8) -> Option<EndpointTarget> {
        if self.fixture_endpoint == Some(endpoint) {
            return Some(EndpointTarget::Fixture);
        }
        let offset = endpoint.checked_sub(self.base)?;
        (offset < self.count).then_some(EndpointTarget::Channel(usize::from(offset)))
    }
}

/// Routes protocol notifications to a [`FixtureDriver`]
pub struct ProtocolBridge<S: 'static, P: 'static, C, const N: usize = MAX_CHANNELS> {
    driver: &'static FixtureDriver<S, P, N>,
    cache: C,
    endpoints: EndpointMap,
}

impl<S, P, C, const N: usize> ProtocolBridge<S, P, C, N>
where
    S: LedStrip + 'static,
    P: EffectSpawner<S> + 'static,
    C: AttributeCache,
{
    pub const fn new(
        driver: &'static FixtureDriver<S, P, N>,
        cache: C,
        endpoints: EndpointMap,
    ) -> Self {
        Self {
            driver,
            cache,
            endpoints,
        }
    }

    pub const fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    /// Apply an attribute write.
    ///
    /// Failed or empty writes are rejected without touching any channel.
    /// Writes the bridge does not understand are logged and dropped.
    pub async fn on_attribute_write(&self, write: &AttributeWrite) -> Result<(), BridgeError> {
        if write.status != WriteStatus::Success {
            log!(
                "[bridge] rejected write ep={} cluster={:#06x} attr={:#06x}",
                write.endpoint,
                write.cluster.raw(),
                write.attribute
            );
            return Err(BridgeError::Rejected);
        }
        let Some(value) = write.value else {
            log!("[bridge] empty payload on ep={}", write.endpoint);
            return Err(BridgeError::EmptyPayload);
        };
        let Some(target) = self.endpoints.resolve(write.endpoint) else {
            log!("[bridge] ignoring write for unmapped ep={}", write.endpoint);
            return Ok(());
        };

        match target {
            EndpointTarget::Channel(raw) => {
                if let Some(ch) = self.channel(raw) {
                    self.apply(ch, write, value).await;
                }
            }
            EndpointTarget::Fixture => {
                for ch in self.driver.channel_indices() {
                    self.apply(ch, write, value).await;
                }
            }
        }
        Ok(())
    }

    /// Map an identify effect code onto a channel effect
    pub async fn on_identify_effect(&self, request: &IdentifyEffect) -> Result<(), BridgeError> {
        let Some(kind) = identify_effect_kind(request.effect) else {
            log!("[bridge] unknown identify effect {:#04x}", request.effect);
            return Ok(());
        };
        let Some(target) = self.endpoints.resolve(request.endpoint) else {
            log!("[bridge] ignoring identify for unmapped ep={}", request.endpoint);
            return Ok(());
        };

        match target {
            EndpointTarget::Channel(raw) => {
                if let Some(ch) = self.channel(raw) {
                    self.start(ch, kind).await;
                }
            }
            EndpointTarget::Fixture => {
                for ch in self.driver.channel_indices() {
                    self.start(ch, kind).await;
                }
            }
        }
        Ok(())
    }

    fn channel(&self, raw: usize) -> Option<ChannelIndex> {
        let ch = self.driver.channel_index(raw);
        if ch.is_none() {
            log!("[bridge] endpoint maps to missing channel {}", raw);
        }
        ch
    }

    async fn start(&self, ch: ChannelIndex, kind: EffectKind) {
        if let Err(error) = self.driver.start_effect(ch, kind).await {
            log!("[bridge] channel {} effect {}: {:?}", ch.get(), kind.as_str(), error);
        }
    }

    async fn apply(&self, ch: ChannelIndex, write: &AttributeWrite, value: AttributeValue) {
        let result = match (write.cluster, write.attribute, value) {
            (ClusterId::OnOff, attribute::ON_OFF, AttributeValue::Bool(on)) => {
                self.driver.set_power(ch, on)
            }
            (ClusterId::LevelControl, attribute::CURRENT_LEVEL, AttributeValue::U8(level)) => {
                self.driver.set_level(ch, level)
            }
            (ClusterId::ColorControl, attribute::CURRENT_X, AttributeValue::U16(x)) => {
                match self.read_u16(write.endpoint, attribute::CURRENT_Y) {
                    Some(y) => self.driver.set_xy(ch, x, y),
                    None => Ok(()),
                }
            }
            (ClusterId::ColorControl, attribute::CURRENT_Y, AttributeValue::U16(y)) => {
                match self.read_u16(write.endpoint, attribute::CURRENT_X) {
                    Some(x) => self.driver.set_xy(ch, x, y),
                    None => Ok(()),
                }
            }
            (ClusterId::ColorControl, attribute::CURRENT_HUE, AttributeValue::U8(hue)) => {
                match self.read_u8(write.endpoint, attribute::CURRENT_SATURATION) {
                    Some(sat) => self.driver.set_hue_sat(ch, hue, sat),
                    None => Ok(()),
                }
            }
            (ClusterId::ColorControl, attribute::CURRENT_SATURATION, AttributeValue::U8(sat)) => {
                match self.read_u8(write.endpoint, attribute::CURRENT_HUE) {
                    Some(hue) => self.driver.set_hue_sat(ch, hue, sat),
                    None => Ok(()),
                }
            }
            (ClusterId::ColorControl, attribute::COLOR_TEMPERATURE, AttributeValue::U16(mired)) => {
                self.driver.set_color_temperature(ch, mired)
            }
            (ClusterId::Identify, attribute::IDENTIFY_TIME, AttributeValue::U16(seconds)) => {
                let kind = if seconds > 0 {
                    EffectKind::Blink
                } else {
                    EffectKind::None
                };
                self.driver.start_effect(ch, kind).await
            }
            _ => {
                log!(
                    "[bridge] ignoring cluster={:#06x} attr={:#06x} value={:?}",
                    write.cluster.raw(),
                    write.attribute,
                    value
                );
                Ok(())
            }
        };
        if let Err(error) = result {
            log!("[bridge] channel {} write not applied: {:?}", ch.get(), error);
        }
    }

    fn read_u16(&self, endpoint: u8, attribute: u16) -> Option<u16> {
        match self.cache.read(endpoint, ClusterId::ColorControl, attribute) {
            Some(AttributeValue::U16(value)) => Some(value),
            other => {
                log!("[bridge] sibling {:#06x} unavailable: {:?}", attribute, other);
                None
            }
        }
    }

    fn read_u8(&self, endpoint: u8, attribute: u16) -> Option<u8> {
        match self.cache.read(endpoint, ClusterId::ColorControl, attribute) {
            Some(AttributeValue::U8(value)) => Some(value),
            other => {
                log!("[bridge] sibling {:#06x} unavailable: {:?}", attribute, other);
                None
            }
        }
    }
}

/// Effect started by an identify code. `EffectKind::None` means stop.
pub fn identify_effect_kind(code: u8) -> Option<EffectKind> {
    match code {
        identify::BLINK => Some(EffectKind::Blink),
        identify::BREATHE => Some(EffectKind::Breathe),
        identify::OKAY => Some(EffectKind::IdentifyOk),
        identify::CHANNEL_CHANGE => Some(EffectKind::RandomColor),
        identify::FINISH_EFFECT | identify::STOP_EFFECT => Some(EffectKind::None),
        _ => None,
    }
}
