/// Shared buffer layout read by the host.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 12 floats]
/// [Instances: max_instances × 9 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::instance::RenderInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_MAX_INSTANCES: usize = 1;
pub const HEADER_INSTANCE_COUNT: usize = 2;
pub const HEADER_WORLD_WIDTH: usize = 3;
pub const HEADER_WORLD_HEIGHT: usize = 4;
pub const HEADER_MAX_SOUNDS: usize = 5;
pub const HEADER_SOUND_COUNT: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
pub const HEADER_EVENT_COUNT: usize = 8;
pub const HEADER_PROTOCOL_VERSION: usize = 9;
/// 1.0 once the game has halted; the host may stop its frame loop.
pub const HEADER_HALTED: usize = 10;
/// Instances dropped this frame because the buffer was full.
pub const HEADER_DROPPED_INSTANCES: usize = 11;

pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per render instance (wire format).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub instance_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_sounds: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let sound_data_offset = instance_data_offset + instance_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_instances,
            max_sounds,
            max_events,
            instance_data_floats,
            sound_data_floats,
            event_data_floats,
            instance_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_sounds, config.max_events)
    }

    /// Fresh header with the capacities and world size filled in.
    pub fn header(&self, config: &GameConfig) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_WORLD_WIDTH] = config.world_width;
        header[HEADER_WORLD_HEIGHT] = config.world_height;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_instances, 2048);
        assert_eq!(layout.instance_data_floats, 2048 * 9);
        assert_eq!(layout.sound_data_floats, 16);
        assert_eq!(layout.event_data_floats, 16 * 4);
        assert_eq!(layout.buffer_total_floats, 12 + 2048 * 9 + 16 + 16 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 10, 20);

        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.sound_data_offset, layout.instance_data_offset + layout.instance_data_floats);
        assert_eq!(layout.event_data_offset, layout.sound_data_offset + layout.sound_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_carries_capacities() {
        let config = GameConfig::default();
        let layout = ProtocolLayout::from_config(&config);
        let header = layout.header(&config);
        assert_eq!(header[HEADER_MAX_INSTANCES], 2048.0);
        assert_eq!(header[HEADER_WORLD_WIDTH], 320.0);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_HALTED], 0.0);
    }
}
