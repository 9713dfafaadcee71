//! Background music state. Playback itself belongs to whatever audio back end
//! listens for the `Music*` events.

use serde::{Deserialize, Serialize};
use starfolio_events::{EventBus, GalaxyEvent};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::persist::{StateStore, load_versioned, save_versioned};

pub const MUSIC_KEY: &str = "music-system";
pub const MUSIC_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackCategory {
    Ambient,
    Action,
    Planet,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicTrack {
    pub id: &'static str,
    pub name: &'static str,
    pub path: &'static str,
    pub category: TrackCategory,
    /// Planet whose interior uses this track.
    pub planet: Option<&'static str>,
    /// Per-track gain applied on top of the master volume.
    pub gain: f32,
}

pub const TRACKS: [MusicTrack; 9] = [
    MusicTrack { id: "space_ambient_1", name: "Cosmic Drift", path: "music/space-ambient-1.mp3", category: TrackCategory::Ambient, planet: None, gain: 0.5 },
    MusicTrack { id: "space_ambient_2", name: "Stellar Voyage", path: "music/space-ambient-2.mp3", category: TrackCategory::Ambient, planet: None, gain: 0.5 },
    MusicTrack { id: "action_1", name: "Hyperdrive", path: "music/action-1.mp3", category: TrackCategory::Action, planet: None, gain: 0.6 },
    MusicTrack { id: "origin_station", name: "Origin Station Theme", path: "music/origin-station.mp3", category: TrackCategory::Planet, planet: Some("origin-station"), gain: 0.5 },
    MusicTrack { id: "tech_nebula", name: "Tech Nebula Theme", path: "music/tech-nebula.mp3", category: TrackCategory::Planet, planet: Some("tech-nebula"), gain: 0.5 },
    MusicTrack { id: "project_galaxy", name: "Project Galaxy Theme", path: "music/project-galaxy.mp3", category: TrackCategory::Planet, planet: Some("project-galaxy"), gain: 0.5 },
    MusicTrack { id: "career_cosmos", name: "Career Cosmos Theme", path: "music/career-cosmos.mp3", category: TrackCategory::Planet, planet: Some("career-cosmos"), gain: 0.5 },
    MusicTrack { id: "achievement_sphere", name: "Achievement Sphere Theme", path: "music/achievement-sphere.mp3", category: TrackCategory::Planet, planet: Some("achievement-sphere"), gain: 0.5 },
    MusicTrack { id: "menu_theme", name: "Main Menu", path: "music/menu-theme.mp3", category: TrackCategory::Menu, planet: None, gain: 0.4 },
];

pub fn track(id: &str) -> Option<&'static MusicTrack> {
    TRACKS.iter().find(|t| t.id == id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Saved {
    current_track: Option<String>,
    volume: f32,
    muted: bool,
}

impl Default for Saved {
    fn default() -> Self {
        Self {
            current_track: None,
            volume: 0.5,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicStore {
    current: Option<&'static MusicTrack>,
    playing: bool,
    volume: f32,
    muted: bool,
    dirty: bool,
}

impl Default for MusicStore {
    fn default() -> Self {
        Self::with_volume(0.5)
    }
}

impl MusicStore {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            current: None,
            playing: false,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            dirty: false,
        }
    }

    /// Restore volume, mute and the last track. Playback starts paused.
    pub fn load(store: &dyn StateStore, default_volume: f32) -> Self {
        let mut this = Self::with_volume(default_volume);
        if let Some(saved) = load_versioned::<Saved>(store, MUSIC_KEY, MUSIC_VERSION) {
            this.volume = saved.volume.clamp(0.0, 1.0);
            this.muted = saved.muted;
            this.current = saved.current_track.as_deref().and_then(track);
        }
        this
    }

    pub fn save(&mut self, store: &mut dyn StateStore) -> Result<(), StoreError> {
        let saved = Saved {
            current_track: self.current.map(|t| t.id.to_owned()),
            volume: self.volume,
            muted: self.muted,
        };
        save_versioned(store, MUSIC_KEY, MUSIC_VERSION, &saved)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn current_track(&self) -> Option<&'static MusicTrack> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Start `id`. Unknown ids are ignored; the current track is not
    /// restarted if it is already playing.
    pub fn play_track(&mut self, id: &str, bus: &mut EventBus) {
        let Some(next) = track(id) else {
            warn!(id, "track not found");
            return;
        };
        if self.playing && self.current.is_some_and(|t| t.id == next.id) {
            return;
        }
        if self.current.is_some() {
            bus.publish(GalaxyEvent::MusicStop);
        }
        self.current = Some(next);
        self.playing = true;
        self.dirty = true;
        info!(track = next.id, "playing track");
        bus.publish(GalaxyEvent::MusicPlay {
            track: next.id.to_owned(),
        });
    }

    pub fn pause(&mut self, bus: &mut EventBus) {
        self.playing = false;
        bus.publish(GalaxyEvent::MusicPause);
    }

    pub fn resume(&mut self, bus: &mut EventBus) {
        self.playing = true;
        bus.publish(GalaxyEvent::MusicResume);
    }

    /// Pause when playing, resume otherwise.
    pub fn toggle_playback(&mut self, bus: &mut EventBus) {
        if self.playing {
            self.pause(bus);
        } else {
            self.resume(bus);
        }
    }

    pub fn stop(&mut self, bus: &mut EventBus) {
        self.current = None;
        self.playing = false;
        self.dirty = true;
        bus.publish(GalaxyEvent::MusicStop);
    }

    pub fn set_volume(&mut self, volume: f32, bus: &mut EventBus) {
        self.volume = volume.clamp(0.0, 1.0);
        self.dirty = true;
        bus.publish(GalaxyEvent::MusicVolume(self.volume));
    }

    pub fn toggle_mute(&mut self, bus: &mut EventBus) {
        self.muted = !self.muted;
        self.dirty = true;
        bus.publish(GalaxyEvent::MusicMute(self.muted));
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current?;
        TRACKS.iter().position(|t| t.id == current.id)
    }

    /// Next track in list order, wrapping; the first track when idle.
    pub fn next_track(&mut self, bus: &mut EventBus) {
        let index = match self.current_index() {
            Some(i) => (i + 1) % TRACKS.len(),
            None => 0,
        };
        self.play_track(TRACKS[index].id, bus);
    }

    /// Previous track, wrapping; the last track when idle.
    pub fn previous_track(&mut self, bus: &mut EventBus) {
        let index = match self.current_index() {
            Some(i) => (i + TRACKS.len() - 1) % TRACKS.len(),
            None => TRACKS.len() - 1,
        };
        self.play_track(TRACKS[index].id, bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStateStore;
    use starfolio_events::EventKind;

    #[test]
    fn test_play_unknown_is_noop() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe_all();
        let mut m = MusicStore::default();
        m.play_track("polka", &mut bus);
        assert!(m.current_track().is_none());
        assert_eq!(sub.pending(), 0);
    }

    #[test]
    fn test_switching_stops_previous_first() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::MusicPlay, EventKind::MusicStop]);
        let mut m = MusicStore::default();
        m.play_track("space_ambient_1", &mut bus);
        m.play_track("space_ambient_1", &mut bus);
        m.play_track("tech_nebula", &mut bus);
        let got: Vec<_> = sub.drain().collect();
        assert_eq!(
            got,
            vec![
                GalaxyEvent::MusicPlay { track: "space_ambient_1".into() },
                GalaxyEvent::MusicStop,
                GalaxyEvent::MusicPlay { track: "tech_nebula".into() },
            ]
        );
    }

    #[test]
    fn test_paused_track_can_be_restarted() {
        let mut bus = EventBus::new();
        let mut m = MusicStore::default();
        m.play_track("action_1", &mut bus);
        m.pause(&mut bus);
        let sub = bus.subscribe(&[EventKind::MusicPlay]);
        m.play_track("action_1", &mut bus);
        assert!(m.is_playing());
        assert_eq!(sub.pending(), 1);
    }

    #[test]
    fn test_next_previous_wrap() {
        let mut bus = EventBus::new();
        let mut m = MusicStore::default();
        m.next_track(&mut bus);
        assert_eq!(m.current_track().map(|t| t.id), Some("space_ambient_1"));
        m.previous_track(&mut bus);
        assert_eq!(m.current_track().map(|t| t.id), Some("menu_theme"));
        m.next_track(&mut bus);
        assert_eq!(m.current_track().map(|t| t.id), Some("space_ambient_1"));

        let mut idle = MusicStore::default();
        idle.previous_track(&mut bus);
        assert_eq!(idle.current_track().map(|t| t.id), Some("menu_theme"));
    }

    #[test]
    fn test_volume_clamped() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::MusicVolume]);
        let mut m = MusicStore::default();
        m.set_volume(1.7, &mut bus);
        assert_eq!(m.volume(), 1.0);
        m.set_volume(-0.3, &mut bus);
        assert_eq!(m.volume(), 0.0);
        assert_eq!(sub.drain().last(), Some(GalaxyEvent::MusicVolume(0.0)));
    }

    #[test]
    fn test_toggle_playback_and_mute() {
        let mut bus = EventBus::new();
        let mut m = MusicStore::default();
        m.play_track("space_ambient_2", &mut bus);
        m.toggle_playback(&mut bus);
        assert!(!m.is_playing());
        m.toggle_playback(&mut bus);
        assert!(m.is_playing());
        m.toggle_mute(&mut bus);
        assert!(m.is_muted());
    }

    #[test]
    fn test_preferences_persist() {
        let mut bus = EventBus::new();
        let mut backend = MemoryStateStore::new();
        let mut m = MusicStore::default();
        m.play_track("career_cosmos", &mut bus);
        m.set_volume(0.8, &mut bus);
        m.toggle_mute(&mut bus);
        m.save(&mut backend).unwrap();

        let back = MusicStore::load(&backend, 0.5);
        assert_eq!(back.current_track().map(|t| t.id), Some("career_cosmos"));
        assert_eq!(back.volume(), 0.8);
        assert!(back.is_muted());
        assert!(!back.is_playing());
    }
}
