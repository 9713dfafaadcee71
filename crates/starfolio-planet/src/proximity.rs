use glam::Vec3;
use starfolio_events::{EventBus, GalaxyEvent, PlanetId};
use starfolio_math::Ticker;
use tracing::debug;

use crate::catalog::PlanetRef;

/// Nearest planet whose distance to `position` is below `size * threshold_factor`.
///
/// Exact ties keep the planet that comes first in `planets`.
pub fn nearest_planet<'a>(
    position: Vec3,
    planets: &'a [PlanetRef],
    threshold_factor: f32,
) -> Option<&'a PlanetRef> {
    let mut best: Option<(&PlanetRef, f32)> = None;
    for planet in planets {
        let distance = position.distance(planet.position());
        if distance >= planet.size * threshold_factor {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((planet, distance)),
        }
    }
    best.map(|(planet, _)| planet)
}

/// Polled distance check between the vehicle and every planet.
#[derive(Debug)]
pub struct ProximityDetector {
    ticker: Ticker,
    threshold_factor: f32,
    current: Option<PlanetId>,
}

impl ProximityDetector {
    pub fn new(poll_interval_ms: u32, threshold_factor: f32) -> Self {
        Self {
            ticker: Ticker::from_millis(poll_interval_ms),
            threshold_factor,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&PlanetId> {
        self.current.as_ref()
    }

    /// Advance the poll clock. On each elapsed interval the nearest planet is
    /// recomputed and `UpdateNearPlanet` is published if it changed.
    /// Returns true when a change was published.
    pub fn poll(
        &mut self,
        dt: f32,
        vehicle_position: Vec3,
        planets: &[PlanetRef],
        bus: &mut EventBus,
    ) -> bool {
        if self.ticker.advance(dt) == 0 {
            return false;
        }
        self.check_now(vehicle_position, planets, bus)
    }

    /// Recompute immediately, outside the poll clock.
    pub fn check_now(
        &mut self,
        vehicle_position: Vec3,
        planets: &[PlanetRef],
        bus: &mut EventBus,
    ) -> bool {
        let nearest = nearest_planet(vehicle_position, planets, self.threshold_factor)
            .map(|p| p.id.clone());
        if nearest == self.current {
            return false;
        }
        debug!(
            from = ?self.current.as_ref().map(PlanetId::as_str),
            to = ?nearest.as_ref().map(PlanetId::as_str),
            "near planet changed"
        );
        self.current = nearest.clone();
        bus.publish(GalaxyEvent::UpdateNearPlanet(nearest));
        true
    }

    /// Forget the current planet without publishing; the next poll reports afresh.
    pub fn reset(&mut self) {
        self.current = None;
        self.ticker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlanetSystem;
    use starfolio_events::EventKind;
    use starfolio_math::Transform;

    fn planet(id: &str, position: Vec3, size: f32) -> PlanetRef {
        PlanetRef {
            id: PlanetId::new(id),
            transform: Transform::from_position(position),
            size,
            theme: crate::theme::theme_for(id),
            orbit: None,
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let planets = [planet("a", Vec3::ZERO, 2.0)];
        assert!(nearest_planet(Vec3::new(6.99, 0.0, 0.0), &planets, 3.5).is_some());
        assert!(nearest_planet(Vec3::new(7.0, 0.0, 0.0), &planets, 3.5).is_none());
    }

    #[test]
    fn test_picks_minimum_distance() {
        let planets = [
            planet("far", Vec3::new(5.0, 0.0, 0.0), 3.0),
            planet("near", Vec3::new(-2.0, 0.0, 0.0), 1.0),
        ];
        let hit = nearest_planet(Vec3::ZERO, &planets, 3.5).unwrap();
        assert_eq!(hit.id.as_str(), "near");
    }

    #[test]
    fn test_exact_tie_keeps_first() {
        let planets = [
            planet("first", Vec3::new(3.0, 0.0, 0.0), 2.0),
            planet("second", Vec3::new(-3.0, 0.0, 0.0), 2.0),
        ];
        let hit = nearest_planet(Vec3::ZERO, &planets, 3.5).unwrap();
        assert_eq!(hit.id.as_str(), "first");
    }

    #[test]
    fn test_polls_on_interval_and_publishes_changes_only() {
        let system = PlanetSystem::new(0.0);
        let mut bus = EventBus::new();
        let sub = bus.subscribe(&[EventKind::UpdateNearPlanet]);
        let mut detector = ProximityDetector::new(100, 3.5);
        let at_origin_station = Vec3::new(9.0, 0.0, 2.0);

        // 50 ms: not yet polled
        assert!(!detector.poll(0.05, at_origin_station, system.as_slice(), &mut bus));
        assert_eq!(sub.pending(), 0);

        assert!(detector.poll(0.06, at_origin_station, system.as_slice(), &mut bus));
        assert_eq!(detector.current().map(PlanetId::as_str), Some("origin-station"));

        // still near the same planet: silent
        assert!(!detector.poll(0.1, at_origin_station, system.as_slice(), &mut bus));

        // drive into deep space
        assert!(detector.poll(0.1, Vec3::new(0.0, 40.0, 0.0), system.as_slice(), &mut bus));
        assert!(detector.current().is_none());

        let events: Vec<_> = sub.drain().collect();
        assert_eq!(
            events,
            vec![
                GalaxyEvent::UpdateNearPlanet(Some(PlanetId::new("origin-station"))),
                GalaxyEvent::UpdateNearPlanet(None),
            ]
        );
    }

    #[test]
    fn test_reset_reports_again() {
        let system = PlanetSystem::new(0.0);
        let mut bus = EventBus::new();
        let mut detector = ProximityDetector::new(100, 3.5);
        let pos = Vec3::new(9.0, 0.0, 0.0);
        assert!(detector.check_now(pos, system.as_slice(), &mut bus));
        detector.reset();
        assert!(detector.check_now(pos, system.as_slice(), &mut bus));
    }
}
