use std::f32::consts::PI;

use glam::Vec3;
use starfolio_events::PlanetId;
use starfolio_math::Transform;
use tracing::info;

use crate::orbit::Orbit;
use crate::theme::{PlanetTheme, theme_for};

/// Static description of one catalog planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSpec {
    pub id: &'static str,
    pub orbit_radius: f32,
    pub size: f32,
    /// Starting orbit angle in radians.
    pub angle: f32,
}

pub const CATALOG: [PlanetSpec; 5] = [
    PlanetSpec {
        id: "origin-station",
        orbit_radius: 9.0,
        size: 2.5,
        angle: 0.0,
    },
    PlanetSpec {
        id: "tech-nebula",
        orbit_radius: 14.0,
        size: 2.2,
        angle: PI * 0.5,
    },
    PlanetSpec {
        id: "project-galaxy",
        orbit_radius: 19.0,
        size: 2.4,
        angle: PI * 0.95,
    },
    PlanetSpec {
        id: "career-cosmos",
        orbit_radius: 24.0,
        size: 2.0,
        angle: PI * 1.4,
    },
    PlanetSpec {
        id: "achievement-sphere",
        orbit_radius: 28.0,
        size: 1.9,
        angle: PI * 1.8,
    },
];

pub const SECRET_PLANET: &str = "secret-planet-x";
pub const SECRET_PLANET_POSITION: Vec3 = Vec3::new(-40.0, 8.0, -50.0);
const SECRET_PLANET_SIZE: f32 = 2.2;

/// A live planet in the session.
#[derive(Debug, Clone)]
pub struct PlanetRef {
    pub id: PlanetId,
    pub transform: Transform,
    pub size: f32,
    pub theme: &'static PlanetTheme,
    /// `None` for planets parked at a fixed position.
    pub orbit: Option<Orbit>,
}

impl PlanetRef {
    fn from_spec(spec: &PlanetSpec, orbit_speed: f32) -> Self {
        let orbit = Orbit::new(spec.orbit_radius, spec.angle, orbit_speed);
        Self {
            id: PlanetId::new(spec.id),
            transform: Transform::from_position(orbit.position()),
            size: spec.size,
            theme: theme_for(spec.id),
            orbit: Some(orbit),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// Every planet of the session, in catalog order. Planets are never removed.
#[derive(Debug, Clone)]
pub struct PlanetSystem {
    planets: Vec<PlanetRef>,
}

impl PlanetSystem {
    pub fn new(orbit_speed: f32) -> Self {
        Self {
            planets: CATALOG
                .iter()
                .map(|spec| PlanetRef::from_spec(spec, orbit_speed))
                .collect(),
        }
    }

    /// Append planet X. Returns false if it is already present.
    pub fn unlock_secret_planet(&mut self) -> bool {
        if self.get(SECRET_PLANET).is_some() {
            return false;
        }
        info!("secret planet revealed");
        self.planets.push(PlanetRef {
            id: PlanetId::new(SECRET_PLANET),
            transform: Transform::from_position(SECRET_PLANET_POSITION),
            size: SECRET_PLANET_SIZE,
            theme: theme_for(SECRET_PLANET),
            orbit: None,
        });
        true
    }

    /// Step every orbit and refresh the transforms.
    pub fn update(&mut self, dt: f32) {
        for planet in &mut self.planets {
            if let Some(orbit) = planet.orbit.as_mut() {
                orbit.advance(dt);
                planet.transform.position = orbit.position();
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PlanetRef> {
        self.planets.iter().find(|p| p.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetRef> {
        self.planets.iter()
    }

    pub fn as_slice(&self) -> &[PlanetRef] {
        &self.planets
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Number of regular catalog planets, excluding planet X.
    pub fn catalog_len(&self) -> usize {
        CATALOG.len()
    }
}
