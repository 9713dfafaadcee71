//! The portfolio planets: static catalog, orbit motion, visual themes and the
//! polled proximity detector.

mod catalog;
mod orbit;
mod proximity;
mod theme;

pub use catalog::{CATALOG, PlanetRef, PlanetSpec, PlanetSystem, SECRET_PLANET, SECRET_PLANET_POSITION};
pub use orbit::Orbit;
pub use proximity::{ProximityDetector, nearest_planet};
pub use starfolio_events::PlanetId;
pub use theme::{PlanetTheme, theme_for};
