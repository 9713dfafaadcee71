/// Colors, icon and music of a planet's cinematic overlays and interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanetTheme {
    pub planet: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Track played on arrival.
    pub music_track: &'static str,
}

const THEMES: [PlanetTheme; 6] = [
    PlanetTheme {
        planet: "origin-station",
        color: "#1577a1",
        bg_color: "#0a1628",
        icon: "🛰️",
        label: "ORIGIN STATION",
        description: "About Me",
        music_track: "origin_station",
    },
    PlanetTheme {
        planet: "tech-nebula",
        color: "#7c3aed",
        bg_color: "#1a0f2e",
        icon: "⚡",
        label: "TECH NEBULA",
        description: "Skills & Technology",
        music_track: "tech_nebula",
    },
    PlanetTheme {
        planet: "project-galaxy",
        color: "#fb923c",
        bg_color: "#2d1810",
        icon: "🚀",
        label: "PROJECT GALAXY",
        description: "Featured Projects",
        music_track: "project_galaxy",
    },
    PlanetTheme {
        planet: "career-cosmos",
        color: "#34d399",
        bg_color: "#0a2e1e",
        icon: "💼",
        label: "CAREER COSMOS",
        description: "Experience & Education",
        music_track: "career_cosmos",
    },
    PlanetTheme {
        planet: "achievement-sphere",
        color: "#f59e0b",
        bg_color: "#2d1f0a",
        icon: "🎯",
        label: "ACHIEVEMENT SPHERE",
        description: "Certifications & Awards",
        music_track: "achievement_sphere",
    },
    PlanetTheme {
        planet: "secret-planet-x",
        color: "#fbbf24",
        bg_color: "#1a0a2e",
        icon: "🌑",
        label: "PLANET X",
        description: "Classified",
        music_track: "space_ambient_2",
    },
];

/// Theme for `planet`; unknown planets get the origin station's.
pub fn theme_for(planet: &str) -> &'static PlanetTheme {
    THEMES
        .iter()
        .find(|t| t.planet == planet)
        .unwrap_or(&THEMES[0])
}
