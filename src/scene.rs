//! Scene population.
//!
//! Bodies are created once, at startup, with random positions inside the
//! configured volume and random phases. Nothing is re-rolled afterwards.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::FieldPhysicsBackend;
use crate::body::{BodyAppearance, FloatingBodyBundle, PhaseOffsets};
use crate::config::SceneConfig;
use crate::trigger::TriggerCounter;

/// Colours handed out to bodies, with the rotating accent index.
#[derive(Resource, Debug, Clone)]
pub struct AccentPalette {
    base: BodyAppearance,
    accents: Vec<Color>,
    next: usize,
}

impl Default for AccentPalette {
    fn default() -> Self {
        Self::new(
            BodyAppearance::default(),
            vec![
                Color::srgb(0.27, 0.42, 1.0),
                Color::srgb(1.0, 0.33, 0.55),
                Color::srgb(0.15, 0.9, 0.65),
            ],
        )
    }
}

impl AccentPalette {
    pub fn new(base: BodyAppearance, accents: Vec<Color>) -> Self {
        Self {
            base,
            accents,
            next: 0,
        }
    }

    /// Next accent colour, cycling. `None` if the palette has no accents.
    pub fn next_accent(&mut self) -> Option<Color> {
        if self.accents.is_empty() {
            return None;
        }
        let color = self.accents[self.next % self.accents.len()];
        self.next = (self.next + 1) % self.accents.len();
        Some(color)
    }

    /// Appearance for the `index`-th body: every `accent_every`-th body gets
    /// an accent colour, the rest the base look.
    pub fn appearance_for(&mut self, index: usize, accent_every: usize) -> BodyAppearance {
        if accent_every == 0 || index % accent_every != 0 {
            return self.base;
        }
        match self.next_accent() {
            Some(color) => self.base.with_color(color),
            None => self.base,
        }
    }
}

/// Initial state of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySeed {
    pub position: Vec3,
    pub phase: PhaseOffsets,
    pub appearance: BodyAppearance,
}

/// Random source for scene population.
pub struct SceneSeeder {
    rng: StdRng,
}

impl SceneSeeder {
    /// Deterministic with `Some(seed)`, seeded from the thread RNG otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    /// Uniform point inside the box `[-spread, spread]`.
    pub fn position(&mut self, spread: Vec3) -> Vec3 {
        let spread = spread.abs();
        Vec3::new(
            self.rng.random_range(-spread.x..=spread.x),
            self.rng.random_range(-spread.y..=spread.y),
            self.rng.random_range(-spread.z..=spread.z),
        )
    }

    /// Seeds for a whole scene.
    pub fn seeds(&mut self, config: &SceneConfig, palette: &mut AccentPalette) -> Vec<BodySeed> {
        (0..config.body_count)
            .map(|index| BodySeed {
                position: self.position(config.spread),
                phase: PhaseOffsets::random(&mut self.rng),
                appearance: palette.appearance_for(index, config.accent_every),
            })
            .collect()
    }
}

/// Startup system: spawn the scene's bodies.
pub fn populate_scene<B: FieldPhysicsBackend>(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut palette: ResMut<AccentPalette>,
    counter: Option<Res<TriggerCounter>>,
) {
    let trigger_count = counter.map(|c| c.count()).unwrap_or(0);
    let seeds = SceneSeeder::new(config.seed).seeds(&config, &mut palette);

    for seed in &seeds {
        let mut entity = commands.spawn((
            Name::new("Floating body"),
            Transform::from_translation(seed.position),
            FloatingBodyBundle::new(seed.phase, trigger_count).with_appearance(seed.appearance),
        ));
        B::insert_body_physics(&mut entity, config.body_radius);
    }

    info!(
        count = seeds.len(),
        seeded = config.seed.is_some(),
        "floating field scene populated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_scene() {
        let config = SceneConfig::default().with_seed(42);
        let a = SceneSeeder::new(config.seed).seeds(&config, &mut AccentPalette::default());
        let b = SceneSeeder::new(config.seed).seeds(&config, &mut AccentPalette::default());
        assert_eq!(a, b);
        assert_eq!(a.len(), config.body_count);
    }

    #[test]
    fn different_seeds_differ() {
        let config = SceneConfig::default();
        let a = SceneSeeder::new(Some(1)).seeds(&config, &mut AccentPalette::default());
        let b = SceneSeeder::new(Some(2)).seeds(&config, &mut AccentPalette::default());
        assert_ne!(a, b);
    }

    #[test]
    fn positions_stay_in_volume() {
        let spread = Vec3::new(4.0, 3.0, 0.0);
        let mut seeder = SceneSeeder::new(Some(9));
        for _ in 0..500 {
            let p = seeder.position(spread);
            assert!(p.x.abs() <= 4.0 && p.y.abs() <= 3.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn accents_rotate_every_nth_body() {
        let mut palette = AccentPalette::default();
        let base = BodyAppearance::default();
        let looks: Vec<BodyAppearance> = (0..7).map(|i| palette.appearance_for(i, 3)).collect();

        assert_ne!(looks[0], base);
        assert_eq!(looks[1], base);
        assert_eq!(looks[2], base);
        assert_ne!(looks[3], base);
        assert_ne!(looks[0].color, looks[3].color);
        assert_ne!(looks[6].color, looks[3].color);
    }

    #[test]
    fn palettes_are_independent() {
        let mut a = AccentPalette::default();
        let mut b = AccentPalette::default();
        let first_a = a.next_accent();
        a.next_accent();
        assert_eq!(b.next_accent(), first_a);
    }

    #[test]
    fn no_accents_keeps_base() {
        let mut palette = AccentPalette::new(BodyAppearance::default(), Vec::new());
        assert_eq!(palette.appearance_for(0, 1), BodyAppearance::default());
    }
}
