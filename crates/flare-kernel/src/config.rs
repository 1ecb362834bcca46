//! Effect configuration.
//!
//! Effects can be described in TOML and built into a [`ParticleEffect`].
//! Every table is optional and falls back to defaults, except that each
//! emitter needs a `profile`.
//!
//! ```toml
//! name = "sparks"
//! parallel = false
//!
//! [[emitters]]
//! capacity = 2000
//! term = 1.5
//! profile = { shape = "spray", direction = [0.0, 1.0], spread = 0.6 }
//!
//! [emitters.parameters]
//! quantity = { min = 10, max = 20 }
//! speed = { min = 50.0, max = 120.0 }
//!
//! [[emitters.modifiers]]
//! type = "linear_gravity"
//! frequency = 60.0
//! direction = [0.0, -1.0]
//! strength = 90.0
//!
//! [[emitters.modifiers]]
//! type = "opacity_fast_fade"
//! ```

use std::fs;
use std::path::Path;

use flare_common::{ConfigError, FlareError, FlareResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::effect::ParticleEffect;
use crate::emitter::{Emitter, EmitterBuilder, ReclaimPolicy, DEFAULT_RECLAIM_FREQUENCY};
use crate::modifier::{
    AgeModifier, ColourInterpolator, ContainerModifier, DampingModifier, DragModifier,
    ExecutionStrategy, HueInterpolator, LinearGravityModifier, Modifier, MoveModifier,
    OpacityFastFadeModifier, OpacityInterpolator, RadialGravityModifier, RotationModifier,
    ScaleInterpolator, VelocityColourModifier, VelocityHueModifier, VortexModifier,
    DEFAULT_FREQUENCY,
};
use crate::profile::Profile;
use crate::release::ReleaseParameters;
use crate::render::RenderingOrder;

/// Serializable description of a built-in modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModifierConfig {
    /// See [`AgeModifier`]
    Age,
    /// See [`MoveModifier`]
    Move,
    /// See [`RotationModifier`]
    Rotation(RotationModifier),
    /// See [`LinearGravityModifier`]
    LinearGravity(LinearGravityModifier),
    /// See [`RadialGravityModifier`]
    RadialGravity(RadialGravityModifier),
    /// See [`VortexModifier`]
    Vortex(VortexModifier),
    /// See [`DragModifier`]
    Drag(DragModifier),
    /// See [`DampingModifier`]
    Damping(DampingModifier),
    /// See [`ContainerModifier`]
    Container(ContainerModifier),
    /// See [`ColourInterpolator`]
    ColourInterpolator(ColourInterpolator),
    /// See [`HueInterpolator`]
    HueInterpolator(HueInterpolator),
    /// See [`OpacityInterpolator`]
    OpacityInterpolator(OpacityInterpolator),
    /// See [`ScaleInterpolator`]
    ScaleInterpolator(ScaleInterpolator),
    /// See [`OpacityFastFadeModifier`]
    OpacityFastFade,
    /// See [`VelocityColourModifier`]
    VelocityColour(VelocityColourModifier),
    /// See [`VelocityHueModifier`]
    VelocityHue(VelocityHueModifier),
}

impl ModifierConfig {
    /// Instantiates the modifier.
    #[must_use]
    pub fn to_modifier(&self) -> Box<dyn Modifier> {
        match *self {
            Self::Age => Box::new(AgeModifier),
            Self::Move => Box::new(MoveModifier),
            Self::Rotation(m) => Box::new(m),
            Self::LinearGravity(m) => Box::new(m),
            Self::RadialGravity(m) => Box::new(m),
            Self::Vortex(m) => Box::new(m),
            Self::Drag(m) => Box::new(m),
            Self::Damping(m) => Box::new(m),
            Self::Container(m) => Box::new(m),
            Self::ColourInterpolator(m) => Box::new(m),
            Self::HueInterpolator(m) => Box::new(m),
            Self::OpacityInterpolator(m) => Box::new(m),
            Self::ScaleInterpolator(m) => Box::new(m),
            Self::OpacityFastFade => Box::new(OpacityFastFadeModifier),
            Self::VelocityColour(m) => Box::new(m),
            Self::VelocityHue(m) => Box::new(m),
        }
    }
}

/// A modifier and the frequency it runs at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierEntry {
    /// Update frequency in Hz
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    /// The modifier itself
    #[serde(flatten)]
    pub modifier: ModifierConfig,
}

fn default_frequency() -> f32 {
    DEFAULT_FREQUENCY
}

impl ModifierEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(modifier: ModifierConfig, frequency: f32) -> Self {
        Self {
            frequency,
            modifier,
        }
    }
}

/// Serializable description of one emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Display name
    pub name: Option<String>,
    /// Maximum number of live particles
    pub capacity: usize,
    /// Particle lifetime in seconds
    pub term: f32,
    /// Seed for the emitter's random source
    pub seed: Option<i64>,
    /// How often expired particles are reclaimed, in Hz
    pub reclaim_frequency: f32,
    /// How expired particles are reclaimed
    pub reclaim_policy: ReclaimPolicy,
    /// Modifier execution strategy
    pub execution: ExecutionStrategy,
    /// Order particles are handed to renderers
    pub rendering_order: RenderingOrder,
    /// Texture renderers should draw with
    pub texture_key: Option<String>,
    /// Emission profile; required
    pub profile: Option<Profile>,
    /// Release parameters
    pub parameters: ReleaseParameters,
    /// Modifier pipeline in execution order
    pub modifiers: Vec<ModifierEntry>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            name: None,
            capacity: 1000,
            term: 1.0,
            seed: None,
            reclaim_frequency: DEFAULT_RECLAIM_FREQUENCY,
            reclaim_policy: ReclaimPolicy::default(),
            execution: ExecutionStrategy::default(),
            rendering_order: RenderingOrder::default(),
            texture_key: None,
            profile: None,
            parameters: ReleaseParameters::default(),
            modifiers: Vec::new(),
        }
    }
}

impl EmitterConfig {
    /// Validates the configuration and builds the emitter.
    pub fn build(&self) -> Result<Emitter, ConfigError> {
        let profile = self.profile.ok_or(ConfigError::MissingProfile)?;

        let mut builder = EmitterBuilder::new(self.capacity, self.term)
            .profile(profile)
            .parameters(self.parameters)
            .reclaim_frequency(self.reclaim_frequency)
            .reclaim_policy(self.reclaim_policy)
            .execution(self.execution)
            .rendering_order(self.rendering_order);

        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(key) = &self.texture_key {
            builder = builder.texture_key(key.clone());
        }
        for entry in &self.modifiers {
            builder = builder.boxed_modifier(entry.modifier.to_modifier(), entry.frequency);
        }

        builder.build()
    }
}

/// Serializable description of a particle effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Effect name
    pub name: String,
    /// Update emitters concurrently
    pub parallel: bool,
    /// Emitters in trigger order
    pub emitters: Vec<EmitterConfig>,
}

impl EffectConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(contents: &str) -> FlareResult<Self> {
        toml::from_str(contents).map_err(|e| FlareError::Parse(e.to_string()))
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> FlareResult<String> {
        toml::to_string_pretty(self).map_err(|e| FlareError::Parse(e.to_string()))
    }

    /// Loads a configuration file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> FlareResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded effect config from {}", path.display());
        Ok(config)
    }

    /// Loads a configuration file, falling back to defaults when it is
    /// missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load effect config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Saves the configuration, creating parent directories as needed.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> FlareResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml_string()?)?;
        info!("Saved effect config to {}", path.display());
        Ok(())
    }

    /// Validates every emitter and builds the effect.
    pub fn build(&self) -> FlareResult<ParticleEffect> {
        let emitters = self
            .emitters
            .iter()
            .map(EmitterConfig::build)
            .collect::<Result<Vec<_>, _>>()?;

        let mut effect = ParticleEffect::with_emitters(self.name.clone(), emitters);
        effect.set_parallel(self.parallel);
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_common::{Axis, Coordinate, Range};
    use tempfile::TempDir;

    const SPARKS: &str = r#"
name = "sparks"

[[emitters]]
name = "core"
capacity = 200
term = 1.5
seed = 7
texture_key = "spark"
rendering_order = "back_to_front"
profile = { shape = "spray", direction = [0.0, 1.0], spread = 0.6 }

[emitters.parameters]
quantity = { min = 10, max = 20 }
speed = { min = 50.0, max = 120.0 }

[[emitters.modifiers]]
type = "linear_gravity"
frequency = 30.0
direction = [0.0, -1.0]
strength = 90.0

[[emitters.modifiers]]
type = "drag"

[[emitters.modifiers]]
type = "opacity_fast_fade"
"#;

    #[test]
    fn test_parse_example() {
        let config = EffectConfig::from_toml_str(SPARKS).expect("parse config");
        assert_eq!(config.name, "sparks");
        assert!(!config.parallel);

        let emitter = &config.emitters[0];
        assert_eq!(emitter.capacity, 200);
        assert_eq!(emitter.seed, Some(7));
        assert_eq!(emitter.reclaim_frequency, DEFAULT_RECLAIM_FREQUENCY);
        assert_eq!(emitter.rendering_order, RenderingOrder::BackToFront);
        assert_eq!(emitter.profile, Some(Profile::spray(Axis::UP, 0.6)));
        assert_eq!(emitter.parameters.quantity, Range::new(10, 20));
        assert_eq!(emitter.parameters.mass, Range::constant(1.0));

        assert_eq!(emitter.modifiers.len(), 3);
        assert_eq!(
            emitter.modifiers[0],
            ModifierEntry::new(
                ModifierConfig::LinearGravity(LinearGravityModifier::new(Axis::DOWN, 90.0)),
                30.0
            )
        );
        assert_eq!(
            emitter.modifiers[1],
            ModifierEntry::new(ModifierConfig::Drag(DragModifier::default()), DEFAULT_FREQUENCY)
        );
        assert_eq!(emitter.modifiers[2].modifier, ModifierConfig::OpacityFastFade);
    }

    #[test]
    fn test_build_effect() {
        let mut effect = EffectConfig::from_toml_str(SPARKS)
            .and_then(|c| c.build())
            .expect("build effect");

        assert_eq!(effect.name(), "sparks");
        let emitter = &effect.emitters()[0];
        assert_eq!(emitter.name(), "core");
        assert_eq!(emitter.capacity(), 200);
        assert_eq!(emitter.texture_key(), Some("spark"));
        assert_eq!(emitter.modifiers().len(), 3);

        let released = effect.trigger(Coordinate::ORIGIN);
        assert!((10..=20).contains(&released));
        effect.update(1.0 / 60.0);
        assert_eq!(effect.active_particle_count(), released);
    }

    #[test]
    fn test_missing_profile_is_config_error() {
        let config = EffectConfig::from_toml_str("[[emitters]]\ncapacity = 10\n").expect("parse");
        assert!(matches!(
            config.build(),
            Err(FlareError::Config(ConfigError::MissingProfile))
        ));
    }

    #[test]
    fn test_invalid_values_rejected_at_build() {
        let config = EffectConfig::from_toml_str(
            "[[emitters]]\nterm = -1.0\nprofile = { shape = \"point\" }\n",
        )
        .expect("parse");
        assert!(matches!(
            config.build(),
            Err(FlareError::Config(ConfigError::NonPositiveTerm(_)))
        ));

        let config = EffectConfig::from_toml_str(
            "[[emitters]]\nprofile = { shape = \"point\" }\n\
             [[emitters.modifiers]]\ntype = \"damping\"\nfrequency = 0.0\ncoefficient = 1.0\n",
        )
        .expect("parse");
        assert!(matches!(
            config.build(),
            Err(FlareError::Config(ConfigError::NonPositiveFrequency(_)))
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = EffectConfig::from_toml_str("[[emitters]\n");
        assert!(matches!(result, Err(FlareError::Parse(_))));

        let result = EffectConfig::from_toml_str(
            "[[emitters]]\n[[emitters.modifiers]]\ntype = \"teleport\"\n",
        );
        assert!(matches!(result, Err(FlareError::Parse(_))));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("effects").join("burst.toml");

        let mut config = EffectConfig {
            name: "burst".to_string(),
            parallel: true,
            emitters: vec![EmitterConfig {
                profile: Some(Profile::ring(12.0, true)),
                reclaim_policy: ReclaimPolicy::Compacting,
                execution: ExecutionStrategy::Parallel,
                ..EmitterConfig::default()
            }],
        };
        config.emitters[0].modifiers.push(ModifierEntry::new(
            ModifierConfig::Container(ContainerModifier::new(
                Coordinate::new(1.0, 2.0),
                50.0,
                30.0,
            )),
            20.0,
        ));
        config.emitters[0].modifiers.push(ModifierEntry::new(ModifierConfig::Age, 10.0));

        config.save_to(&path).expect("Failed to save config");
        let loaded = EffectConfig::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EffectConfig::load_from("/nonexistent/path/effect.toml");
        assert!(matches!(result, Err(FlareError::Io(_))));

        let config = EffectConfig::load_or_default("/nonexistent/path/effect.toml");
        assert_eq!(config, EffectConfig::default());
    }

    #[test]
    fn test_every_modifier_instantiates() {
        let configs = [
            ModifierConfig::Age,
            ModifierConfig::Move,
            ModifierConfig::Rotation(RotationModifier::new(1.0)),
            ModifierConfig::RadialGravity(RadialGravityModifier::new(Coordinate::ORIGIN, 5.0, 1.0)),
            ModifierConfig::Vortex(VortexModifier::new(Coordinate::ORIGIN, 1.0)),
            ModifierConfig::Damping(DampingModifier::new(0.1)),
            ModifierConfig::ColourInterpolator(ColourInterpolator::new(
                flare_common::Colour::WHITE,
                flare_common::Colour::BLACK,
            )),
            ModifierConfig::HueInterpolator(HueInterpolator::new(0.0, 90.0)),
            ModifierConfig::OpacityInterpolator(OpacityInterpolator::new(1.0, 0.0)),
            ModifierConfig::ScaleInterpolator(ScaleInterpolator::new(1.0, 2.0)),
            ModifierConfig::VelocityColour(VelocityColourModifier::new(
                flare_common::Colour::BLACK,
                flare_common::Colour::WHITE,
                1.0,
            )),
            ModifierConfig::VelocityHue(VelocityHueModifier::new(0.0, 120.0, 1.0)),
        ];
        let names: Vec<&str> = configs.iter().map(|c| c.to_modifier().name()).collect();
        assert_eq!(
            names,
            vec![
                "age",
                "move",
                "rotation",
                "radial_gravity",
                "vortex",
                "damping",
                "colour_interpolator",
                "hue_interpolator",
                "opacity_interpolator",
                "scale_interpolator",
                "velocity_colour",
                "velocity_hue",
            ]
        );
    }
}
