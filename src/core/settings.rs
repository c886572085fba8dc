//! Vignette configuration loaded from `config/vignette.toml`.
use std::{fmt, fs, io, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/vignette.toml";

/// Errors raised while reading the vignette configuration file.
#[derive(Debug)]
pub enum SettingsError {
    Read(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read settings: {}", err),
            Self::Parse(err) => write!(f, "failed to parse settings: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(value: io::Error) -> Self {
        Self::Read(value)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawVignetteConfig {
    #[serde(default)]
    world: RawWorldSection,
    #[serde(default)]
    input: RawInputSection,
    #[serde(default)]
    player: RawPlayerSection,
    #[serde(default)]
    interaction: RawInteractionSection,
    #[serde(default)]
    dialogue: RawDialogueSection,
    #[serde(default)]
    npc: RawNpcSection,
    #[serde(default = "default_choices")]
    choices: Vec<RawChoice>,
    #[serde(default)]
    petals: RawPetalSection,
    #[serde(default)]
    telemetry: RawTelemetrySection,
}

impl Default for RawVignetteConfig {
    fn default() -> Self {
        Self {
            world: RawWorldSection::default(),
            input: RawInputSection::default(),
            player: RawPlayerSection::default(),
            interaction: RawInteractionSection::default(),
            dialogue: RawDialogueSection::default(),
            npc: RawNpcSection::default(),
            choices: default_choices(),
            petals: RawPetalSection::default(),
            telemetry: RawTelemetrySection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawWorldSection {
    width: f32,
    height: f32,
    clearing_radius: f32,
    clearing_padding_fraction: f32,
    path_height: f32,
    path_overlap_fraction: f32,
}

impl Default for RawWorldSection {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            clearing_radius: 225.0,
            clearing_padding_fraction: 0.1,
            path_height: 72.0,
            path_overlap_fraction: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawInputSection {
    mode: InputModePreference,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayerSection {
    speed: f32,
    size: f32,
    body_offset: [f32; 2],
    spawn_inset: f32,
    arrive_distance: f32,
}

impl Default for RawPlayerSection {
    fn default() -> Self {
        Self {
            speed: 140.0,
            size: 32.0,
            body_offset: [0.0, 0.0],
            spawn_inset: 56.0,
            arrive_distance: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInteractionSection {
    proximity_radius: f32,
    tap_radius: f32,
    prompt_offset: f32,
    prompt_fade_seconds: f32,
}

impl Default for RawInteractionSection {
    fn default() -> Self {
        Self {
            proximity_radius: 80.0,
            tap_radius: 60.0,
            prompt_offset: 28.0,
            prompt_fade_seconds: 0.15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDialogueSection {
    npc_name: String,
    question: String,
    too_close: String,
    success: String,
    npc_char_interval: f32,
    player_char_interval: f32,
    bubble_proximity: f32,
    npc_margin: f32,
    personal_space: f32,
    pop_in_seconds: f32,
    player_bubble_offset: [f32; 2],
}

impl Default for RawDialogueSection {
    fn default() -> Self {
        Self {
            npc_name: "Duch".to_string(),
            question: "Will you be my valentine?".to_string(),
            too_close: "Stop trying to kiss me :*".to_string(),
            success: "Ah, knew you'd say yes <3".to_string(),
            npc_char_interval: 0.045,
            player_char_interval: 0.04,
            bubble_proximity: 160.0,
            npc_margin: 40.0,
            personal_space: 60.0,
            pop_in_seconds: 0.35,
            player_bubble_offset: [0.0, 52.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawNpcSection {
    size: f32,
    gap: f32,
}

impl Default for RawNpcSection {
    fn default() -> Self {
        Self {
            size: 32.0,
            gap: 28.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawChoice {
    label: String,
    offset: [f32; 2],
}

fn default_choices() -> Vec<RawChoice> {
    vec![
        RawChoice {
            label: "Yes".to_string(),
            offset: [50.0, 70.0],
        },
        RawChoice {
            label: "You already said yes".to_string(),
            offset: [50.0, -70.0],
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPetalSection {
    seed: Option<u64>,
    ambient_max: usize,
    ambient_spawn_interval: f32,
    ambient_initial_fill: f32,
    ambient_fall_speed: [f32; 2],
    ambient_size: [f32; 2],
    sway_amplitude: f32,
    sway_frequency: f32,
    burst_count: usize,
    burst_speed: [f32; 2],
    burst_size: [f32; 2],
    burst_lifetime: f32,
    burst_gravity: f32,
    burst_drag: f32,
}

impl Default for RawPetalSection {
    fn default() -> Self {
        Self {
            seed: None,
            ambient_max: 45,
            ambient_spawn_interval: 0.18,
            ambient_initial_fill: 0.7,
            ambient_fall_speed: [18.0, 45.0],
            ambient_size: [3.0, 6.0],
            sway_amplitude: 18.0,
            sway_frequency: 1.3,
            burst_count: 40,
            burst_speed: [80.0, 220.0],
            burst_size: [4.0, 9.0],
            burst_lifetime: 2.0,
            burst_gravity: 40.0,
            burst_drag: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTelemetrySection {
    log_path: String,
    capacity: usize,
}

impl Default for RawTelemetrySection {
    fn default() -> Self {
        Self {
            log_path: "logs/session.jsonl".to_string(),
            capacity: 64,
        }
    }
}

/// Configured preference for how the player commits and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputModePreference {
    #[default]
    Auto,
    Desktop,
    Touch,
}

/// Closed numeric range, always ordered `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanF32 {
    pub min: f32,
    pub max: f32,
}

impl SpanF32 {
    fn from_pair(pair: [f32; 2]) -> Self {
        let (a, b) = (pair[0].max(0.0), pair[1].max(0.0));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Maps a unit value in `[0, 1]` onto the span.
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct WorldSettings {
    pub fallback_size: Vec2,
    pub clearing_radius: f32,
    pub clearing_padding_fraction: f32,
    pub path_height: f32,
    pub path_overlap_fraction: f32,
}

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub speed: f32,
    pub size: f32,
    pub body_offset: Vec2,
    pub spawn_inset: f32,
    pub arrive_distance: f32,
}

#[derive(Debug, Clone)]
pub struct InteractionSettings {
    /// Radii are kept as configured: a non-positive value disables the feature.
    pub proximity_radius: f32,
    pub tap_radius: f32,
    pub prompt_offset: f32,
    pub prompt_fade_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct DialogueSettings {
    pub npc_name: String,
    pub question: String,
    pub too_close: String,
    pub success: String,
    pub npc_char_interval: f32,
    pub player_char_interval: f32,
    pub bubble_proximity: f32,
    pub npc_margin: f32,
    pub personal_space: f32,
    pub pop_in_seconds: f32,
    pub player_bubble_offset: Vec2,
}

#[derive(Debug, Clone)]
pub struct NpcSettings {
    pub size: f32,
    pub gap: f32,
}

/// A choice as configured, positioned relative to the clearing centre.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSpec {
    pub label: String,
    pub offset: Vec2,
}

#[derive(Debug, Clone)]
pub struct PetalSettings {
    pub seed: Option<u64>,
    pub ambient_max: usize,
    pub ambient_spawn_interval: f32,
    pub ambient_initial_fill: f32,
    pub ambient_fall_speed: SpanF32,
    pub ambient_size: SpanF32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub burst_count: usize,
    pub burst_speed: SpanF32,
    pub burst_size: SpanF32,
    pub burst_lifetime: f32,
    pub burst_gravity: f32,
    pub burst_drag: f32,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub log_path: String,
    pub capacity: usize,
}

/// Every tunable of the vignette, resolved once at startup.
#[derive(Resource, Debug, Clone)]
pub struct VignetteSettings {
    pub world: WorldSettings,
    pub input_mode: InputModePreference,
    pub player: PlayerSettings,
    pub interaction: InteractionSettings,
    pub dialogue: DialogueSettings,
    pub npc: NpcSettings,
    pub choices: Vec<ChoiceSpec>,
    pub petals: PetalSettings,
    pub telemetry: TelemetrySettings,
}

impl VignetteSettings {
    pub fn load_or_default() -> Self {
        match Self::load_from(CONFIG_PATH) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("{} ({}). Falling back to defaults.", err, CONFIG_PATH);
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, SettingsError> {
        let raw = toml::from_str::<RawVignetteConfig>(data)?;
        Ok(raw.into())
    }

    /// Whether proximity-gated choices can ever become interactable.
    pub fn choices_enabled(&self) -> bool {
        radius_enabled(self.interaction.proximity_radius) && !self.choices.is_empty()
    }
}

impl Default for VignetteSettings {
    fn default() -> Self {
        RawVignetteConfig::default().into()
    }
}

/// Radii that are non-positive or non-finite switch their feature off.
pub fn radius_enabled(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl From<RawVignetteConfig> for VignetteSettings {
    fn from(value: RawVignetteConfig) -> Self {
        let world = value.world;
        let player = value.player;
        let interaction = value.interaction;
        let dialogue = value.dialogue;
        let petals = value.petals;

        Self {
            world: WorldSettings {
                fallback_size: Vec2::new(world.width.max(1.0), world.height.max(1.0)),
                clearing_radius: non_negative(world.clearing_radius),
                clearing_padding_fraction: world.clearing_padding_fraction.clamp(0.0, 0.5),
                path_height: non_negative(world.path_height),
                path_overlap_fraction: world.path_overlap_fraction.clamp(0.0, 1.0),
            },
            input_mode: value.input.mode,
            player: PlayerSettings {
                speed: non_negative(player.speed),
                size: player.size.max(1.0),
                body_offset: Vec2::from(player.body_offset),
                spawn_inset: non_negative(player.spawn_inset),
                arrive_distance: non_negative(player.arrive_distance),
            },
            interaction: InteractionSettings {
                proximity_radius: interaction.proximity_radius,
                tap_radius: interaction.tap_radius,
                prompt_offset: interaction.prompt_offset,
                prompt_fade_seconds: non_negative(interaction.prompt_fade_seconds),
            },
            dialogue: DialogueSettings {
                npc_name: dialogue.npc_name,
                question: dialogue.question,
                too_close: dialogue.too_close,
                success: dialogue.success,
                npc_char_interval: non_negative(dialogue.npc_char_interval),
                player_char_interval: non_negative(dialogue.player_char_interval),
                bubble_proximity: dialogue.bubble_proximity,
                npc_margin: non_negative(dialogue.npc_margin),
                personal_space: dialogue.personal_space,
                pop_in_seconds: non_negative(dialogue.pop_in_seconds),
                player_bubble_offset: Vec2::from(dialogue.player_bubble_offset),
            },
            npc: NpcSettings {
                size: value.npc.size.max(1.0),
                gap: non_negative(value.npc.gap),
            },
            choices: value
                .choices
                .into_iter()
                .map(|choice| ChoiceSpec {
                    label: choice.label,
                    offset: Vec2::from(choice.offset),
                })
                .collect(),
            petals: PetalSettings {
                seed: petals.seed,
                ambient_max: petals.ambient_max,
                ambient_spawn_interval: non_negative(petals.ambient_spawn_interval),
                ambient_initial_fill: petals.ambient_initial_fill.clamp(0.0, 1.0),
                ambient_fall_speed: SpanF32::from_pair(petals.ambient_fall_speed),
                ambient_size: SpanF32::from_pair(petals.ambient_size),
                sway_amplitude: non_negative(petals.sway_amplitude),
                sway_frequency: non_negative(petals.sway_frequency),
                burst_count: petals.burst_count,
                burst_speed: SpanF32::from_pair(petals.burst_speed),
                burst_size: SpanF32::from_pair(petals.burst_size),
                burst_lifetime: non_negative(petals.burst_lifetime),
                burst_gravity: petals.burst_gravity,
                burst_drag: non_negative(petals.burst_drag),
            },
            telemetry: TelemetrySettings {
                log_path: value.telemetry.log_path,
                capacity: value.telemetry.capacity.max(1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = VignetteSettings::from_toml_str("").expect("empty toml is valid");

        assert_eq!(settings.interaction.proximity_radius, 80.0);
        assert_eq!(settings.interaction.tap_radius, 60.0);
        assert_eq!(settings.choices.len(), 2);
        assert_eq!(settings.choices[0].label, "Yes");
        assert_eq!(settings.petals.burst_count, 40);
        assert_eq!(settings.input_mode, InputModePreference::Auto);
        assert!(settings.choices_enabled());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = VignetteSettings::from_toml_str(
            r#"
            [interaction]
            proximity_radius = 120.0

            [input]
            mode = "touch"

            [petals]
            ambient_fall_speed = [50.0, 10.0]
            "#,
        )
        .expect("valid toml");

        assert_eq!(settings.interaction.proximity_radius, 120.0);
        assert_eq!(settings.interaction.tap_radius, 60.0);
        assert_eq!(settings.input_mode, InputModePreference::Touch);
        assert_eq!(settings.petals.ambient_fall_speed.min, 10.0);
        assert_eq!(settings.petals.ambient_fall_speed.max, 50.0);
    }

    #[test]
    fn explicit_choices_replace_the_default_pair() {
        let settings = VignetteSettings::from_toml_str(
            r#"
            [[choices]]
            label = "Tulip"
            offset = [10.0, 0.0]

            [[choices]]
            label = "Lily"
            offset = [10.0, 40.0]

            [[choices]]
            label = "Daisy"
            offset = [10.0, -40.0]
            "#,
        )
        .expect("valid toml");

        let labels: Vec<_> = settings.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Tulip", "Lily", "Daisy"]);
        assert_eq!(settings.choices[2].offset, Vec2::new(10.0, -40.0));
    }

    #[test]
    fn non_positive_radius_disables_choices() {
        let settings = VignetteSettings::from_toml_str(
            r#"
            [interaction]
            proximity_radius = -5.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(settings.interaction.proximity_radius, -5.0);
        assert!(!settings.choices_enabled());

        let empty = VignetteSettings::from_toml_str("choices = []").expect("valid toml");
        assert!(empty.choices.is_empty());
        assert!(!empty.choices_enabled());
    }

    #[test]
    fn malformed_documents_report_parse_errors() {
        let err = VignetteSettings::from_toml_str("[interaction\nproximity_radius = 1")
            .expect_err("broken table header");
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse settings"));

        let missing = VignetteSettings::load_from("config/does-not-exist.toml")
            .expect_err("missing file");
        assert!(matches!(missing, SettingsError::Read(_)));
    }

    #[test]
    fn span_lerp_clamps_unit_input() {
        let span = SpanF32::from_pair([4.0, 9.0]);
        assert_eq!(span.lerp(0.0), 4.0);
        assert_eq!(span.lerp(1.0), 9.0);
        assert_eq!(span.lerp(2.0), 9.0);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = VignetteSettings::from_toml_str(include_str!("../../config/vignette.toml"))
            .expect("shipped config parses");
        let defaults = VignetteSettings::default();

        assert_eq!(shipped.choices, defaults.choices);
        assert_eq!(shipped.input_mode, defaults.input_mode);
        assert_eq!(
            shipped.interaction.proximity_radius,
            defaults.interaction.proximity_radius
        );
        assert_eq!(shipped.dialogue.question, defaults.dialogue.question);
        assert_eq!(shipped.petals.seed, None);
        assert_eq!(shipped.petals.ambient_max, defaults.petals.ambient_max);
        assert_eq!(shipped.telemetry.log_path, defaults.telemetry.log_path);
    }
}
