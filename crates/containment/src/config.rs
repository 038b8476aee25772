//! Editor configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file
//! only needs the keys it changes. Durations are written as integer
//! milliseconds.
//!
//! # Defaults
//!
//! | Setting | Default | Range |
//! |---------|---------|-------|
//! | `expand.padding` | 40 | 0-400 |
//! | `expand.min_width` × `expand.min_height` | 300×200 | >= 1 |
//! | `expand.throttle_ms` | 16 | 0-1000 |
//! | `preview.restore_delay_ms` | 100 | 0-5000 |
//! | `exit.overlap_threshold` | 0.5 | 0-1 |
//! | `exit.grace_delay_ms` | 100 | 0-5000 |
//! | `visual.dragging_opacity` | 0.7 | 0.05-1 |

use node::ZLayer;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_PADDING: f32 = 400.0;
const MAX_THROTTLE_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 5_000;
const MIN_OPACITY: f32 = 0.05;

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Auto-expand defaults and pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    pub enabled: bool,
    /// Padding kept between children and the container edge.
    pub padding: f32,
    pub min_width: f32,
    pub min_height: f32,
    /// Minimum spacing between two expansions of one container.
    #[serde(rename = "throttle_ms", with = "duration_ms")]
    pub throttle: Duration,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            padding: 40.0,
            min_width: 300.0,
            min_height: 200.0,
            throttle: Duration::from_millis(16),
        }
    }
}

impl ExpandConfig {
    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, width: f32, height: f32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    #[must_use]
    pub fn validated(mut self) -> Self {
        self.padding = finite_or(self.padding, 40.0).clamp(0.0, MAX_PADDING);
        self.min_width = finite_or(self.min_width, 300.0).max(1.0);
        self.min_height = finite_or(self.min_height, 200.0).max(1.0);
        self.throttle = clamp_ms(self.throttle, MAX_THROTTLE_MS);
        self
    }
}

/// Embedding preview while dragging unparented nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub enabled: bool,
    /// Grace period after a drag ends before uncommitted previews roll back.
    #[serde(rename = "restore_delay_ms", with = "duration_ms")]
    pub restore_delay: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            restore_delay: Duration::from_millis(100),
        }
    }
}

impl PreviewConfig {
    #[must_use]
    pub fn with_restore_delay(mut self, delay: Duration) -> Self {
        self.restore_delay = delay;
        self
    }

    #[must_use]
    pub fn validated(mut self) -> Self {
        self.restore_delay = clamp_ms(self.restore_delay, MAX_DELAY_MS);
        self
    }
}

/// Automatic exit from a container while dragging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    pub enabled: bool,
    /// Below this share of the child's area inside its parent, the child
    /// is considered to be leaving.
    pub overlap_threshold: f32,
    #[serde(rename = "grace_delay_ms", with = "duration_ms")]
    pub grace_delay: Duration,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            overlap_threshold: 0.5,
            grace_delay: Duration::from_millis(100),
        }
    }
}

impl ExitConfig {
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_grace_delay(mut self, delay: Duration) -> Self {
        self.grace_delay = delay;
        self
    }

    #[must_use]
    pub fn validated(mut self) -> Self {
        self.overlap_threshold = finite_or(self.overlap_threshold, 0.5).clamp(0.0, 1.0);
        self.grace_delay = clamp_ms(self.grace_delay, MAX_DELAY_MS);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Attach an unparented node to the container it is dropped on.
    pub embed_on_drop: bool,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            embed_on_drop: true,
        }
    }
}

/// Drag feedback styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub enabled: bool,
    pub dragging_opacity: f32,
    pub dragging_z_index: i32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dragging_opacity: 0.7,
            dragging_z_index: ZLayer::DRAGGING,
        }
    }
}

impl VisualConfig {
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.dragging_opacity = finite_or(self.dragging_opacity, 0.7).clamp(MIN_OPACITY, 1.0);
        self
    }
}

/// Top-level configuration for [`crate::Editor`].
///
/// # Example
///
/// ```
/// use containment::EditorConfig;
/// use std::time::Duration;
///
/// let config = EditorConfig::default()
///     .with_exit(Default::default())
///     .validated();
/// assert_eq!(config.exit.grace_delay, Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub expand: ExpandConfig,
    pub preview: PreviewConfig,
    pub exit: ExitConfig,
    pub drop: DropConfig,
    pub visual: VisualConfig,
}

impl EditorConfig {
    #[must_use]
    pub fn with_expand(mut self, expand: ExpandConfig) -> Self {
        self.expand = expand;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }

    #[must_use]
    pub fn with_exit(mut self, exit: ExitConfig) -> Self {
        self.exit = exit;
        self
    }

    #[must_use]
    pub fn with_drop(mut self, drop: DropConfig) -> Self {
        self.drop = drop;
        self
    }

    #[must_use]
    pub fn with_visual(mut self, visual: VisualConfig) -> Self {
        self.visual = visual;
        self
    }

    /// Clamp every section to a usable range.
    #[must_use]
    pub fn validated(self) -> Self {
        Self {
            expand: self.expand.validated(),
            preview: self.preview.validated(),
            exit: self.exit.validated(),
            drop: self.drop,
            visual: self.visual.validated(),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn clamp_ms(value: Duration, max_ms: u64) -> Duration {
    Duration::from_millis((value.as_millis() as u64).min(max_ms))
}
