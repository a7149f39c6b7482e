//! Configuration for one node of the mesh.
//!
//! All parameters map onto a `config.toml` file. Missing sections fall
//! back to their defaults, so a file only needs what differs.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = 42
//!
//! [grid]
//! width = 128
//! height = 120
//! lifetime = 7
//!
//! [rules]
//! notation = "B3/S23"
//!
//! [node]
//! name = "tile-a"
//! bind = "0.0.0.0:7400"
//! staleness = { expire-after-ms = 2000 }
//!
//! [[node.links]]
//! direction = "east"
//! peer = "192.168.1.20:7400"
//! ```

use std::path::Path;

use anyhow::Context;
use lifemesh_data::{Direction, Lifetime, PeerId, RuleSet, LABEL_LEN};
use serde::{Deserialize, Serialize};

use crate::edge_cache::StalenessPolicy;
use crate::links::Links;
use crate::perturbation::Knob;

/// Tile dimensions in cells and the number of cell states.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub lifetime: Lifetime,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 120,
            lifetime: Lifetime::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// `B<digits>/S<digits>`
    pub notation: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            notation: RuleSet::default().notation(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub direction: Direction,
    /// Transport address of the neighbor, e.g. `192.168.1.20:7400`.
    pub peer: String,
}

/// Identity of this node and its neighbors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    /// Label stamped on every outgoing datagram.
    pub name: String,
    pub bind: String,
    pub staleness: StalenessPolicy,
    pub links: Vec<LinkConfig>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "tile".to_string(),
            bind: "0.0.0.0:7400".to_string(),
            staleness: StalenessPolicy::LastKnownGood,
            links: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PerturbationConfig {
    /// Knob output range upper bound, in rows either side of the middle.
    pub max_thickness: u16,
    /// Knob position at start-up.
    pub initial: u16,
    /// Raw knob resolution.
    pub raw_max: u16,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            max_thickness: 15,
            initial: 0,
            raw_max: Knob::DEFAULT_RAW_MAX,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub cell_size_x: usize,
    pub cell_size_y: usize,
    pub color_multiplier: u32,
    /// Paint fresh neighbor boundaries over the outermost pixel lines.
    pub show_boundaries: bool,
    pub target_fps: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size_x: 2,
            cell_size_y: 2,
            color_multiplier: 127,
            show_boundaries: false,
            target_fps: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Generations between summary log lines; zero disables them.
    pub log_interval: u64,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            log_interval: 100,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub grid: GridConfig,
    pub rules: RulesConfig,
    pub node: NodeConfig,
    pub perturbation: PerturbationConfig,
    pub render: RenderConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Validates all configuration parameters, reporting the first failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.grid.width >= 3, "Grid width must be at least 3");
        anyhow::ensure!(self.grid.width <= 1024, "Grid width too large (max 1024)");
        anyhow::ensure!(self.grid.height >= 3, "Grid height must be at least 3");
        anyhow::ensure!(self.grid.height <= 1024, "Grid height too large (max 1024)");

        self.rules()?;

        anyhow::ensure!(!self.node.name.is_empty(), "Node name must not be empty");
        anyhow::ensure!(
            self.node.name.len() <= LABEL_LEN,
            "Node name too long (max {LABEL_LEN} bytes)"
        );
        self.links()?;

        anyhow::ensure!(
            usize::from(self.perturbation.max_thickness) <= self.grid.height,
            "Perturbation max thickness exceeds grid height"
        );
        anyhow::ensure!(
            self.perturbation.initial <= self.perturbation.max_thickness,
            "Initial perturbation exceeds max thickness"
        );
        anyhow::ensure!(
            self.perturbation.raw_max > 0,
            "Perturbation raw range must be positive"
        );
        anyhow::ensure!(
            self.perturbation.raw_max >= self.perturbation.max_thickness,
            "Perturbation raw range must cover max thickness"
        );

        anyhow::ensure!(self.render.cell_size_x >= 1, "Cell size x must be positive");
        anyhow::ensure!(self.render.cell_size_y >= 1, "Cell size y must be positive");
        anyhow::ensure!(self.render.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.render.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match Self::read(path)? {
            Some(config) => Ok(config),
            None => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reads `path` without logging. `None` when the file does not exist.
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("loading {}", path.display()))
            .map(Some)
    }

    pub fn rules(&self) -> anyhow::Result<RuleSet> {
        RuleSet::from_notation(&self.rules.notation).context("Invalid [rules] notation")
    }

    /// Direction bindings; each side and each peer may appear once.
    pub fn links(&self) -> anyhow::Result<Links> {
        let mut links = Links::none();
        for link in &self.node.links {
            anyhow::ensure!(
                !links.is_linked(link.direction),
                "Direction {} linked more than once",
                link.direction
            );
            anyhow::ensure!(!link.peer.is_empty(), "Link peer must not be empty");
            anyhow::ensure!(
                links.bind(link.direction, PeerId::new(link.peer.as_str())),
                "Peer {} linked on more than one side",
                link.peer
            );
        }
        Ok(links)
    }

    #[must_use]
    pub fn knob(&self) -> Knob {
        Knob::at_thickness(
            self.perturbation.raw_max,
            self.perturbation.max_thickness,
            self.perturbation.initial,
        )
    }

    /// Hash of everything tiles in one mesh must agree on.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        match self.rules() {
            Ok(rules) => {
                hasher.update(rules.born.to_le_bytes());
                hasher.update(rules.survive.to_le_bytes());
            }
            Err(_) => hasher.update(self.rules.notation.as_bytes()),
        }
        hasher.update([self.grid.lifetime.states()]);
        hasher.update((self.grid.width as u64).to_le_bytes());
        hasher.update((self.grid.height as u64).to_le_bytes());
        hex::encode(&hasher.finalize()[..8])
    }
}
