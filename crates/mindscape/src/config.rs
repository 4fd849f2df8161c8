use crate::error::{Error, Result};
use crate::model::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

fn config_f64(cfg: &Value, path: &[&str]) -> Option<f64> {
    let mut v = cfg;
    for p in path {
        v = v.get(*p)?;
    }
    v.as_f64()
}

fn config_string(cfg: &Value, path: &[&str]) -> Option<String> {
    let mut v = cfg;
    for p in path {
        v = v.get(*p)?;
    }
    v.as_str().map(|s| s.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Radial,
    /// Left-to-right layered layout.
    #[serde(alias = "hierarchical")]
    Tree,
    /// Root children alternate right/left.
    #[default]
    Balanced,
}

impl LayoutType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::Tree => "tree",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radial" => Ok(Self::Radial),
            "tree" | "hierarchical" => Ok(Self::Tree),
            "balanced" => Ok(Self::Balanced),
            _ => Err(Error::UnknownLayout {
                name: s.to_string(),
            }),
        }
    }
}

/// What the layout does with nodes that cannot be reached from the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrphanPolicy {
    /// Leave unreachable nodes at their prior coordinates.
    #[default]
    KeepPosition,
    /// Re-home nodes with a missing or dangling `parentId` (and their subtrees) under the root,
    /// after the root's own children.
    AttachToRoot,
}

impl FromStr for OrphanPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "keepposition" | "keep" => Ok(Self::KeepPosition),
            "attachtoroot" | "attach" => Ok(Self::AttachToRoot),
            _ => Err(Error::UnknownOrphanPolicy {
                name: s.to_string(),
            }),
        }
    }
}

/// Spacing parameters shared by the three layout strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Defaults to half the canvas width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_x: Option<f64>,
    /// Defaults to half the canvas height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_y: Option<f64>,
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub radius_step: f64,
    pub orphan_policy: OrphanPolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            center_x: None,
            center_y: None,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            horizontal_spacing: 100.0,
            vertical_spacing: 40.0,
            radius_step: 250.0,
            orphan_policy: OrphanPolicy::KeepPosition,
        }
    }
}

impl LayoutOptions {
    /// Reads options from an effective-config JSON value.
    ///
    /// Keys may sit at the top level or under a `"layout"` object; missing or mistyped keys
    /// keep their defaults.
    pub fn from_config(cfg: &Value) -> Self {
        let cfg = cfg.get("layout").unwrap_or(cfg);
        let d = Self::default();
        Self {
            center_x: config_f64(cfg, &["centerX"]),
            center_y: config_f64(cfg, &["centerY"]),
            node_width: config_f64(cfg, &["nodeWidth"]).unwrap_or(d.node_width),
            node_height: config_f64(cfg, &["nodeHeight"]).unwrap_or(d.node_height),
            horizontal_spacing: config_f64(cfg, &["horizontalSpacing"])
                .unwrap_or(d.horizontal_spacing),
            vertical_spacing: config_f64(cfg, &["verticalSpacing"]).unwrap_or(d.vertical_spacing),
            radius_step: config_f64(cfg, &["radiusStep"]).unwrap_or(d.radius_step),
            orphan_policy: config_string(cfg, &["orphanPolicy"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(d.orphan_policy),
        }
    }

    /// Validates the options and pins the centre for a canvas of the given size.
    pub fn resolve(&self, canvas_width: f64, canvas_height: f64) -> Result<LayoutParams> {
        let center_x = self.center_x.unwrap_or(canvas_width / 2.0);
        let center_y = self.center_y.unwrap_or(canvas_height / 2.0);
        finite("centerX", center_x)?;
        finite("centerY", center_y)?;
        positive("nodeWidth", self.node_width)?;
        positive("nodeHeight", self.node_height)?;
        non_negative("horizontalSpacing", self.horizontal_spacing)?;
        non_negative("verticalSpacing", self.vertical_spacing)?;
        positive("radiusStep", self.radius_step)?;

        Ok(LayoutParams {
            center_x,
            center_y,
            node_width: self.node_width,
            node_height: self.node_height,
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
            radius_step: self.radius_step,
            orphan_policy: self.orphan_policy,
        })
    }
}

/// Validated layout parameters with a concrete centre.
///
/// Only [`LayoutOptions::resolve`] builds one, so every number here is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub(crate) center_x: f64,
    pub(crate) center_y: f64,
    pub(crate) node_width: f64,
    pub(crate) node_height: f64,
    pub(crate) horizontal_spacing: f64,
    pub(crate) vertical_spacing: f64,
    pub(crate) radius_step: f64,
    pub(crate) orphan_policy: OrphanPolicy,
}

impl LayoutParams {
    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn node_size(&self) -> (f64, f64) {
        (self.node_width, self.node_height)
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    /// Horizontal distance between a node and its children in the layered layouts.
    pub fn level_step(&self) -> f64 {
        self.node_width + self.horizontal_spacing
    }
}

/// Parameters of the post-drag overlap repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlapOptions {
    pub node_width: f64,
    pub node_height: f64,
    pub padding: f64,
    /// Number of full scans; the repair stops after this many even if overlaps remain.
    pub passes: usize,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            padding: 20.0,
            passes: 2,
        }
    }
}

impl OverlapOptions {
    pub fn from_config(cfg: &Value) -> Self {
        let cfg = cfg.get("overlap").unwrap_or(cfg);
        let d = Self::default();
        Self {
            node_width: config_f64(cfg, &["nodeWidth"]).unwrap_or(d.node_width),
            node_height: config_f64(cfg, &["nodeHeight"]).unwrap_or(d.node_height),
            padding: config_f64(cfg, &["padding"]).unwrap_or(d.padding),
            passes: cfg
                .get("passes")
                .and_then(Value::as_u64)
                .map(|p| p as usize)
                .unwrap_or(d.passes),
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("nodeWidth", self.node_width)?;
        positive("nodeHeight", self.node_height)?;
        non_negative("padding", self.padding)
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}
