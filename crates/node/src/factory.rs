//! Constructors for device and container nodes.

use crate::coords::{CanvasPoint, CanvasSize};
use crate::node::{
    ContainerData, DeviceData, DeviceType, Node, NodePayload, NodeStatus, NodeStyle, ZLayer,
};
use crate::NodeId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const DEVICE_WIDTH: f32 = 120.0;
pub const DEVICE_HEIGHT: f32 = 80.0;

pub const CONTAINER_MIN_WIDTH: f32 = 300.0;
pub const CONTAINER_MIN_HEIGHT: f32 = 200.0;
pub const CONTAINER_PADDING: f32 = 40.0;
pub const CONTAINER_MAX_PADDING: f32 = 400.0;

/// Options for [`create_device`]. Unset fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSpec {
    pub id: Option<NodeId>,
    pub name: Option<String>,
    pub device_type: DeviceType,
    pub status: NodeStatus,
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub is_manual: bool,
}

impl DeviceSpec {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Some(NodeId::named(&name)),
            name: Some(name),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }
}

/// Options for [`create_container`]. Unset limits fall back to
/// [`CONTAINER_MIN_WIDTH`], [`CONTAINER_MIN_HEIGHT`] and
/// [`CONTAINER_PADDING`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSpec {
    pub id: Option<NodeId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub padding: Option<f32>,
    pub auto_expand: Option<bool>,
}

impl ContainerSpec {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Some(NodeId::named(&name)),
            name: Some(name),
            ..Default::default()
        }
    }

    pub fn with_min_size(mut self, width: f32, height: f32) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_auto_expand(mut self, auto_expand: bool) -> Self {
        self.auto_expand = Some(auto_expand);
        self
    }

    /// Fills limits left unset with the given defaults.
    pub fn or_limits(mut self, min_width: f32, min_height: f32, padding: f32) -> Self {
        self.min_width = self.min_width.or(Some(min_width));
        self.min_height = self.min_height.or(Some(min_height));
        self.padding = self.padding.or(Some(padding));
        self
    }
}

/// Creates a device node at `position` with the standard device size.
pub fn create_device(position: CanvasPoint, spec: DeviceSpec) -> Node {
    let now = Utc::now();
    Node {
        id: spec.id.unwrap_or_default(),
        position,
        size: CanvasSize::new(DEVICE_WIDTH, DEVICE_HEIGHT),
        parent: None,
        children: Vec::new(),
        z_index: Some(ZLayer::DEVICE),
        payload: NodePayload::Device(DeviceData {
            device_type: spec.device_type,
            name: spec.name.unwrap_or_else(|| "New device".to_string()),
            status: spec.status,
            ip: spec.ip,
            port: spec.port,
            is_manual: spec.is_manual,
            created_at: now,
            updated_at: now,
        }),
        style: NodeStyle::default(),
    }
}

/// Creates a container node. The initial size is floored at the
/// container's minimum. Non-finite limits fall back to the defaults and
/// out-of-range ones are clamped.
pub fn create_container(position: CanvasPoint, size: CanvasSize, spec: ContainerSpec) -> Node {
    let now = Utc::now();
    let min_width = finite_or(spec.min_width, CONTAINER_MIN_WIDTH).max(1.0);
    let min_height = finite_or(spec.min_height, CONTAINER_MIN_HEIGHT).max(1.0);
    let padding = finite_or(spec.padding, CONTAINER_PADDING).clamp(0.0, CONTAINER_MAX_PADDING);
    Node {
        id: spec.id.unwrap_or_default(),
        position,
        size: size.max(CanvasSize::new(min_width, min_height)),
        parent: None,
        children: Vec::new(),
        z_index: Some(ZLayer::CONTAINER),
        payload: NodePayload::Container(ContainerData {
            name: spec.name.unwrap_or_else(|| "New system".to_string()),
            description: spec.description,
            min_width,
            min_height,
            padding,
            auto_expand: spec.auto_expand.unwrap_or(true),
            children_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }),
        style: NodeStyle::default(),
    }
}

fn finite_or(value: Option<f32>, fallback: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_defaults() {
        let device = create_device(CanvasPoint::new(5.0, 6.0), DeviceSpec::default());
        assert_eq!(device.size, CanvasSize::new(120.0, 80.0));
        assert_eq!(device.z_index, Some(ZLayer::DEVICE));
        assert_eq!(device.name(), "New device");
        let data = device.device_data().unwrap();
        assert_eq!(data.created_at, data.updated_at);
    }

    #[test]
    fn explicit_id_is_honored() {
        let device = create_device(CanvasPoint::default(), DeviceSpec::named("core-router"));
        assert_eq!(device.id, NodeId::named("core-router"));
        assert_eq!(device.name(), "core-router");
    }

    #[test]
    fn container_size_is_floored_at_minimum() {
        let container = create_container(
            CanvasPoint::default(),
            CanvasSize::new(100.0, 500.0),
            ContainerSpec::default(),
        );
        assert_eq!(container.size, CanvasSize::new(300.0, 500.0));
        assert_eq!(container.z_index, Some(ZLayer::CONTAINER));

        let data = container.container_data().unwrap();
        assert_eq!(data.padding, 40.0);
        assert!(data.auto_expand);
        assert!(data.children_ids.is_empty());
    }

    #[test]
    fn explicit_limits_win_over_defaults() {
        let spec = ContainerSpec::default()
            .with_padding(10.0)
            .or_limits(400.0, 250.0, 40.0);
        let container = create_container(CanvasPoint::default(), CanvasSize::default(), spec);
        let data = container.container_data().unwrap();
        assert_eq!(data.padding, 10.0);
        assert_eq!(container.size, CanvasSize::new(400.0, 250.0));
    }

    #[test]
    fn unusable_limits_are_sanitized() {
        let spec = ContainerSpec {
            min_width: Some(f32::NAN),
            min_height: Some(-50.0),
            padding: Some(f32::INFINITY),
            ..Default::default()
        };
        let container = create_container(CanvasPoint::default(), CanvasSize::default(), spec);
        let data = container.container_data().unwrap();
        assert_eq!(data.min_width, CONTAINER_MIN_WIDTH);
        assert_eq!(data.min_height, 1.0);
        assert_eq!(data.padding, CONTAINER_PADDING);
        assert_eq!(container.size, CanvasSize::new(300.0, 1.0));

        let negative = create_container(
            CanvasPoint::default(),
            CanvasSize::default(),
            ContainerSpec::default().with_padding(-5.0),
        );
        assert_eq!(negative.container_data().unwrap().padding, 0.0);
    }
}
