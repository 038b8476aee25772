//! Align and distribute a set of nodes.
//!
//! These only plan moves. The editor applies them as user moves so
//! subtrees follow and parents grow as usual.

use canvas::Canvas;
use node::{Bounds, CanvasPoint, NodeId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlignMode {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DistributeMode {
    Horizontal,
    Vertical,
}

fn boxes(canvas: &Canvas, ids: &[NodeId]) -> Vec<(NodeId, Bounds)> {
    ids.iter()
        .filter_map(|id| canvas.bounds(*id).map(|b| (*id, b)))
        .collect()
}

/// Target positions aligning `ids` to their common box. Needs two nodes.
pub fn plan_align(canvas: &Canvas, ids: &[NodeId], mode: AlignMode) -> Vec<(NodeId, CanvasPoint)> {
    let nodes = boxes(canvas, ids);
    if nodes.len() < 2 {
        return Vec::new();
    }
    let Some(all) = Bounds::union_all(nodes.iter().map(|(_, b)| *b)) else {
        return Vec::new();
    };
    let center = all.center();

    nodes
        .into_iter()
        .map(|(id, b)| {
            let (mut x, mut y) = (b.min.x, b.min.y);
            match mode {
                AlignMode::Left => x = all.min.x,
                AlignMode::Center => x = center.x() - b.width() / 2.0,
                AlignMode::Right => x = all.max.x - b.width(),
                AlignMode::Top => y = all.min.y,
                AlignMode::Middle => y = center.y() - b.height() / 2.0,
                AlignMode::Bottom => y = all.max.y - b.height(),
            }
            (id, CanvasPoint::new(x, y))
        })
        .collect()
}

/// Target positions spreading `ids` with equal gaps between them, keeping
/// the outermost nodes in place. Needs three nodes.
pub fn plan_distribute(
    canvas: &Canvas,
    ids: &[NodeId],
    mode: DistributeMode,
) -> Vec<(NodeId, CanvasPoint)> {
    let mut nodes = boxes(canvas, ids);
    if nodes.len() < 3 {
        return Vec::new();
    }
    let Some(all) = Bounds::union_all(nodes.iter().map(|(_, b)| *b)) else {
        return Vec::new();
    };
    let gaps = (nodes.len() - 1) as f32;

    match mode {
        DistributeMode::Horizontal => {
            nodes.sort_by(|(_, a), (_, b)| a.min.x.total_cmp(&b.min.x));
            let used: f32 = nodes.iter().map(|(_, b)| b.width()).sum();
            let gap = (all.width() - used) / gaps;
            let mut x = all.min.x;
            nodes
                .into_iter()
                .map(|(id, b)| {
                    let target = CanvasPoint::new(x, b.min.y);
                    x += b.width() + gap;
                    (id, target)
                })
                .collect()
        }
        DistributeMode::Vertical => {
            nodes.sort_by(|(_, a), (_, b)| a.min.y.total_cmp(&b.min.y));
            let used: f32 = nodes.iter().map(|(_, b)| b.height()).sum();
            let gap = (all.height() - used) / gaps;
            let mut y = all.min.y;
            nodes
                .into_iter()
                .map(|(id, b)| {
                    let target = CanvasPoint::new(b.min.x, y);
                    y += b.height() + gap;
                    (id, target)
                })
                .collect()
        }
    }
}
