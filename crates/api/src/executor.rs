//! Command and query execution against an [`Editor`].
//!
//! This module connects the abstract Command/Query types to the editor,
//! turning rejected operations into [`CommandResult::Error`].

use crate::{Command, CommandResult, NodeInfo, Query, QueryResult};
use containment::Editor;
use node::{CanvasPoint, CanvasSize, NodeId};
use std::time::Instant;

/// Execute a command against the editor at time `now`.
pub fn execute_command(editor: &mut Editor, command: Command, now: Instant) -> CommandResult {
    match command {
        Command::CreateDevice {
            position,
            parent,
            spec,
        } => {
            let requested = spec.id;
            match editor.create_device(CanvasPoint(position), spec, now) {
                Some(id) => attach_created(editor, id, parent, now),
                None => already_exists(requested),
            }
        }

        Command::CreateContainer {
            position,
            size,
            parent,
            spec,
        } => {
            let requested = spec.id;
            let size = size.map(CanvasSize);
            match editor.create_container(CanvasPoint(position), size, spec, now) {
                Some(id) => attach_created(editor, id, parent, now),
                None => already_exists(requested),
            }
        }

        Command::Move { id, position } => {
            if !editor.canvas().contains(id) {
                return not_found(id);
            }
            editor.move_node(id, CanvasPoint(position), now);
            CommandResult::modified(vec![id])
        }

        Command::Remove { target } => {
            let ids = target.resolve(editor.canvas());
            let mut deleted = Vec::new();
            for id in ids {
                // An earlier id may already have taken this one with its subtree.
                if !editor.canvas().contains(id) {
                    continue;
                }
                deleted.extend(editor.canvas().descendants(id));
                deleted.push(id);
                editor.remove_node(id, now);
            }
            CommandResult::deleted(deleted)
        }

        Command::AddToContainer { child, container } => check(
            editor.add_to_container(child, container, now),
            vec![child, container],
            || format!("cannot add {} to {}", child, container),
        ),

        Command::RemoveFromContainer { child, container } => check(
            editor.remove_from_container(child, container, now),
            vec![child, container],
            || format!("{} is not in {}", child, container),
        ),

        Command::ClearContainer { container } => {
            if !editor.canvas().contains(container) {
                return not_found(container);
            }
            let children = editor.canvas().children(container).to_vec();
            editor.clear_container(container, now);
            CommandResult::modified(children)
        }

        Command::EmbedCommit { child, parent } => check(
            editor.embed_commit(child, parent, now),
            vec![child, parent],
            || format!("cannot embed {} into {}", child, parent),
        ),

        Command::DragStart { id } => check(editor.drag_start(id, now), vec![id], || {
            format!("cannot start dragging {}", id)
        }),

        Command::DragMove { id, position } => check(
            editor.drag_move(id, CanvasPoint(position), now),
            vec![id],
            || format!("{} is not being dragged", id),
        ),

        Command::DragEnd { id } => check(editor.drag_end(id, now), vec![id], || {
            format!("{} is not being dragged", id)
        }),

        Command::ResizeStart { id } => check(editor.resize_start(id, now), vec![id], || {
            format!("cannot start resizing {}", id)
        }),

        Command::Resize { id, size } => check(
            editor.resize(id, CanvasSize(size), now),
            vec![id],
            || format!("node {} not found", id),
        ),

        Command::ResizeEnd { id } => check(editor.resize_end(id, now), vec![id], || {
            format!("{} is not being resized", id)
        }),

        Command::ModifierPress { key } => {
            editor.modifier_pressed(key, now);
            CommandResult::success()
        }

        Command::ModifierRelease { key } => {
            editor.modifier_released(key, now);
            CommandResult::success()
        }

        Command::WindowBlur => {
            editor.window_blurred(now);
            CommandResult::success()
        }

        Command::SetLocked { locked } => {
            editor.set_locked(locked, now);
            CommandResult::success()
        }

        Command::SetEngine { engine, enabled } => {
            editor.set_engine_enabled(engine, enabled, now);
            CommandResult::success()
        }

        Command::PauseAutoExpand => {
            editor.pause_auto_expand();
            CommandResult::success()
        }

        Command::ResumeAutoExpand => {
            editor.resume_auto_expand();
            CommandResult::success()
        }

        Command::ManualExpand { container } => check(
            editor.manual_expand(container, now),
            vec![container],
            || format!("cannot expand {}", container),
        ),

        Command::Align { target, mode } => {
            let ids = target.resolve(editor.canvas());
            if ids.len() < 2 {
                return CommandResult::error("align needs at least two nodes");
            }
            editor.align(&ids, mode, now);
            CommandResult::modified(ids)
        }

        Command::Distribute { target, mode } => {
            let ids = target.resolve(editor.canvas());
            if ids.len() < 3 {
                return CommandResult::error("distribute needs at least three nodes");
            }
            editor.distribute(&ids, mode, now);
            CommandResult::modified(ids)
        }

        Command::Advance => {
            editor.advance(now);
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut all_created = Vec::new();
            let mut all_modified = Vec::new();
            let mut all_deleted = Vec::new();

            for cmd in commands {
                match execute_command(editor, cmd, now) {
                    CommandResult::Success {
                        created,
                        modified,
                        deleted,
                    } => {
                        all_created.extend(created);
                        all_modified.extend(modified);
                        all_deleted.extend(deleted);
                    }
                    CommandResult::Error { message } => {
                        return CommandResult::error(format!("Batch failed: {}", message));
                    }
                }
            }

            CommandResult::Success {
                created: all_created,
                modified: all_modified,
                deleted: all_deleted,
            }
        }
    }
}

/// Execute a query against the editor. `now` is only used to express
/// timer deadlines as durations.
pub fn execute_query(editor: &Editor, query: Query, now: Instant) -> QueryResult {
    match query {
        Query::GetNode { id } => QueryResult::Node {
            node: editor.node(id).map(NodeInfo::from),
        },

        Query::GetAllNodes => QueryResult::Nodes {
            nodes: editor.canvas().nodes().map(NodeInfo::from).collect(),
        },

        Query::GetChildren { id } => QueryResult::Nodes {
            nodes: editor
                .canvas()
                .children(id)
                .iter()
                .filter_map(|child| editor.node(*child))
                .map(NodeInfo::from)
                .collect(),
        },

        Query::GetSession => {
            let session = editor.session();
            QueryResult::Session {
                state: session.state(),
                locked: session.is_locked(),
                modifier_held: session.modifier_held(),
                expand_paused: session.is_expand_paused(),
                previewing: editor.previewing(),
            }
        }

        Query::GetDropTarget { id } => QueryResult::DropTarget {
            container: editor.find_drop_target(id),
        },

        Query::GetNodeCount => QueryResult::Count {
            count: editor.canvas().len(),
        },

        Query::GetNextDeadline => QueryResult::Deadline {
            in_ms: editor
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now).as_millis() as u64),
        },
    }
}

fn attach_created(
    editor: &mut Editor,
    id: NodeId,
    parent: Option<NodeId>,
    now: Instant,
) -> CommandResult {
    if let Some(parent) = parent {
        if !editor.add_to_container(id, parent, now) {
            log::warn!("created {} but could not place it in {}", id, parent);
        }
    }
    CommandResult::created(vec![id])
}

fn check(ok: bool, ids: Vec<NodeId>, message: impl FnOnce() -> String) -> CommandResult {
    if ok {
        CommandResult::modified(ids)
    } else {
        CommandResult::error(message())
    }
}

fn already_exists(id: Option<NodeId>) -> CommandResult {
    match id {
        Some(id) => CommandResult::error(format!("node {} already exists", id)),
        None => CommandResult::error("node already exists"),
    }
}

fn not_found(id: NodeId) -> CommandResult {
    CommandResult::error(format!("node {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Target;
    use containment::{AlignMode, EditorConfig, ModifierKey};
    use glam::Vec2;
    use node::{ContainerSpec, DeviceSpec};
    use std::time::Duration;

    fn editor_with_zone(now: Instant) -> (Editor, NodeId) {
        let mut editor = Editor::new(EditorConfig::default());
        let result = execute_command(
            &mut editor,
            Command::CreateContainer {
                position: Vec2::ZERO,
                size: Some(Vec2::new(300.0, 200.0)),
                parent: None,
                spec: ContainerSpec::named("zone"),
            },
            now,
        );
        assert!(result.is_success());
        (editor, NodeId::named("zone"))
    }

    #[test]
    fn create_inside_parent_grows_it() {
        let now = Instant::now();
        let (mut editor, zone) = editor_with_zone(now);

        let result = execute_command(
            &mut editor,
            Command::CreateDevice {
                position: Vec2::new(350.0, 50.0),
                parent: Some(zone),
                spec: DeviceSpec::named("router"),
            },
            now,
        );
        assert_eq!(result, CommandResult::created(vec![NodeId::named("router")]));
        assert_eq!(editor.node(zone).unwrap().size, CanvasSize::new(510.0, 200.0));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let now = Instant::now();
        let (mut editor, _) = editor_with_zone(now);
        let result = execute_command(
            &mut editor,
            Command::CreateContainer {
                position: Vec2::ZERO,
                size: None,
                parent: None,
                spec: ContainerSpec::named("zone"),
            },
            now,
        );
        assert!(!result.is_success());
        assert_eq!(editor.canvas().len(), 1);
    }

    #[test]
    fn resize_of_unknown_node_reports_not_found() {
        let now = Instant::now();
        let (mut editor, _) = editor_with_zone(now);
        let ghost = NodeId::named("ghost");
        let result = execute_command(
            &mut editor,
            Command::Resize {
                id: ghost,
                size: Vec2::new(400.0, 300.0),
            },
            now,
        );
        assert_eq!(result, CommandResult::error(format!("node {} not found", ghost)));
    }

    #[test]
    fn rejected_drag_reports_error() {
        let now = Instant::now();
        let (mut editor, zone) = editor_with_zone(now);
        let result = execute_command(
            &mut editor,
            Command::DragMove {
                id: zone,
                position: Vec2::new(10.0, 10.0),
            },
            now,
        );
        assert!(matches!(result, CommandResult::Error { .. }));
    }

    #[test]
    fn remove_reports_whole_subtree_once() {
        let now = Instant::now();
        let (mut editor, zone) = editor_with_zone(now);
        let router = editor.create_device(
            CanvasPoint::new(20.0, 20.0),
            DeviceSpec::named("router"),
            now,
        ).unwrap();
        editor.add_to_container(router, zone, now);

        let result = execute_command(
            &mut editor,
            Command::Remove {
                target: Target::Nodes(vec![zone, router]),
            },
            now,
        );
        match result {
            CommandResult::Success { deleted, .. } => {
                assert_eq!(deleted.len(), 2);
                assert!(deleted.contains(&router));
            }
            CommandResult::Error { message } => panic!("{}", message),
        }
        assert!(editor.canvas().is_empty());
    }

    #[test]
    fn batch_stops_at_first_error() {
        let now = Instant::now();
        let (mut editor, zone) = editor_with_zone(now);
        let result = execute_command(
            &mut editor,
            Command::Batch {
                commands: vec![
                    Command::ModifierPress {
                        key: ModifierKey::Control,
                    },
                    Command::Align {
                        target: Target::Node(zone),
                        mode: AlignMode::Left,
                    },
                    Command::SetLocked { locked: true },
                ],
            },
            now,
        );
        assert!(matches!(result, CommandResult::Error { .. }));
        assert!(editor.session().modifier_held());
        assert!(!editor.session().is_locked());
    }

    #[test]
    fn deadline_query_is_relative_to_now() {
        let now = Instant::now();
        let (mut editor, zone) = editor_with_zone(now);
        let router = editor
            .create_device(CanvasPoint::new(20.0, 20.0), DeviceSpec::default(), now)
            .unwrap();
        editor.add_to_container(router, zone, now);
        // Second move inside the throttle window leaves a trailing run.
        editor.move_node(router, CanvasPoint::new(400.0, 20.0), now + Duration::from_millis(4));

        match execute_query(&editor, Query::GetNextDeadline, now + Duration::from_millis(6)) {
            QueryResult::Deadline { in_ms } => assert_eq!(in_ms, Some(10)),
            other => panic!("unexpected {:?}", other),
        }
        match execute_query(&editor, Query::GetChildren { id: zone }, now) {
            QueryResult::Nodes { nodes } => assert_eq!(nodes[0].id, router),
            other => panic!("unexpected {:?}", other),
        }
    }
}
