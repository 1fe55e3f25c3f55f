//! Session host: drives a chart engine against the persistence API.
//!
//! Each command loads the snapshot into an engine, runs one engine
//! operation, and persists the resulting action batch — one request per
//! node, all in flight together, best-effort with no rollback.

mod api;

use chart::connector::LineStyle;
use chart::doc::{NewNode, NodeId, NodeKind};
use chart::engine::{Action, EngineCore};
use chart::input::Button;
use chart::layout::LayoutConfig;
use chart::zoom::Point;
use clap::{Parser, Subcommand};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, join_all};
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("engine rejected the operation: {0}")]
    Engine(#[from] chart::engine::EngineError),
    #[error("validation failed: {0}")]
    Validation(#[from] chart::engine::ValidationError),
    #[error("unknown relationship kind `{0}` (expected direct or advisory)")]
    UnknownKind(String),
    #[error("node not found: {0}")]
    UnknownNode(Uuid),
    #[error("refusing to delete without --yes")]
    NeedsConfirmation,
}

#[derive(Parser, Debug)]
#[command(name = "orgboard", about = "Org-chart layout and editing CLI")]
struct Cli {
    #[arg(long, env = "ORGBOARD_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Canvas width used to anchor the root during layout.
    #[arg(long, default_value_t = 1200.0)]
    canvas_width: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current snapshot.
    List,
    /// Create the root node.
    CreateRoot {
        #[arg(long)]
        name: String,
    },
    /// Add a subordinate or advisor under a parent.
    Add {
        parent_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "direct")]
        kind: String,
    },
    /// Rename a node.
    Rename {
        id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Change a node's relationship kind.
    SetKind {
        id: Uuid,
        #[arg(long)]
        kind: String,
    },
    /// Drag a node to a position and release it. Nodes with children
    /// snap back through a full relayout; leaves keep the drop point.
    Move {
        id: Uuid,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Delete a node and its whole subtree.
    Delete {
        id: Uuid,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Print the scene (connectors and boxes) in draw order.
    Show {
        /// Zoom steps to apply before emitting: positive in, negative out.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        zoom: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.base_url);
    let config = LayoutConfig { canvas_w: cli.canvas_width, ..LayoutConfig::default() };

    match cli.command {
        Command::List => list(&api).await,
        Command::CreateRoot { name } => {
            let new = NewNode { name, kind: NodeKind::Direct, depth: 1, parent_id: None };
            create(&api, config, new).await
        }
        Command::Add { parent_id, name, kind } => add(&api, config, parent_id, &name, &kind).await,
        Command::Rename { id, name } => rename(&api, config, id, &name).await,
        Command::SetKind { id, kind } => set_kind(&api, config, id, &kind).await,
        Command::Move { id, x, y } => move_node(&api, config, id, x, y).await,
        Command::Delete { id, yes } => delete(&api, config, id, yes).await,
        Command::Show { zoom } => show(&api, config, zoom).await,
    }
}

/// Hydrate an engine from the server snapshot.
async fn load_engine(api: &ApiClient, config: LayoutConfig) -> Result<EngineCore, CliError> {
    let mut engine = EngineCore::with_config(config);
    engine.load_snapshot(api.list_nodes().await?);
    Ok(engine)
}

/// Persist a batch of engine actions: one request per affected node, all
/// in flight together. Individual failures are reported and skipped —
/// the batch is best-effort, with no rollback.
async fn persist_actions(api: &ApiClient, actions: &[Action]) {
    let mut calls: Vec<BoxFuture<'_, (NodeId, Result<(), ApiError>)>> = Vec::new();
    for action in actions {
        match action {
            Action::NodeUpdated { id, fields } => {
                let id = *id;
                let fields = fields.clone();
                calls.push(
                    async move { (id, api.update_node(&id, &fields).await.map(|_| ())) }.boxed(),
                );
            }
            Action::NodeDeleted { id } => {
                let id = *id;
                calls.push(async move { (id, api.delete_node(&id).await) }.boxed());
            }
            Action::SelectionChanged { .. } | Action::RenderNeeded => {}
        }
    }
    for (id, result) in join_all(calls).await {
        if let Err(err) = result {
            eprintln!("warning: failed to persist node {id}: {err}");
        }
    }
}

async fn list(api: &ApiClient) -> Result<(), CliError> {
    for node in api.list_nodes().await? {
        let parent = node.parent_id.map_or_else(|| "-".to_string(), |p| p.to_string());
        println!(
            "{id}  depth={depth}  kind={kind}  pos=({x:.1},{y:.1})  parent={parent}  {name}",
            id = node.id,
            depth = node.depth,
            kind = node.kind.as_str(),
            x = node.x,
            y = node.y,
            name = node.name,
        );
    }
    Ok(())
}

async fn create(api: &ApiClient, config: LayoutConfig, new: NewNode) -> Result<(), CliError> {
    let mut engine = load_engine(api, config).await?;
    engine.validate_new(&new)?;
    let node = api.create_node(&new).await?;
    let id = node.id;
    let actions = engine.insert_node(node)?;
    persist_actions(api, &actions).await;
    println!("created {id}");
    Ok(())
}

async fn add(
    api: &ApiClient,
    config: LayoutConfig,
    parent_id: Uuid,
    name: &str,
    kind: &str,
) -> Result<(), CliError> {
    let kind = NodeKind::parse(kind).ok_or_else(|| CliError::UnknownKind(kind.to_string()))?;
    let mut engine = load_engine(api, config).await?;
    let parent_depth = engine.node(&parent_id).ok_or(CliError::UnknownNode(parent_id))?.depth;
    let new = NewNode {
        name: name.to_string(),
        kind,
        depth: parent_depth + 1,
        parent_id: Some(parent_id),
    };
    engine.validate_new(&new)?;
    let node = api.create_node(&new).await?;
    let id = node.id;
    let actions = engine.insert_node(node)?;
    persist_actions(api, &actions).await;
    println!("created {id}");
    Ok(())
}

async fn rename(api: &ApiClient, config: LayoutConfig, id: Uuid, name: &str) -> Result<(), CliError> {
    let mut engine = load_engine(api, config).await?;
    let actions = engine.rename(&id, name)?;
    persist_actions(api, &actions).await;
    Ok(())
}

async fn set_kind(api: &ApiClient, config: LayoutConfig, id: Uuid, kind: &str) -> Result<(), CliError> {
    let kind = NodeKind::parse(kind).ok_or_else(|| CliError::UnknownKind(kind.to_string()))?;
    let mut engine = load_engine(api, config).await?;
    let actions = engine.set_kind(&id, kind)?;
    persist_actions(api, &actions).await;
    Ok(())
}

/// Replay the drag protocol: press on the node, move to the target,
/// release. The engine decides whether the release triggers a full
/// relayout (nodes with children) or keeps the drop point (leaves).
async fn move_node(
    api: &ApiClient,
    config: LayoutConfig,
    id: Uuid,
    x: f64,
    y: f64,
) -> Result<(), CliError> {
    let mut engine = load_engine(api, config).await?;
    let node = engine.node(&id).ok_or(CliError::UnknownNode(id))?;
    let press = Point::new(node.x + 1.0, node.y + 1.0);

    engine.on_pointer_down(press, Button::Primary);
    engine.on_pointer_move(Point::new(x + 1.0, y + 1.0));
    let actions = engine.on_pointer_up()?;
    persist_actions(api, &actions).await;

    let node = engine.node(&id).ok_or(CliError::UnknownNode(id))?;
    println!("moved {id} to ({x:.1},{y:.1})", x = node.x, y = node.y);
    Ok(())
}

async fn delete(
    api: &ApiClient,
    config: LayoutConfig,
    id: Uuid,
    yes: bool,
) -> Result<(), CliError> {
    let mut engine = load_engine(api, config).await?;
    let plan = engine.delete_plan(&id)?;

    if !yes {
        if plan.deletes_root {
            eprintln!(
                "this is the root node: deleting it removes the entire chart ({} nodes)",
                plan.ids.len()
            );
        } else {
            eprintln!(
                "this deletes the node and its {} subordinate(s)",
                plan.ids.len() - 1
            );
        }
        return Err(CliError::NeedsConfirmation);
    }

    let actions = engine.delete_subtree(&id)?;
    persist_actions(api, &actions).await;
    println!("deleted {} node(s)", plan.ids.len());
    Ok(())
}

async fn show(api: &ApiClient, config: LayoutConfig, zoom_steps: i32) -> Result<(), CliError> {
    let mut engine = load_engine(api, config).await?;
    for _ in 0..zoom_steps.max(0) {
        engine.zoom.zoom_in();
    }
    for _ in 0..(-zoom_steps).max(0) {
        engine.zoom.zoom_out();
    }

    let scene = engine.scene();
    println!("scale {:.1}", scene.scale);
    for conn in &scene.connectors {
        let style = match conn.style {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        };
        println!("connector {style} {parent} -> {child}", parent = conn.parent, child = conn.child);
        for seg in &conn.segments {
            println!(
                "  segment ({:.1},{:.1}) -> ({:.1},{:.1})",
                seg.from.x, seg.from.y, seg.to.x, seg.to.y
            );
        }
    }
    for b in &scene.boxes {
        let marker = if b.selected { "*" } else { " " };
        println!(
            "box{marker} {id} ({x:.1},{y:.1}) {w:.0}x{h:.0} depth={depth} kind={kind} {label}",
            id = b.id,
            x = b.x,
            y = b.y,
            w = b.width,
            h = b.height,
            depth = b.depth,
            kind = b.kind.as_str(),
            label = b.label,
        );
    }
    Ok(())
}
