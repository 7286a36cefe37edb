//! Board commands: list, show, create, visibility

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hopeboard_client::BoardSession;
use hopeboard_core::editor::NodeContent;
use hopeboard_core::{Board, Canvas, Visibility};
use uuid::Uuid;

use super::Ctx;

/// Frontend origin used when printing share links
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
pub struct BoardsArgs {
    #[command(subcommand)]
    pub command: BoardsCommands,
}

#[derive(Subcommand, Debug)]
pub enum BoardsCommands {
    /// List public boards, or your own with --mine
    List {
        #[arg(long)]
        mine: bool,
    },
    /// Show a board's settings and elements in paint order
    Show {
        /// Board id
        #[arg(required_unless_present = "share")]
        id: Option<Uuid>,

        /// Open a public board by share token instead of id
        #[arg(long, conflicts_with = "id")]
        share: Option<String>,
    },
    /// Create a board (requires login)
    Create {
        #[arg(long)]
        title: Option<String>,

        /// Make the board public right away
        #[arg(long)]
        public: bool,
    },
    /// Set a board public or private (owner only)
    Visibility {
        id: Uuid,

        /// public or private
        #[arg(value_parser = parse_visibility)]
        visibility: Visibility,

        /// Frontend origin for the printed share link
        #[arg(long, default_value = DEFAULT_ORIGIN)]
        origin: String,
    },
}

fn parse_visibility(s: &str) -> Result<Visibility, String> {
    s.parse().map_err(|e: hopeboard_core::ValidationError| e.to_string())
}

pub async fn run_boards(args: BoardsArgs, ctx: &Ctx) -> Result<()> {
    match args.command {
        BoardsCommands::List { mine } => list(ctx, mine).await,
        BoardsCommands::Show { id, share } => show(ctx, id, share).await,
        BoardsCommands::Create { title, public } => create(ctx, title, public).await,
        BoardsCommands::Visibility {
            id,
            visibility,
            origin,
        } => set_visibility(ctx, id, visibility, &origin).await,
    }
}

async fn list(ctx: &Ctx, mine: bool) -> Result<()> {
    let client = ctx.client()?;
    let boards = if mine {
        if client.token().is_none() {
            bail!("Not logged in. Run: hopeboard login <username>");
        }
        client.user_boards().await?
    } else {
        client.public_boards().await?
    };

    ctx.emit(&boards, |boards| {
        if boards.is_empty() {
            println!("No boards");
        }
        for board in boards {
            print_board_line(board);
        }
    })
}

async fn show(ctx: &Ctx, id: Option<Uuid>, share: Option<String>) -> Result<()> {
    let client = ctx.client()?;
    let session = match (id, share) {
        (_, Some(token)) => BoardSession::open_shared(&client, &token, Canvas::default()).await,
        (Some(id), None) => BoardSession::open(&client, id, false, Canvas::default()).await,
        (None, None) => bail!("Give a board id or --share <token>"),
    }
    .context("Failed to load board")?;

    let editor = session.editor();
    let tree = editor.render();
    ctx.emit(&tree, |tree| {
        print_board_line(editor.board());
        println!("background: {}", tree.background_color);
        for node in &tree.nodes {
            println!(
                "  [{}] {:<7} at ({:.0}, {:.0}) {}x{}  {}",
                node.z_index,
                node.element_type.as_str(),
                node.left,
                node.top,
                node.width,
                node.height,
                describe(&node.content),
            );
        }
    })
}

async fn create(ctx: &Ctx, title: Option<String>, public: bool) -> Result<()> {
    let client = ctx.client()?;
    if client.token().is_none() {
        bail!("Not logged in. Run: hopeboard login <username>");
    }

    let mut session = BoardSession::create(&client, title.as_deref(), Canvas::default())
        .await
        .context("Failed to create board")?;
    if public {
        session.editor_mut().set_visibility(Visibility::Public)?;
    }
    // Saving persists the welcome element and any visibility change.
    let board = session.save(&client).await?.clone();

    ctx.emit(&board, |board| {
        println!("Created board {}", board.id);
        print_board_line(board);
    })
}

async fn set_visibility(ctx: &Ctx, id: Uuid, visibility: Visibility, origin: &str) -> Result<()> {
    let client = ctx.client()?;
    let mut session = BoardSession::open(&client, id, true, Canvas::default())
        .await
        .context("Failed to load board")?;
    if !session.editor().is_editable() {
        bail!("Only the owner can change this board (are you logged in as them?)");
    }

    session.editor_mut().set_visibility(visibility)?;
    session.save(&client).await?;

    let link = session.editor().share_link(origin);
    ctx.emit(session.editor().board(), |board| {
        print_board_line(board);
        if let Some(link) = &link {
            println!("share link: {}", link);
        }
    })
}

fn print_board_line(board: &Board) {
    println!(
        "{}  {:<8} {:>3} elements  {}",
        board.id,
        board.visibility.as_str(),
        board.elements.len(),
        board.title
    );
}

fn describe(content: &NodeContent) -> String {
    match content {
        NodeContent::Text { text, .. } => format!("\"{}\"", truncate(text, 40)),
        NodeContent::Image { src } | NodeContent::SpotifyEmbed { src } => truncate(src, 48),
        NodeContent::Sticker { glyph } => glyph.clone(),
        NodeContent::MusicLabel { label } => label.clone(),
        NodeContent::Shape { fill, border_radius } => format!("{} radius {}", fill, border_radius),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}...", cut)
}
