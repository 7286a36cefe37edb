//! Letter commands: list, write, like

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopeboard_core::models::{LetterCategory, LetterFilter, LetterView, NewLetter};
use uuid::Uuid;

use super::Ctx;

#[derive(Parser, Debug)]
pub struct LettersArgs {
    #[command(subcommand)]
    pub command: LettersCommands,
}

#[derive(Subcommand, Debug)]
pub enum LettersCommands {
    /// List letters, newest first
    List {
        /// Case-insensitive match on recipient or message
        #[arg(long, short)]
        search: Option<String>,

        /// encouragement, friendship, hope, self-care or school
        #[arg(long, short, value_parser = parse_category)]
        category: Option<LetterCategory>,
    },
    /// Write a letter (no login needed)
    Write {
        /// Letter text
        message: String,

        /// Who the letter is for (default: Anyone)
        #[arg(long)]
        to: Option<String>,

        #[arg(long, short, value_parser = parse_category)]
        category: Option<LetterCategory>,

        /// Card color, e.g. #fde2e4
        #[arg(long)]
        color: Option<String>,
    },
    /// Like a letter
    Like { id: Uuid },
}

fn parse_category(s: &str) -> Result<LetterCategory, String> {
    s.parse().map_err(|e: hopeboard_core::ValidationError| e.to_string())
}

pub async fn run_letters(args: LettersArgs, ctx: &Ctx) -> Result<()> {
    let client = ctx.client()?;
    match args.command {
        LettersCommands::List { search, category } => {
            let filter = LetterFilter { search, category };
            let letters = client.letters(&filter).await.context("Failed to list letters")?;
            ctx.emit(&letters, |letters| {
                if letters.is_empty() {
                    println!("No letters");
                }
                for letter in letters {
                    print_letter(letter);
                }
            })
        }
        LettersCommands::Write {
            message,
            to,
            category,
            color,
        } => {
            let input = NewLetter {
                recipient: to,
                category: category.map(|c| c.as_str().to_string()),
                color,
                message,
            };
            let letter = client
                .create_letter(&input)
                .await
                .context("Failed to send letter")?;
            ctx.emit(&letter, |letter| {
                println!("Sent letter {}", letter.id);
            })
        }
        LettersCommands::Like { id } => {
            let likes = client.like_letter(id).await.context("Failed to like letter")?;
            ctx.emit(&serde_json::json!({ "likes": likes }), |_| {
                println!("{} like(s)", likes);
            })
        }
    }
}

fn print_letter(letter: &LetterView) {
    let category = letter.category.map(|c| c.as_str()).unwrap_or("-");
    println!(
        "{}  to {} [{}] {} ♥ {}",
        letter.id, letter.recipient, category, letter.created_at, letter.likes
    );
    println!("    {}", letter.message);
}
