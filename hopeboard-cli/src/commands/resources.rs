//! Resource commands: list, add

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopeboard_core::models::{NewResource, ResourceTag};

use super::Ctx;

#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ResourcesCommands {
    /// List resources, optionally by tag
    List {
        /// Tag to filter on, or "all"
        #[arg(long, short)]
        tag: Option<String>,
    },
    /// Add a resource (attributed to you when logged in)
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Repeatable: --tag stress --tag school
        #[arg(long = "tag", short)]
        tags: Vec<String>,

        #[arg(long)]
        icon: Option<String>,
    },
}

pub async fn run_resources(args: ResourcesArgs, ctx: &Ctx) -> Result<()> {
    let client = ctx.client()?;
    match args.command {
        ResourcesCommands::List { tag } => {
            let tag = ResourceTag::parse_filter(tag.as_deref())?;
            let resources = client
                .resources(tag)
                .await
                .context("Failed to list resources")?;
            ctx.emit(&resources, |resources| {
                if resources.is_empty() {
                    println!("No resources");
                }
                for resource in resources {
                    let tags: Vec<&str> = resource.tags.iter().map(ResourceTag::as_str).collect();
                    println!("{} {}  [{}]", resource.icon, resource.title, tags.join(", "));
                    println!("    {}", resource.description);
                }
            })
        }
        ResourcesCommands::Add {
            title,
            description,
            content,
            tags,
            icon,
        } => {
            let input = NewResource {
                title,
                description,
                content,
                tags,
                icon,
            };
            let resource = client
                .create_resource(&input)
                .await
                .context("Failed to add resource")?;
            ctx.emit(&resource, |resource| {
                println!("Added resource {}", resource.id);
            })
        }
    }
}
