use clap::{Args, Subcommand};

use strata_client::{ApiError, StorageClass};

use super::{format_directory, format_listing};
use crate::cli::op::{ContextError, Op, OpContext};

crate::command_enum! {
    (Ls, Ls),
    (Mkdir, Mkdir),
    (Rm, Rm),
    (Rename, Rename),
    (Mv, Mv),
    (Size, Size),
}

pub type DirCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Dir {
    #[command(subcommand)]
    pub command: DirCommand,
}

#[async_trait::async_trait]
impl Op for Dir {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("nothing to move: pass --dir and/or --file")]
    NothingToMove,
}

/// List a directory by id, or by path from the root
#[derive(Args, Debug, Clone)]
pub struct Ls {
    #[arg(long, group = "directory")]
    pub id: Option<String>,

    /// `/`-delimited path; the root when neither --id nor --path is given
    #[arg(long, group = "directory")]
    pub path: Option<String>,
}

#[async_trait::async_trait]
impl Op for Ls {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client()?;
        let listing = match &self.id {
            Some(id) => client.read_directory(id).await?,
            None => {
                client
                    .read_directory_by_segment(self.path.as_deref().unwrap_or(""))
                    .await?
            }
        };
        Ok(format_listing(&listing))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    pub name: String,

    /// Parent directory (a new root directory when omitted)
    #[arg(long)]
    pub parent: Option<String>,

    #[arg(long)]
    pub storage_class: Option<StorageClass>,
}

#[async_trait::async_trait]
impl Op for Mkdir {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let directory = ctx
            .client()?
            .create_directory(&self.name, self.parent.as_deref(), self.storage_class)
            .await?;
        Ok(format!("Created {}", format_directory(&directory)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Rm {
    pub id: String,
}

#[async_trait::async_trait]
impl Op for Rm {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client()?.delete_directory(&self.id).await?;
        Ok(format!("Deleted directory {}", self.id))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Rename {
    pub id: String,
    pub name: String,
}

#[async_trait::async_trait]
impl Op for Rename {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let directory = ctx.client()?.rename_directory(&self.id, &self.name).await?;
        Ok(format!("Renamed {}", format_directory(&directory)))
    }
}

/// Move directories and files under another directory
#[derive(Args, Debug, Clone)]
pub struct Mv {
    /// Destination directory
    #[arg(long)]
    pub to: String,

    /// Directory to move, may be repeated
    #[arg(long = "dir")]
    pub directory_ids: Vec<String>,

    /// File to move, may be repeated
    #[arg(long = "file")]
    pub file_ids: Vec<String>,
}

#[async_trait::async_trait]
impl Op for Mv {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        if self.directory_ids.is_empty() && self.file_ids.is_empty() {
            return Err(DirError::NothingToMove);
        }
        ctx.client()?
            .move_nodes(&self.to, &self.directory_ids, &self.file_ids)
            .await?;
        Ok(format!(
            "Moved {} directories and {} files to {}",
            self.directory_ids.len(),
            self.file_ids.len(),
            self.to
        ))
    }
}

/// Bytes stored under one directory
#[derive(Args, Debug, Clone)]
pub struct Size {
    pub id: String,
}

#[async_trait::async_trait]
impl Op for Size {
    type Error = DirError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let size = ctx.client()?.read_directory_size(&self.id).await?;
        Ok(format!("{} bytes", size))
    }
}
