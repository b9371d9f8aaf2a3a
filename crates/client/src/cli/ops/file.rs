use std::path::PathBuf;

use clap::{Args, Subcommand};

use strata_client::api::v0::UploadFileRequest;
use strata_client::{ApiError, ProviderMetadata, StorageClass};

use super::format_file;
use crate::cli::op::{ContextError, Op, OpContext};

crate::command_enum! {
    (Info, Info),
    (Ls, Ls),
    (Upload, Upload),
    (Rm, Rm),
    (Rename, Rename),
    (Update, Update),
    (Links, Links),
}

pub type FileCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct File {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[async_trait::async_trait]
impl Op for File {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("nothing to update: pass --name and/or --storage-class")]
    NothingToUpdate,
}

/// Show one file's record
#[derive(Args, Debug, Clone)]
pub struct Info {
    pub id: String,
}

#[async_trait::async_trait]
impl Op for Info {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let file = ctx.client()?.read_file(&self.id).await?;
        Ok(format!(
            "{}\n  cid: {}\n  directory: {}\n  updated: {}",
            format_file(&file),
            file.cid,
            file.directory_id,
            file.updated_at
        ))
    }
}

/// List files, optionally only those in one directory
#[derive(Args, Debug, Clone)]
pub struct Ls {
    #[arg(long)]
    pub directory_id: Option<String>,
}

#[async_trait::async_trait]
impl Op for Ls {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let files = ctx
            .client()?
            .list_files(self.directory_id.as_deref())
            .await?;
        if files.is_empty() {
            return Ok("No files found".to_string());
        }
        Ok(files.iter().map(format_file).collect::<Vec<_>>().join("\n"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Local file to upload
    pub path: PathBuf,

    /// Collection the file is filed under
    #[arg(long, default_value = "default")]
    pub collection: String,

    /// Parent directory (defaults to the root)
    #[arg(long)]
    pub directory_id: Option<String>,

    /// Name to store the file under (defaults to the local file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Storage class, may be repeated
    #[arg(long = "storage-class")]
    pub storage_classes: Vec<StorageClass>,
}

#[async_trait::async_trait]
impl Op for Upload {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client()?;
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FileError::Read(self.path.clone(), e))?;

        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string()),
        };

        let mut request = UploadFileRequest::new(name, content, self.collection.clone());
        if let Some(directory_id) = &self.directory_id {
            request = request.directory(directory_id.clone());
        }
        if !self.storage_classes.is_empty() {
            request = request.storage_classes(self.storage_classes.clone());
        }

        let file = client.upload_file(request).await?;
        Ok(format!("Uploaded {}", format_file(&file)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Rm {
    pub id: String,
}

#[async_trait::async_trait]
impl Op for Rm {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client()?.delete_file(&self.id).await?;
        Ok(format!("Deleted file {}", self.id))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Rename {
    pub id: String,
    pub name: String,
}

#[async_trait::async_trait]
impl Op for Rename {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let file = ctx.client()?.rename_file(&self.id, &self.name).await?;
        Ok(format!("Renamed {}", format_file(&file)))
    }
}

/// Change a file's name and/or storage classes
#[derive(Args, Debug, Clone)]
pub struct Update {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "storage-class")]
    pub storage_classes: Vec<StorageClass>,
}

#[async_trait::async_trait]
impl Op for Update {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        if self.name.is_none() && self.storage_classes.is_empty() {
            return Err(FileError::NothingToUpdate);
        }
        let storage_classes = if self.storage_classes.is_empty() {
            None
        } else {
            Some(self.storage_classes.clone())
        };

        let file = ctx
            .client()?
            .update_file(&self.id, self.name.as_deref(), storage_classes)
            .await?;
        Ok(format!("Updated {}", format_file(&file)))
    }
}

/// Show where a file is stored and how to fetch it
#[derive(Args, Debug, Clone)]
pub struct Links {
    pub id: String,
}

#[async_trait::async_trait]
impl Op for Links {
    type Error = FileError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let links = ctx.client()?.read_file_links(&self.id).await?;

        let mut lines: Vec<String> = links.links.iter().map(|link| format!("  {}", link)).collect();
        if lines.is_empty() {
            lines.push("  (no links yet)".to_string());
        }
        lines.insert(0, "Links:".to_string());

        if let Some(metadata) = &links.metadata {
            lines.push(format!("Provider: {}", metadata.provider()));
            match metadata {
                ProviderMetadata::Ipfs(ipfs) => lines.push(format!("  cid: {}", ipfs.cid)),
                ProviderMetadata::Sia(sia) => lines.push(format!("  object: {}", sia.object_key)),
                ProviderMetadata::Filecoin(filecoin) => {
                    lines.push(format!("  piece: {}", filecoin.piece_cid))
                }
                ProviderMetadata::FileFileGo(filefilego) => {
                    lines.push(format!("  hash: {}", filefilego.file_hash))
                }
            }
        }

        Ok(lines.join("\n"))
    }
}
