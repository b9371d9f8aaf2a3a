use clap::Args;

use strata_client::ApiError;

use crate::cli::op::ContextError;

/// Total bytes stored across every directory
#[derive(Args, Debug, Clone)]
pub struct Size;

#[derive(Debug, thiserror::Error)]
pub enum SizeError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Size {
    type Error = SizeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let size = ctx.client()?.get_total_size().await?;
        Ok(format!("{} bytes", size))
    }
}
