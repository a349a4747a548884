use clap::Args;
use evently_ops::OpsClient;
use evently_ops::evently_client::Identifier;

use crate::OutputFormat;
use crate::commands::describe;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Event whose attachments to list.
    #[arg(long)]
    pub event: Identifier,
}

pub async fn run(ops: &OpsClient, args: &ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let attachments = ops.list_attachments(&args.event).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&attachments)?),
        OutputFormat::Text => {
            if attachments.is_empty() {
                println!("No attachments for event {}.", args.event);
            }
            for meta in &attachments {
                println!("  {}", describe(meta));
            }
        }
    }
    Ok(())
}
