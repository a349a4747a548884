use clap::Args;
use evently_ops::OpsClient;
use evently_ops::evently_client::Identifier;

use crate::OutputFormat;
use crate::commands::describe;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Attachment id.
    pub id: Identifier,
}

pub async fn run(ops: &OpsClient, args: &InfoArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let meta = ops.attachment_info(&args.id).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meta)?),
        OutputFormat::Text => {
            println!("{}", describe(&meta));
            println!("Event:  {}", meta.event_id);
            println!("Blocks: {}..={}", meta.first_block_id, meta.last_block_id);
        }
    }
    Ok(())
}
