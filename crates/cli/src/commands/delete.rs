use clap::Args;
use evently_ops::OpsClient;
use evently_ops::evently_client::Identifier;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Attachment id.
    pub id: Identifier,
}

pub async fn run(ops: &OpsClient, args: &DeleteArgs, format: &OutputFormat) -> anyhow::Result<()> {
    ops.delete_attachment(&args.id).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": args.id }));
        }
        OutputFormat::Text => println!("Deleted attachment {}.", args.id),
    }
    Ok(())
}
