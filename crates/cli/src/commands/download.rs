use std::path::PathBuf;

use clap::Args;
use evently_ops::OpsClient;
use evently_ops::evently_client::Identifier;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Attachment id.
    pub id: Identifier,

    /// Write to this exact path instead of using the attachment's file name.
    #[arg(long, short, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory to save into, under the attachment's file name.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

pub async fn run(
    ops: &OpsClient,
    args: &DownloadArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let (path, file) = match args.output {
        Some(ref path) => (path.clone(), ops.download_to_path(&args.id, path).await?),
        None => ops.download_to_dir(&args.id, &args.output_dir).await?,
    };

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "path": path.display().to_string(),
                "file": file,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "saved {} ({}, {} bytes) to {}",
                file.file_name,
                file.file_type,
                file.file_size,
                path.display()
            );
        }
    }
    Ok(())
}
