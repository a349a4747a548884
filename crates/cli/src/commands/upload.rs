use std::path::PathBuf;

use clap::Args;
use evently_ops::OpsClient;
use evently_ops::evently_client::Identifier;

use crate::OutputFormat;
use crate::commands::describe;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Event the files belong to.
    #[arg(long)]
    pub event: Identifier,

    /// MIME type sent for every file.
    #[arg(long)]
    pub content_type: Option<String>,

    /// Files to upload, processed in the order given.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub async fn run(ops: &OpsClient, args: &UploadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let reports = ops
        .upload_paths(&args.files, &args.event, args.content_type.as_deref())
        .await;

    let failed = reports.iter().filter(|r| r.result.is_err()).count();

    match format {
        OutputFormat::Json => {
            let out: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| match &r.result {
                    Ok(meta) => serde_json::json!({
                        "path": r.path.display().to_string(),
                        "attachment": meta,
                    }),
                    Err(e) => serde_json::json!({
                        "path": r.path.display().to_string(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for report in &reports {
                match &report.result {
                    Ok(meta) => println!("uploaded {}: {}", report.path.display(), describe(meta)),
                    Err(e) => eprintln!("failed   {}: {e}", report.path.display()),
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} uploads failed", reports.len());
    }
    Ok(())
}
