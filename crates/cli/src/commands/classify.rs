//! Classify command - determine the media shape of one raw post

use anyhow::{Context, Result};
use feed_proxy_domain::{
    RawPost,
    usecases::{MediaClassifier, normalize_post},
};
use std::io::Read;
use std::path::Path;

use crate::args::ClassifyArgs;

pub async fn execute(args: ClassifyArgs) -> Result<()> {
    let input = read_input(args.file.as_deref())?;

    let post: RawPost = serde_json::from_str(&input).context("Input is not a valid post object")?;

    let output = if args.normalized {
        serde_json::to_string_pretty(&normalize_post(&post))?
    } else {
        serde_json::to_string_pretty(&MediaClassifier::classify(&post))?
    };

    println!("{}", output);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
