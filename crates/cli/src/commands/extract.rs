use std::path::Path;

use anyhow::Result;
use chatvec_core::{extract_all, load_conversations};

pub(crate) fn run(file: &Path, with_skipped: bool) -> Result<()> {
    let conversations = load_conversations(file)?;
    let report = extract_all(&conversations);
    let output = if with_skipped {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.messages)?
    };
    println!("{output}");
    Ok(())
}
