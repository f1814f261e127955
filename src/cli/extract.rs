use std::path::Path;

use crate::error::Result;
use crate::export;
use crate::import::{self, FieldMapping};

/// Convert a mailbox or tabular export into canonical records inside a
/// fresh timestamped export directory.
pub async fn run(file: &Path, out: &Path, map: &[String]) -> Result<()> {
    let mapping = FieldMapping::parse(map)?;
    let messages = import::import_file(file, &mapping)?;

    let export_dir = export::create_export_dir(out)?;
    for message in &messages {
        export::write_message(&export_dir, message)?;
    }

    eprintln!(
        "mailscrub: exported {} message(s) to {}",
        messages.len(),
        export_dir.display()
    );
    Ok(())
}
