//! Layout command implementation

use std::path::Path;

use colored::Colorize;
use ext_fs::LayoutPolicy;

use crate::error::Result;

/// Run the layout command: scan an index root for unexpected entries.
pub fn run_layout(dir: &Path) -> Result<i32> {
    println!("Looking for unexpected files");
    let unexpected = ext_fs::scan_layout(dir, &LayoutPolicy::default())?;
    for entry in &unexpected {
        println!("{}", entry.display());
    }
    if unexpected.is_empty() {
        println!("Looking for unexpected files - {}", "done".green());
        Ok(0)
    } else {
        println!("Looking for unexpected files - {}", "failed".red());
        Ok(1)
    }
}
