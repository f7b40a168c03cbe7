use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 在终端输出最终报告
pub fn print_report(report: &str) {
    println!("\n********* Summary of result **********\n");
    println!("\n********* START **********\n");
    println!("{}", report);
    println!("\n\n********* END **********\n");
}

/// 将最终报告保存到磁盘
pub fn save_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent_dir) = path.parent()
        && !parent_dir.as_os_str().is_empty()
        && !parent_dir.exists()
    {
        fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create report directory: {:?}", parent_dir))?;
    }

    fs::write(path, report).with_context(|| format!("Failed to write report: {:?}", path))?;
    println!("💾 已保存报告: {}", path.display());
    Ok(())
}
