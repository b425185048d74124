use crate::data::{DataSource, stats};
use crate::error::Result;

/// Print the stage table of one file
pub fn print_table(source: &DataSource) -> Result<()> {
    let summary = stats::stage_summary(source)?;
    let frame = summary.to_dataframe()?;

    println!("-------------- {} --------------\n", source.file_path().display());
    println!("{}", frame);
    println!();
    Ok(())
}
