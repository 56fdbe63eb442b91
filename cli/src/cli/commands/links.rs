use anyhow::{Context, Result};
use hal_form_core::parse_link_header;

/// Print the HAL form of a `Link` header as pretty JSON.
pub fn run_links(header: &str) -> Result<()> {
    println!("{}", render(header)?);
    Ok(())
}

fn render(header: &str) -> Result<String> {
    let links = parse_link_header(header).context("could not parse Link header")?;
    Ok(serde_json::to_string_pretty(&links)?)
}
