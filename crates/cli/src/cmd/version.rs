use anyhow::Result;
use serde::Serialize;

use dscli_lib::platform::Target;

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Serialize)]
struct VersionOutput {
  version: &'static str,
  platform: String,
}

pub fn cmd_version(output: OutputFormat) -> Result<()> {
  let info = VersionOutput {
    version: env!("CARGO_PKG_VERSION"),
    platform: Target::host()
      .map(|t| t.to_string())
      .unwrap_or_else(|_| "unsupported".to_string()),
  };

  if output.is_json() {
    return print_json(&info);
  }

  println!("dscli {}", info.version);
  print_stat("Platform", &info.platform);
  Ok(())
}
