use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the expenses home directory and an initial configuration file
/// pointing at the remote service.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(home, args.base_url(), args.timeout_ms()).await?;
    Ok(Out::new_message(format!(
        "Initialized '{}' for the expense service at {}",
        config.root().display(),
        config.base_url()
    )))
}
