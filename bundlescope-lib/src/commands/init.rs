use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `bundlescope.toml` in the working directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

/// Write the default configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_init_writes_a_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(CONFIG_FILE_NAME)).unwrap();

        let mut host = TestHost::new();
        init_config(&mut host, &InitArgs { output: Some(path.clone()) }).unwrap();

        let output = String::from_utf8(host.output_buf).unwrap();
        assert!(output.contains("Generated default configuration file"));

        let config = Config::load(path.parent().unwrap(), None).unwrap();
        assert!(config.rules.contains_key("restricted-modules"));
    }
}
