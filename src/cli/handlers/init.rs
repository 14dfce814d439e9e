use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::gateway::Gateway;
use crate::io::mirror;
use crate::io::storage::FileStorage;

const CONFIG_TEMPLATE: &str = r##"# ibadah configuration

[mirror]
# Forward user ids and names (never tracker data) to an outbox file that an
# external uploader drains. One JSON object per line.
enabled = false
outbox = "mirror-outbox.jsonl"

[display]
# Show sub-items under their parent in `show`
show_sub_items = true
# Colour category names with their palette colour
color = true
"##;

/// Write the commented config template unless a config already exists.
/// Returns whether it was written.
fn write_config_template(data_dir: &Path) -> Result<bool, std::io::Error> {
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, CONFIG_TEMPLATE)?;
    Ok(true)
}

pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("user name cannot be empty".into());
    }

    let mut gateway = Gateway::new(FileStorage::new(data_dir));
    if !gateway.list_users().is_empty() {
        return Err(format!(
            "already initialized in {} (use `ibadah user add` for another user)",
            data_dir.display()
        )
        .into());
    }

    fs::create_dir_all(data_dir)?;
    write_config_template(data_dir)?;

    let created = gateway.create_user(name);
    let config = config_io::load_config(data_dir);
    let mut sink = mirror::from_config(data_dir, &config.mirror);
    mirror::dispatch(sink.as_mut(), &created.notices);

    println!("Initialized {}", data_dir.display());
    println!("  user: {} ({})", created.value.name, created.value.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: AppConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.mirror.enabled, defaults.mirror.enabled);
        assert_eq!(config.mirror.outbox, defaults.mirror.outbox);
        assert_eq!(config.display.show_sub_items, defaults.display.show_sub_items);
        assert_eq!(config.display.color, defaults.display.color);
    }

    #[test]
    fn template_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[display]\ncolor = false\n").unwrap();
        assert!(!write_config_template(tmp.path()).unwrap());
        assert!(!config_io::load_config(tmp.path()).display.color);
    }

    #[test]
    fn init_refuses_second_run() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        cmd_init(InitArgs { name: "Amina".into() }, &dir).unwrap();
        assert!(dir.join(CONFIG_FILE).exists());
        assert!(dir.join("users.json").exists());
        assert!(cmd_init(InitArgs { name: "Bilal".into() }, &dir).is_err());
    }

    #[test]
    fn init_rejects_blank_name() {
        let tmp = TempDir::new().unwrap();
        assert!(cmd_init(InitArgs { name: "  ".into() }, tmp.path()).is_err());
    }
}
