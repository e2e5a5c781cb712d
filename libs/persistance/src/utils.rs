use directories::{ProjectDirs, UserDirs};
use std::path::PathBuf;

/// Returns the config directory and the config file inside it, or `None` when the platform has
/// no home directory.
pub fn get_config_location() -> Option<(PathBuf, PathBuf)> {
    let project_dir = ProjectDirs::from("", "", "slant")?;
    let config_dir = project_dir.config_dir();
    let mut config_path = PathBuf::from(config_dir);
    config_path.push("config.toml");
    Some((config_dir.to_owned(), config_path))
}

/// Expands a leading `~` to the user's home directory.
pub fn parse_location(location: &str) -> PathBuf {
    if let Some(rest) = location.strip_prefix('~') {
        if let Some(dirs) = UserDirs::new() {
            let mut loc = dirs.home_dir().to_path_buf();
            loc.push(rest.trim_start_matches(std::path::MAIN_SEPARATOR));
            return loc;
        }
    }
    PathBuf::from(location)
}
