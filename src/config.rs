use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Nursle";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Nursle/ on all platforms (user-visible, next to nothing else)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Nursle")
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("nursle.db")
}

/// Path of an optional lexicon override file. When absent, the engine
/// falls back to the built-in keyword table.
pub fn lexicon_path() -> PathBuf {
    if let Ok(path) = std::env::var("NURSLE_LEXICON") {
        return PathBuf::from(path);
    }
    app_data_dir().join("lexicon.json")
}

/// Bind address for the HTTP server.
/// `NURSLE_HOST` / `NURSLE_PORT` override the 127.0.0.1:8000 default.
pub fn bind_addr() -> SocketAddr {
    let host: IpAddr = std::env::var("NURSLE_HOST")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let port: u16 = std::env::var("NURSLE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    SocketAddr::new(host, port)
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "nursle=info,tower_http=warn"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Nursle"));
    }

    #[test]
    fn database_path_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("nursle.db"));
    }

    #[test]
    fn app_name_is_nursle() {
        assert_eq!(APP_NAME, "Nursle");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
