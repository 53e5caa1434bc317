//! Well-known locations inside an extracted Technicolor firmware tree.
//!
//! All paths are in normalized snapshot form (forward slashes, leading `/`).

/// Directory holding opkg control and list files
pub const OPKG_INFO_DIR: &str = "/usr/lib/opkg/info";

/// Prefix excluded from unpackaged-file reporting (opkg bookkeeping)
pub const OPKG_DIR_PREFIX: &str = "/usr/lib/opkg/";

pub const CONTROL_SUFFIX: &str = ".control";
pub const LIST_SUFFIX: &str = ".list";

/// Prefix excluded from unpackaged-file reporting; covers `version` and `versioncusto`
pub const VERSION_CONFIG_PREFIX: &str = "/etc/config/version";

/// Package list entries that are opkg bookkeeping, never real files
pub const PSEUDO_PATHS: [&str; 3] = ["/init", "/www/api", "/www/themes"];

pub const CUSTO_PREFIX: &str = "/etc/custo/";
pub const BOARDS_PREFIX: &str = "/etc/boards/";

/// Board model pattern embedded in the firmware directory name (e.g. `VANT-6`)
pub const BOARD_PATTERN: &str = r"(?i)(V.NT-.)";

/// Private-use code point some extraction tools substitute for `:`
pub const ENCODED_COLON: char = '\u{F03A}';

/// `/etc/boards/<BOARD>/config`, the root of a board's overlay tree
pub fn board_config_root(board_id: &str) -> String {
    format!("{}{}/config", BOARDS_PREFIX, board_id)
}
