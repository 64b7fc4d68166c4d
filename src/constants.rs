//! Application constants
//!
//! Centralized constants for feed locations, tile dimensions, and user-facing
//! strings used throughout the application.

/// Remote feed locations
pub mod feeds {
    /// Raw file base for the tokenlists repository; feed URL = base + file name.
    pub const RAW_BASE_URL: &str =
        "https://raw.githubusercontent.com/viaprotocol/tokenlists/main/tokenlists/";

    /// Directory-listing endpoint enumerating the `*.json` token lists.
    pub const LISTING_URL: &str =
        "https://api.github.com/repos/viaprotocol/tokenlists/contents/tokenlists";

    /// Built-in networks, in display order.
    pub const STATIC_NETWORKS: [(&str, &str); 4] = [
        ("Ethereum", "ethereum.json"),
        ("Arbitrum", "arbitrum.json"),
        ("Optimism", "optimism.json"),
        ("Bsc", "bsc.json"),
    ];

    /// Image shown when a token has no logo or its logo fails to load.
    pub const DEFAULT_TOKEN_IMAGE: &str = "https://cdn.imgbin.com/9/8/16/imgbin-computer-icons-question-mark-scalable-graphics-blue-question-mark-icon-white-question-mark-n3SxnveXUmn5aQ5jsUSiPZ48T.jpg";

    /// GitHub's API rejects requests without a user agent.
    pub const USER_AGENT: &str = concat!("tokensnap/", env!("CARGO_PKG_VERSION"));
}

/// Grid layout constants
pub mod grid {
    /// Placeholder tiles shown while a feed is loading
    pub const SKELETON_TILES: usize = 20;

    /// Extra rows rendered above and below the viewport in virtual mode
    pub const OVERSCAN_ROWS: usize = 1;

    /// Web tile edge (px)
    pub const WEB_TILE_PX: u32 = 138;

    /// Web gap between tiles (px)
    pub const WEB_GAP_PX: u32 = 25;

    /// Terminal tile width (cells)
    pub const TUI_TILE_COLS: u32 = 18;

    /// Terminal tile height (rows)
    pub const TUI_TILE_ROWS: u32 = 4;

    /// Terminal gap between tiles (cells)
    pub const TUI_GAP: u32 = 1;
}

/// Application state and behavior constants
pub mod app {
    /// Duration to show toast notifications (seconds)
    pub const TOAST_DURATION_SECS: u64 = 2;

    /// Page title
    pub const TITLE: &str = "SnapShot";
}

/// User-facing message strings
pub mod messages {
    /// Shown when a feed request fails in transport
    pub const FETCH_FAILED: &str = "Failed to load tokens. Please try again later.";

    /// Shown when the active category has no (matching) tokens
    pub const NO_TOKENS: &str = "No tokens found";

    /// Shown when category discovery produced nothing selectable
    pub const NO_CATEGORIES: &str = "No categories available";

    /// Toast after copying a contract address
    pub const COPY_ADDRESS: &str = "Copied contract address";

    /// Toast when clipboard operation fails
    pub const COPY_FAILED: &str = "Copy failed";
}
