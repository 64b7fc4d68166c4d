//! Path router for the token browser
//!
//! The view state is mirrored into a URL-style path so that a page reload or a
//! shared link restores the same category and search term.
//!
//! ## Supported Routes
//!
//! - `/` - No category; the app redirects to the first available one
//! - `/<category>` - Show every token of a category
//! - `/<category>/<search>` - Show a category filtered by a search term
//!
//! ## Robust Parsing
//!
//! - Full URLs: `https://host.example/Arbitrum/usdc`
//! - Hash form: `#/Arbitrum/usdc`
//! - Query and fragment stripping: `/Arbitrum/usdc?utm=1#frag`
//! - Repeated slashes: `//Arbitrum///usdc`
//! - Percent-encoded segments: `/Ethereum/wrapped%20ether`
//!
//! ## Example
//!
//! ```rust
//! use tokensnap::router::{parse, to_path};
//!
//! let route = parse("/Arbitrum/usdc");
//! assert_eq!(route.category.as_deref(), Some("Arbitrum"));
//! assert_eq!(route.search.as_deref(), Some("usdc"));
//! assert_eq!(to_path("Arbitrum", "usdc"), "/Arbitrum/usdc");
//! ```

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Drop `scheme://authority` from a full URL, leaving the path
#[inline]
fn after_origin(raw: &str) -> &str {
    if let Some(pos) = raw.find("://") {
        let rest = &raw[pos + 3..];
        return match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "",
        };
    }
    raw
}

fn decode_segment(seg: &str) -> String {
    match urlencoding::decode(seg) {
        Ok(s) => s.into_owned(),
        Err(_) => {
            log::warn!("[router] segment is not valid percent-encoding: {seg}");
            seg.to_string()
        }
    }
}

/// Category and search term read from a path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl Route {
    pub fn new(category: impl Into<String>, search: impl Into<String>) -> Self {
        let search = search.into();
        Route {
            category: Some(category.into()),
            search: if search.is_empty() { None } else { Some(search) },
        }
    }

    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// Render back into a path (`/` when no category)
    pub fn to_path(&self) -> String {
        match &self.category {
            Some(c) => to_path(c, self.search_term()),
            None => "/".to_string(),
        }
    }
}

/// Parse a route from a path, hash, or full URL.
///
/// Never fails: anything unrecognizable yields the empty route, which the app
/// treats like `/`. Segments past the second are ignored.
pub fn parse(raw: &str) -> Route {
    let s = raw.trim();
    let path = if let Some(rest) = s.strip_prefix('#') {
        rest
    } else {
        strip_query_frag(after_origin(s))
    };
    let path = strip_query_frag(path);

    let mut segments = path.split('/').filter(|seg| !seg.is_empty());

    let category = segments
        .next()
        .map(decode_segment)
        .filter(|c| !c.trim().is_empty());
    let search = if category.is_some() {
        segments
            .next()
            .map(decode_segment)
            .filter(|q| !q.is_empty())
    } else {
        None
    };

    Route { category, search }
}

/// Build `/{category}` or `/{category}/{search}`, percent-encoding each segment.
pub fn to_path(category: &str, search: &str) -> String {
    let mut path = format!("/{}", urlencoding::encode(category));
    if !search.is_empty() {
        path.push('/');
        path.push_str(&urlencoding::encode(search));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        assert_eq!(parse("/"), Route::default());
        assert_eq!(parse(""), Route::default());
        assert_eq!(parse("https://tokens.example.com"), Route::default());
        assert_eq!(parse("https://tokens.example.com/"), Route::default());
    }

    #[test]
    fn test_parse_category() {
        let route = parse("/Ethereum");
        assert_eq!(route.category.as_deref(), Some("Ethereum"));
        assert_eq!(route.search, None);

        let route = parse("#/Bsc");
        assert_eq!(route.category.as_deref(), Some("Bsc"));
    }

    #[test]
    fn test_parse_category_and_search() {
        let route = parse("/Arbitrum/usdc");
        assert_eq!(route, Route::new("Arbitrum", "usdc"));

        let route = parse("http://localhost:5173/Arbitrum/usdc");
        assert_eq!(route, Route::new("Arbitrum", "usdc"));
    }

    #[test]
    fn test_parse_query_and_fragment() {
        assert_eq!(parse("/Optimism/op?utm=1"), Route::new("Optimism", "op"));
        assert_eq!(parse("/Optimism/op#top"), Route::new("Optimism", "op"));
        assert_eq!(
            parse("https://x.test/Optimism?ref=a#b"),
            Route::new("Optimism", "")
        );
    }

    #[test]
    fn test_parse_multiple_slashes_and_extra_segments() {
        assert_eq!(parse("//Arbitrum///usdc"), Route::new("Arbitrum", "usdc"));
        assert_eq!(parse("/Arbitrum/usdc/extra"), Route::new("Arbitrum", "usdc"));
    }

    #[test]
    fn test_percent_decoding() {
        let route = parse("/Ethereum/wrapped%20ether");
        assert_eq!(route.search.as_deref(), Some("wrapped ether"));
    }

    #[test]
    fn test_to_path() {
        assert_eq!(to_path("Ethereum", ""), "/Ethereum");
        assert_eq!(to_path("Ethereum", "usd coin"), "/Ethereum/usd%20coin");
        assert_eq!(to_path("Ethereum", "a/b"), "/Ethereum/a%2Fb");
        assert_eq!(Route::default().to_path(), "/");
    }

    #[test]
    fn test_path_survives_reparse() {
        let path = to_path("Bsc", "a/b c?");
        assert_eq!(parse(&path), Route::new("Bsc", "a/b c?"));
    }
}
