//! Shared navigation fragment. The header content is not baked into this
//! application: an opaque HTML snippet is fetched once at startup and the
//! anchor entries inside it become the navigation row. A failed fetch is
//! terminal for that load and is shown as inline error text where the
//! navigation would have been.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info};

/// Matches `<a ... href="...">label</a>` without caring about the rest of
/// the markup. The label may itself contain tags (icons), stripped below.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*"([^"]+)"[^>]*>(.*?)</a>"#)
        .expect("anchor pattern is valid")
});

/// Strips nested tags out of an anchor label.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// The two ways a fragment load can fail. Kept apart so the log line says
/// whether the server answered badly or never answered at all.
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("fragment request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fragment server answered {status}")]
    Status { status: StatusCode },
}

/// One GET for the fragment text. Any non-success status is an error; there
/// is no retry and no timeout beyond the client's default.
pub fn fetch_fragment(url: &str) -> Result<String, FragmentError> {
    let response = Client::new().get(url).send()?;
    if !response.status().is_success() {
        return Err(FragmentError::Status {
            status: response.status(),
        });
    }
    Ok(response.text()?)
}

/// One entry extracted from the fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub label: String,
    pub target: String,
}

impl NavItem {
    /// Whether this entry should be highlighted for `route`. The root target
    /// only matches the root route (the index page counts as root); any
    /// other target matches by containment, so `/inward.html` lights up the
    /// `inward` entry wherever it appears in the path.
    pub fn is_active(&self, route: &str) -> bool {
        if self.target == "/" {
            matches!(route, "/" | "/index.html")
        } else {
            route.contains(self.target.as_str())
        }
    }
}

/// Pull the `(target, label)` pairs out of an opaque fragment. A fragment
/// with no anchors yields an empty list, which is not an error.
pub fn parse_nav_items(fragment: &str) -> Vec<NavItem> {
    ANCHOR_RE
        .captures_iter(fragment)
        .filter_map(|caps| {
            let target = caps[1].trim().to_string();
            let label = TAG_RE.replace_all(&caps[2], "").trim().to_string();
            if label.is_empty() {
                None
            } else {
                Some(NavItem { label, target })
            }
        })
        .collect()
}

/// Outcome of the startup fetch, carried for the lifetime of the process.
#[derive(Debug)]
pub enum NavBar {
    Loaded { items: Vec<NavItem> },
    Failed { message: String },
}

impl NavBar {
    /// Fetch and parse the fragment, folding both failure kinds into the
    /// inline message shown in the header.
    pub fn load(url: &str) -> Self {
        match fetch_fragment(url) {
            Ok(fragment) => {
                let items = parse_nav_items(&fragment);
                info!("navigation fragment loaded with {} entries", items.len());
                NavBar::Loaded { items }
            }
            Err(err) => {
                error!("error fetching navigation fragment: {err}");
                NavBar::Failed {
                    message: "Error: Could not load navigation bar.".to_string(),
                }
            }
        }
    }

    /// The loaded entries, empty when the fetch failed.
    pub fn items(&self) -> &[NavItem] {
        match self {
            NavBar::Loaded { items } => items,
            NavBar::Failed { .. } => &[],
        }
    }
}
