//! Visual encoding: radius, fill, stroke, labels and per-link gradients.

use crate::dataset::{Link, Node, Relationship};

use super::types::{ColorStop, Fill};

/// Canvas clear color.
pub const BACKGROUND: &str = "#fafafa";
/// Label and tooltip text color.
pub const LABEL_COLOR: &str = "#333";

const ROOT_STOPS: &[ColorStop] = &[(0.0, "#4CAF50"), (1.0, "#2196F3")];
const CELEBRITY_FILL: &str = "#e74c3c";
const DEFAULT_FILL: &str = "#3498db";

const FOLLOWER_STOPS: &[ColorStop] = &[(0.0, "#999999"), (1.0, "#666666")];
const FOLLOWING_STOPS: &[ColorStop] = &[(0.0, "#ff4d4d"), (0.5, "#ff9933"), (1.0, "#99cc00")];

/// Link stroke alpha.
pub const LINK_OPACITY: f64 = 0.6;
/// Link stroke width in graph units.
pub const LINK_WIDTH: f64 = 2.0;
/// Gap between a node's edge and its label.
pub const LABEL_OFFSET: f64 = 5.0;

/// Fill precedence: anchored root, then celebrity, then default.
pub fn node_fill(node: &Node, is_root: bool) -> Fill {
	if is_root {
		Fill::Gradient(ROOT_STOPS)
	} else if node.is_celebrity {
		Fill::Solid(CELEBRITY_FILL)
	} else {
		Fill::Solid(DEFAULT_FILL)
	}
}

/// Outline color and width.
pub fn node_stroke(is_root: bool) -> (&'static str, f64) {
	if is_root { ("#2ecc71", 3.0) } else { ("#fff", 1.5) }
}

fn display_name(node: &Node) -> String {
	match &node.profile_name {
		Some(name) => format!("{} ({name})", node.id),
		None => node.id.clone(),
	}
}

/// The profile name when known; the root shows it next to its id.
pub fn label_text(node: &Node, is_root: bool) -> String {
	match &node.profile_name {
		Some(_) if is_root => display_name(node),
		Some(name) => name.clone(),
		None => node.id.clone(),
	}
}

/// Canvas font for a node label.
pub fn label_font(is_root: bool) -> &'static str {
	if is_root { "bold 12px sans-serif" } else { "10px sans-serif" }
}

/// Pixel size matching [`label_font`].
pub fn label_font_size(is_root: bool) -> f64 {
	if is_root { 12.0 } else { 10.0 }
}

/// Name, follower count and following count, one per line.
pub fn tooltip_lines(node: &Node) -> Vec<String> {
	vec![
		display_name(node),
		format!("Followers: {}", node.followers_count),
		format!("Following: {}", node.following_count),
	]
}

/// Gradient palette of a link, ordered source to target.
pub fn link_stops(relationship: Relationship) -> &'static [ColorStop] {
	match relationship {
		Relationship::Follower => FOLLOWER_STOPS,
		Relationship::Following => FOLLOWING_STOPS,
	}
}

/// Identity of a link for style caching; its position in the set is implied.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LinkKey {
	source: String,
	target: String,
	relationship: Relationship,
}

impl From<&Link> for LinkKey {
	fn from(link: &Link) -> Self {
		Self {
			source: link.source.clone(),
			target: link.target.clone(),
			relationship: link.relationship,
		}
	}
}

/// Per-link gradient stops, derived from the link set and rebuilt only when it changes.
#[derive(Debug, Default)]
pub struct LinkStyleCache {
	keys: Vec<LinkKey>,
	stops: Vec<&'static [ColorStop]>,
}

impl LinkStyleCache {
	/// Brings the cache in line with `links`. Returns whether it was rebuilt.
	pub fn sync(&mut self, links: &[Link]) -> bool {
		let keys: Vec<LinkKey> = links.iter().map(LinkKey::from).collect();
		if keys == self.keys {
			return false;
		}
		self.keys = keys;
		self.stops = links.iter().map(|l| link_stops(l.relationship)).collect();
		true
	}

	/// Stops of the link at `index` in the synced set.
	pub fn stops(&self, index: usize) -> Option<&'static [ColorStop]> {
		self.stops.get(index).copied()
	}

	/// Forgets every link.
	pub fn clear(&mut self) {
		self.keys.clear();
		self.stops.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, celebrity: bool, profile: Option<&str>) -> Node {
		Node {
			id: id.into(),
			profile_name: profile.map(Into::into),
			followers_count: 12,
			following_count: 3,
			is_celebrity: celebrity,
		}
	}

	#[test]
	fn fill_precedence() {
		let celeb = node("c", true, None);
		assert_eq!(node_fill(&celeb, true), Fill::Gradient(ROOT_STOPS));
		assert_eq!(node_fill(&celeb, false), Fill::Solid(CELEBRITY_FILL));
		assert_eq!(node_fill(&node("d", false, None), false), Fill::Solid(DEFAULT_FILL));
	}

	#[test]
	fn labels_prefer_profile_names() {
		let named = node("alice", false, Some("Alice A"));
		assert_eq!(label_text(&named, false), "Alice A");
		assert_eq!(label_text(&named, true), "alice (Alice A)");
		assert_eq!(label_text(&node("bob", false, None), true), "bob");
	}

	#[test]
	fn tooltip_shows_counts() {
		let lines = tooltip_lines(&node("alice", false, Some("Alice A")));
		assert_eq!(lines, ["alice (Alice A)", "Followers: 12", "Following: 3"]);
	}

	#[test]
	fn link_palettes_differ_by_relationship() {
		assert_ne!(link_stops(Relationship::Follower), link_stops(Relationship::Following));
		assert_eq!(link_stops(Relationship::Following).len(), 3);
	}

	#[test]
	fn cache_rebuilds_only_on_change() {
		let mut links = vec![
			Link::new("a", "b", Relationship::Follower),
			Link::new("b", "c", Relationship::Following),
		];
		let mut cache = LinkStyleCache::default();
		assert!(cache.sync(&links));
		assert!(!cache.sync(&links));
		assert_eq!(cache.stops(1), Some(FOLLOWING_STOPS));

		links.pop();
		assert!(cache.sync(&links));
		assert_eq!(cache.stops(0), Some(FOLLOWER_STOPS));
		assert_eq!(cache.stops(1), None);

		cache.clear();
		assert_eq!(cache.stops(0), None);
	}
}
