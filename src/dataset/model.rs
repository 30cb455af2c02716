//! Input records and the canonical graph they normalize into.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw per-user record of the keyed-map input shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
	/// Follower total as reported by the source.
	#[serde(default)]
	pub followers_count: u64,
	/// Following total as reported by the source.
	#[serde(default)]
	pub following_count: u64,
	/// Marks a high-profile account.
	#[serde(default)]
	pub is_celebrity: bool,
	/// Usernames that follow this user.
	#[serde(default)]
	pub followers: Vec<String>,
	/// Usernames this user follows.
	#[serde(default)]
	pub following: Vec<String>,
	/// Display name, when the source has one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile_name: Option<String>,
}

/// Username to record, in document order. The first key is the root account.
pub type UserMap = IndexMap<String, UserRecord>;

/// Kind of a directed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
	/// `source` follows `target`, recorded on the target's followers list.
	Follower,
	/// `source` follows `target`, recorded on the source's following list.
	Following,
}

impl Relationship {
	/// The tag as it appears in relationship tables.
	pub fn as_str(self) -> &'static str {
		match self {
			Relationship::Follower => "follower",
			Relationship::Following => "following",
		}
	}
}

impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Relationship {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"follower" => Ok(Relationship::Follower),
			"following" => Ok(Relationship::Following),
			other => Err(format!("unknown relationship `{other}`")),
		}
	}
}

/// A graph vertex: one account.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique handle, e.g. the username.
	pub id: String,
	/// Display name; `None` for placeholders and table-only accounts.
	pub profile_name: Option<String>,
	/// Drives the rendered radius.
	pub followers_count: u64,
	/// Shown in the tooltip.
	pub following_count: u64,
	/// Drawn in the celebrity color.
	pub is_celebrity: bool,
}

impl Node {
	/// A referenced account with no record of its own.
	pub fn placeholder(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	/// A node carrying a user record's attributes; blank profile names are dropped.
	pub fn from_record(id: impl Into<String>, record: &UserRecord) -> Self {
		Self {
			id: id.into(),
			profile_name: record.profile_name.clone().filter(|n| !n.trim().is_empty()),
			followers_count: record.followers_count,
			following_count: record.following_count,
			is_celebrity: record.is_celebrity,
		}
	}
}

/// A directed, typed edge between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
	/// Id of the follower side.
	pub source: String,
	/// Id of the followed side.
	pub target: String,
	/// Which list the edge came from.
	pub relationship: Relationship,
}

impl Link {
	#[allow(missing_docs)]
	pub fn new(source: impl Into<String>, target: impl Into<String>, relationship: Relationship) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship,
		}
	}
}

/// Deduplicated nodes plus id-keyed links, built once per dataset load.
///
/// Links always refer to nodes by id; the layout keeps its own index lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalGraph {
	/// Nodes in first-appearance order.
	pub nodes: Vec<Node>,
	/// Edges by node id.
	pub links: Vec<Link>,
	/// Account the keyed-map shape was collected around (its first key).
	pub root: Option<String>,
}

impl CanonicalGraph {
	/// No nodes to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Upper end of the radius scale's domain.
	pub fn max_followers(&self) -> u64 {
		self.nodes.iter().map(|n| n.followers_count).max().unwrap_or(0)
	}
}
