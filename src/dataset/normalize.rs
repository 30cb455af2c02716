//! The dataset normalizer: keyed user maps and flat relationship tables both
//! become a [`CanonicalGraph`].
//!
//! Normalization is a pure function of its input. Node order is first
//! appearance; ids are never emitted twice.

use csv::{ReaderBuilder, StringRecord, Trim};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use super::error::{LoadError, Result};
use super::model::{CanonicalGraph, Link, Node, Relationship, UserMap};

/// Input shapes the normalizer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetFormat {
	/// `{ username: { followers: [...], following: [...], ... } }`
	UserMap,
	/// `source,target,relationship` rows under a header.
	RelationshipCsv,
}

impl DatasetFormat {
	/// Picks the format from the resource path, sniffing the body when the
	/// extension says nothing.
	pub fn detect(path: &str, body: &str) -> Self {
		let path = path.split(['?', '#']).next().unwrap_or(path).to_ascii_lowercase();
		if path.ends_with(".csv") {
			DatasetFormat::RelationshipCsv
		} else if path.ends_with(".json") || body.trim_start().starts_with('{') {
			DatasetFormat::UserMap
		} else {
			DatasetFormat::RelationshipCsv
		}
	}
}

/// What normalization had to work around.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
	/// CSV data rows dropped as malformed.
	pub skipped_rows: usize,
	/// Nodes synthesized for usernames that had no record of their own.
	pub placeholders: usize,
}

/// Normalizes `text` in the given format.
pub fn normalize(format: DatasetFormat, text: &str) -> Result<(CanonicalGraph, NormalizeReport)> {
	match format {
		DatasetFormat::UserMap => from_user_json(text),
		DatasetFormat::RelationshipCsv => from_relationship_csv(text),
	}
}

/// Parses and normalizes a keyed user map.
pub fn from_user_json(text: &str) -> Result<(CanonicalGraph, NormalizeReport)> {
	let users: UserMap = serde_json::from_str(text)?;
	Ok(from_user_map(&users))
}

/// Builds the graph from a keyed user map.
///
/// Every follower entry yields `follower -> owner` (follower), every following
/// entry yields `owner -> followee` (following). Usernames only seen inside a
/// list become zero-valued placeholders.
pub fn from_user_map(users: &UserMap) -> (CanonicalGraph, NormalizeReport) {
	let mut nodes: IndexMap<String, Node> = IndexMap::new();
	let mut links = Vec::new();
	let mut report = NormalizeReport::default();

	let mut ensure = |nodes: &mut IndexMap<String, Node>, id: &str| {
		if nodes.contains_key(id) {
			return;
		}
		let node = match users.get(id) {
			Some(record) => Node::from_record(id, record),
			None => {
				report.placeholders += 1;
				Node::placeholder(id)
			}
		};
		nodes.insert(id.to_string(), node);
	};

	for (owner, record) in users {
		ensure(&mut nodes, owner.as_str());
		for follower in record.followers.iter().map(|f| f.trim()) {
			if follower.is_empty() {
				warn!("{owner}: ignoring blank follower entry");
				continue;
			}
			ensure(&mut nodes, follower);
			links.push(Link::new(follower, owner.as_str(), Relationship::Follower));
		}
		for followee in record.following.iter().map(|f| f.trim()) {
			if followee.is_empty() {
				warn!("{owner}: ignoring blank following entry");
				continue;
			}
			ensure(&mut nodes, followee);
			links.push(Link::new(owner.as_str(), followee, Relationship::Following));
		}
	}

	let graph = CanonicalGraph {
		nodes: nodes.into_values().collect(),
		links,
		root: users.keys().next().cloned(),
	};
	debug!(
		"user map normalized: {} nodes, {} links, {} placeholders",
		graph.nodes.len(),
		graph.links.len(),
		report.placeholders
	);
	(graph, report)
}

/// Column positions of the three relationship fields, located by header name.
struct Columns {
	width: usize,
	source: usize,
	target: usize,
	relationship: usize,
}

impl Columns {
	fn from_headers(headers: &StringRecord) -> Result<Self> {
		let find = |column: &'static str| {
			headers
				.iter()
				.position(|h| h.eq_ignore_ascii_case(column))
				.ok_or(LoadError::MissingColumn { column })
		};
		Ok(Self {
			width: headers.len(),
			source: find("source")?,
			target: find("target")?,
			relationship: find("relationship")?,
		})
	}

	fn parse(&self, record: &StringRecord) -> Option<Link> {
		if record.len() != self.width {
			return None;
		}
		let source = record.get(self.source)?;
		let target = record.get(self.target)?;
		if source.is_empty() || target.is_empty() {
			return None;
		}
		let relationship = record.get(self.relationship)?.parse().ok()?;
		Some(Link::new(source, target, relationship))
	}
}

/// Builds the graph from a `source,target,relationship` table.
///
/// Malformed rows (field count differing from the header, blank ids, unknown
/// relationship) are skipped and counted. A header that cannot be read or
/// lacks one of the three columns fails the load. Empty input is an empty graph.
pub fn from_relationship_csv(text: &str) -> Result<(CanonicalGraph, NormalizeReport)> {
	let mut reader = ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.trim(Trim::All)
		.from_reader(text.as_bytes());
	let headers = reader.headers()?;
	if headers.is_empty() {
		return Ok((CanonicalGraph::default(), NormalizeReport::default()));
	}
	let columns = Columns::from_headers(headers)?;

	let mut ids: IndexSet<String> = IndexSet::new();
	let mut links = Vec::new();
	let mut report = NormalizeReport::default();

	for (row, record) in reader.records().enumerate() {
		let link = match record {
			Ok(record) => columns.parse(&record),
			Err(err) => {
				warn!("row {}: {err}", row + 2);
				None
			}
		};
		let Some(link) = link else {
			report.skipped_rows += 1;
			warn!("row {}: skipping malformed relationship row", row + 2);
			continue;
		};
		ids.insert(link.source.clone());
		ids.insert(link.target.clone());
		links.push(link);
	}

	let graph = CanonicalGraph {
		nodes: ids.into_iter().map(Node::placeholder).collect(),
		links,
		root: None,
	};
	debug!(
		"relationship table normalized: {} nodes, {} links, {} rows skipped",
		graph.nodes.len(),
		graph.links.len(),
		report.skipped_rows
	);
	Ok((graph, report))
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::dataset::UserRecord;

	fn ids(graph: &CanonicalGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn user_map_single_owner() {
		let json = r#"{"alice": {"followers_count": 10, "following_count": 5, "is_celebrity": false,
			"followers": ["bob"], "following": ["carol"]}}"#;
		let (graph, report) = from_user_json(json).unwrap();

		assert_eq!(ids(&graph), ["alice", "bob", "carol"]);
		assert_eq!(
			graph.links,
			vec![
				Link::new("bob", "alice", Relationship::Follower),
				Link::new("alice", "carol", Relationship::Following),
			]
		);
		assert_eq!(graph.root.as_deref(), Some("alice"));
		assert_eq!(report.placeholders, 2);
		assert_eq!(graph.node("alice").unwrap().followers_count, 10);
	}

	#[test]
	fn unknown_usernames_become_zeroed_placeholders() {
		let json = r#"{"alice": {"followers_count": 3, "following_count": 1, "is_celebrity": true,
			"followers": ["ghost"], "following": []}}"#;
		let (graph, _) = from_user_json(json).unwrap();
		let ghost = graph.node("ghost").unwrap();
		assert_eq!(ghost, &Node::placeholder("ghost"));
	}

	#[test]
	fn shared_usernames_are_not_duplicated() {
		let mut users = UserMap::new();
		users.insert(
			"alice".into(),
			UserRecord {
				followers: vec!["bob".into(), "carol".into()],
				following: vec!["bob".into()],
				..Default::default()
			},
		);
		users.insert(
			"carol".into(),
			UserRecord {
				followers_count: 42,
				followers: vec!["bob".into(), "alice".into()],
				following: vec!["dave".into()],
				profile_name: Some("Carol C".into()),
				..Default::default()
			},
		);
		let (graph, report) = from_user_map(&users);

		let unique: HashSet<_> = graph.nodes.iter().map(|n| &n.id).collect();
		assert_eq!(unique.len(), graph.nodes.len());
		assert_eq!(ids(&graph), ["alice", "bob", "carol", "dave"]);
		assert_eq!(graph.links.len(), 6);
		assert_eq!(report.placeholders, 2);

		// carol was referenced before her own key; her record still wins
		let carol = graph.node("carol").unwrap();
		assert_eq!(carol.followers_count, 42);
		assert_eq!(carol.profile_name.as_deref(), Some("Carol C"));
	}

	#[test]
	fn links_only_reference_known_nodes() {
		let json = r#"{"a": {"followers": ["b", " c "], "following": ["", "d"]},
			"b": {"followers": [], "following": ["a"]}}"#;
		let (graph, _) = from_user_json(json).unwrap();
		for link in &graph.links {
			assert!(graph.node(&link.source).is_some());
			assert!(graph.node(&link.target).is_some());
		}
		assert!(graph.node("c").is_some());
		assert_eq!(graph.links.len(), 4);
	}

	#[test]
	fn wrong_shape_is_a_load_error() {
		assert!(from_user_json(r#"["alice", "bob"]"#).is_err());
		assert!(from_user_json(r#"{"alice": {"followers": 3}}"#).is_err());
	}

	#[test]
	fn empty_map_is_an_empty_graph() {
		let (graph, _) = from_user_json("{}").unwrap();
		assert!(graph.is_empty());
		assert_eq!(graph.root, None);
	}

	#[test]
	fn csv_single_row() {
		let (graph, report) = from_relationship_csv("source,target,relationship\na,b,follower\n").unwrap();
		assert_eq!(ids(&graph), ["a", "b"]);
		assert_eq!(graph.links, vec![Link::new("a", "b", Relationship::Follower)]);
		assert_eq!(report.skipped_rows, 0);
	}

	#[test]
	fn csv_skips_malformed_rows() {
		let text = "source,target,relationship\n\
			a, b ,following\n\
			a,b\n\
			c,d,friend\n\
			\n\
			,e,follower\n\
			x,y,follower,extra\n\
			b,c,follower\n";
		let (graph, report) = from_relationship_csv(text).unwrap();
		assert_eq!(
			graph.links,
			vec![
				Link::new("a", "b", Relationship::Following),
				Link::new("b", "c", Relationship::Follower),
			]
		);
		assert_eq!(report.skipped_rows, 4);
		assert_eq!(ids(&graph), ["a", "b", "c"]);
	}

	#[test]
	fn csv_respects_header_order() {
		let text = "relationship,source,target\nfollowing,a,b\n";
		let (graph, _) = from_relationship_csv(text).unwrap();
		assert_eq!(graph.links, vec![Link::new("a", "b", Relationship::Following)]);
	}

	#[test]
	fn csv_header_missing_a_column_fails() {
		let err = from_relationship_csv("target,from,relationship\nb,a,follower\n").unwrap_err();
		assert!(matches!(err, LoadError::MissingColumn { column: "source" }), "{err}");
		assert!(from_relationship_csv("a,b,c\n").is_err());
	}

	#[test]
	fn csv_extra_columns_are_ignored() {
		let text = "source,target,relationship,weight\na,b,follower,1\nb,c,following\n";
		let (graph, report) = from_relationship_csv(text).unwrap();
		assert_eq!(graph.links, vec![Link::new("a", "b", Relationship::Follower)]);
		assert_eq!(report.skipped_rows, 1);
	}

	#[test]
	fn csv_empty_input_is_empty() {
		let (graph, report) = from_relationship_csv("").unwrap();
		assert!(graph.is_empty());
		assert_eq!(report.skipped_rows, 0);
	}

	#[test]
	fn csv_header_only_is_empty() {
		let (graph, report) = from_relationship_csv("source,target,relationship\n").unwrap();
		assert!(graph.is_empty());
		assert_eq!(report.skipped_rows, 0);
	}

	#[test]
	fn detects_format() {
		assert_eq!(DatasetFormat::detect("/edges.csv?v=2", "{"), DatasetFormat::RelationshipCsv);
		assert_eq!(DatasetFormat::detect("/user_data.json", ""), DatasetFormat::UserMap);
		assert_eq!(DatasetFormat::detect("/data", "  {\"a\": {}}"), DatasetFormat::UserMap);
		assert_eq!(DatasetFormat::detect("/data", "source,target"), DatasetFormat::RelationshipCsv);
	}
}
