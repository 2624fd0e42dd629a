//! Utilities for interfacing with dvsim: reading topology descriptions from files and
//! rendering the final routing tables.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

pub mod report;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use dvsim_core::{Link, NodeId, Topology, TopologyError};

/// Reads a validated [`Topology`] and its [`NameTable`] from a file containing a
/// [`TopologySpec`] in adjacency-text (`.txt`/`.links`) or JSON format.
pub fn read_topology(path: impl AsRef<Path>) -> Result<(Topology, NameTable), SpecError> {
    let spec = read_topology_spec(path)?;
    let (names, nodes, links) = spec.resolve()?;
    let topology = Topology::new(&nodes, &links)?;
    Ok((topology, names))
}

/// Reads a [`TopologySpec`] from a file, dispatching on the file extension.
pub fn read_topology_spec(path: impl AsRef<Path>) -> Result<TopologySpec, SpecError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let spec = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)?,
        Some("txt") | Some("links") => parse_adjacency(&contents)?,
        _ => return Err(SpecError::UnknownFileType(path.as_ref().into())),
    };
    Ok(spec)
}

/// A topology specification with string node names, as found on disk.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TopologySpec {
    /// Declared node names.
    pub nodes: Vec<String>,
    /// Weighted links between declared nodes.
    pub links: Vec<LinkSpec>,
}

/// One weighted link between two named nodes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LinkSpec {
    /// One endpoint.
    pub a: String,
    /// The other endpoint.
    pub b: String,
    /// Strictly positive link cost.
    pub cost: u64,
}

impl TopologySpec {
    /// Interns node names and maps the links into the core's ID-based form.
    ///
    /// Names are assigned dense [`NodeId`]s in lexicographic order, so the declaration
    /// order in the input file never affects simulation results.
    pub fn resolve(&self) -> Result<(NameTable, Vec<NodeId>, Vec<Link>), SpecError> {
        let names = NameTable::new(self.nodes.iter().cloned())?;
        let nodes = names.node_ids().collect::<Vec<_>>();
        let links = self
            .links
            .iter()
            .map(|link| {
                let a = names
                    .id_of(&link.a)
                    .ok_or_else(|| SpecError::UnknownName(link.a.clone()))?;
                let b = names
                    .id_of(&link.b)
                    .ok_or_else(|| SpecError::UnknownName(link.b.clone()))?;
                Ok(Link::new(a, b, link.cost))
            })
            .collect::<Result<Vec<_>, SpecError>>()?;
        Ok((names, nodes, links))
    }
}

/// A bidirectional mapping between node names and the dense [`NodeId`]s used by the core.
/// IDs follow lexicographic name order.
#[derive(Debug, Clone)]
pub struct NameTable {
    /// Sorted names; the index of a name is its ID.
    names: Vec<String>,
    ids: FxHashMap<String, NodeId>,
}

impl NameTable {
    fn new(names: impl IntoIterator<Item = String>) -> Result<Self, SpecError> {
        let mut names = names.into_iter().collect::<Vec<_>>();
        names.sort();
        if let Some(dup) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SpecError::DuplicateName(dup[0].clone()));
        }
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), NodeId::new(i)))
            .collect();
        Ok(Self { names, ids })
    }

    /// Looks up the ID assigned to `name`.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    /// Looks up the name behind `id`.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.names.get(id.inner()).map(String::as_str)
    }

    /// Iterates over all IDs in ascending (lexicographic-name) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len()).map(NodeId::new)
    }

    /// The number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names are interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parses the adjacency text format: one node per line, `name (neighbor,cost) ...`.
///
/// Lines that do not match the pattern (blank lines, lone names) are ignored;
/// a line that matches but carries a malformed `(neighbor,cost)` token is an error. Every
/// link naturally appears twice, once from each endpoint; the core's
/// last-definition-wins rule resolves the duplicates.
fn parse_adjacency(contents: &str) -> Result<TopologySpec, SpecError> {
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(first)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        nodes.push(name.to_owned());
        for token in std::iter::once(first).chain(tokens) {
            let (neighbor, cost) = parse_hop(token).map_err(|reason| SpecError::Parse {
                line: lineno + 1,
                reason,
            })?;
            links.push(LinkSpec {
                a: name.to_owned(),
                b: neighbor,
                cost,
            });
        }
    }
    Ok(TopologySpec { nodes, links })
}

/// Parses a single `(neighbor,cost)` token.
fn parse_hop(token: &str) -> Result<(String, u64), String> {
    let inner = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| format!("expected `(neighbor,cost)`, got `{token}`"))?;
    let (neighbor, cost) = inner
        .split_once(',')
        .ok_or_else(|| format!("expected `(neighbor,cost)`, got `{token}`"))?;
    let neighbor = neighbor.trim();
    if neighbor.is_empty() {
        return Err(format!("empty neighbor name in `{token}`"));
    }
    // Integer costs only; fractional input is rejected rather than rounded.
    let cost = cost
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid cost `{}` in `{token}`", cost.trim()))?;
    Ok((neighbor.to_owned(), cost))
}

/// Error kinds for topology specifications and I/O.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Malformed line in the adjacency text format.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A node name is declared more than once.
    #[error("node `{0}` is declared more than once")]
    DuplicateName(String),

    /// A link references a name that no line declares.
    #[error("link references undeclared node `{0}`")]
    UnknownName(String),

    /// Error constructing a valid topology.
    #[error("invalid topology")]
    Topology(#[from] TopologyError),
}
