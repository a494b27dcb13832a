//! Serde model of the exchange format.

use blockflow_core::{BlockId, Payload};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// `{ "<graph id>": { "nodes": { "<id>": NodeRecord } } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub graphs: IndexMap<String, GraphModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModule {
    #[serde(alias = "data")]
    pub nodes: IndexMap<String, NodeRecord>,
}

/// One block as stored on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(deserialize_with = "block_id")]
    pub id: BlockId,
    pub name: String,
    #[serde(default)]
    pub data: Payload,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub inputs: IndexMap<String, InputPort>,
    #[serde(default)]
    pub outputs: IndexMap<String, OutputPort>,
    #[serde(default)]
    pub pos_x: f32,
    #[serde(default)]
    pub pos_y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputPort {
    #[serde(default)]
    pub connections: Vec<InputLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputPort {
    #[serde(default)]
    pub connections: Vec<OutputLink>,
}

/// Entry under an input port: the source node and the output it leaves from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLink {
    #[serde(deserialize_with = "node_ref")]
    pub node: String,
    #[serde(alias = "port")]
    pub input: String,
}

/// Entry under an output port: the target node and the input it enters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLink {
    #[serde(deserialize_with = "node_ref")]
    pub node: String,
    #[serde(alias = "port")]
    pub output: String,
}

impl OutputLink {
    pub fn target(&self) -> Option<BlockId> {
        self.node.trim().parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(u64),
    Text(String),
}

fn block_id<'de, D>(deserializer: D) -> Result<BlockId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => n.to_string(),
        IdRepr::Text(text) => text,
    };
    raw.trim()
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid node id {raw:?}")))
}

/// Node references are strings on the wire, but numbers are accepted.
fn node_ref<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => n.to_string(),
        IdRepr::Text(text) => text,
    })
}
