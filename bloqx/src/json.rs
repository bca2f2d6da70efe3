// bloqx - Rust library for building and costing quantum algorithms
//         from composable, typed bloqs
// Copyright (C) 2025 - the bloqx developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structural json encoding of composite bloq graphs.
//!
//! The encoding records instances by pretty name and signature, so arbitrary
//! bloq types do not survive a round trip: decoding yields
//! [`BlackBoxBloq`] placeholders wired exactly as the original. Encoding a
//! decoded graph reproduces the document, which is what the format promises.
//! The decoder trusts the document's wiring; it does not re-check linearity.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bloq::{AnyBloq, BlackBoxBloq, Bloq};
use crate::composite::{BloqInstance, CompositeBloq, Connection, Node, Soquet};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};

/// Returns the json-encoded representation of a composite bloq.
pub fn encode_cbloq(cbloq: &CompositeBloq) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonCbloq::from_cbloq(cbloq))
}

/// Writes the json-encoded representation of a composite bloq to a file.
pub fn write_cbloq(cbloq: &CompositeBloq, filename: &Path) -> serde_json::Result<()> {
    let file = std::fs::File::create(filename).unwrap();
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &JsonCbloq::from_cbloq(cbloq))
}

/// Reads a composite bloq back from its json-encoded representation.
pub fn decode_cbloq(s: &str) -> serde_json::Result<CompositeBloq> {
    let jc: JsonCbloq = serde_json::from_str(s)?;
    Ok(jc.to_cbloq())
}

/// Reads a composite bloq from a json-encoded file.
pub fn read_cbloq(filename: &Path) -> serde_json::Result<CompositeBloq> {
    let file = std::fs::File::open(filename).unwrap();
    let reader = std::io::BufReader::new(file);
    let jc: JsonCbloq = serde_json::from_reader(reader)?;
    Ok(jc.to_cbloq())
}

/// The json-encoded format for composite bloq graphs.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonCbloq {
    registers: Vec<JsonRegister>,
    instances: Vec<JsonInstance>,
    connections: Vec<JsonConnection>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonRegister {
    name: String,
    dtype: QDType,
    #[serde(skip_serializing_if = "is_default")]
    #[serde(default)]
    shape: Vec<usize>,
    #[serde(skip_serializing_if = "is_thru")]
    #[serde(default = "thru")]
    side: Side,
}

/// An instance, identified by its position in the list.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonInstance {
    name: String,
    registers: Vec<JsonRegister>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonConnection {
    left: JsonPort,
    right: JsonPort,
}

/// One end of a wire: a node reference, a register name and an element index.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonPort {
    node: JsonNode,
    reg: String,
    #[serde(skip_serializing_if = "is_default")]
    #[serde(default)]
    idx: Vec<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
enum JsonNode {
    LeftDangle,
    RightDangle,
    Inst(usize),
}

fn is_default<T: Default + PartialEq>(t: &T) -> bool {
    *t == Default::default()
}

fn is_thru(side: &Side) -> bool {
    *side == Side::Thru
}

fn thru() -> Side {
    Side::Thru
}

fn encode_reg(reg: &Register) -> JsonRegister {
    JsonRegister {
        name: reg.name.clone(),
        dtype: reg.dtype,
        shape: reg.shape.clone(),
        side: reg.side,
    }
}

fn decode_reg(jr: &JsonRegister) -> Register {
    Register::new(&jr.name, jr.dtype)
        .with_shape(jr.shape.clone())
        .with_side(jr.side)
}

fn encode_port(soq: &Soquet) -> JsonPort {
    JsonPort {
        node: match &soq.node {
            Node::LeftDangle => JsonNode::LeftDangle,
            Node::RightDangle => JsonNode::RightDangle,
            Node::Binst(b) => JsonNode::Inst(b.i),
        },
        reg: soq.reg.name.clone(),
        idx: soq.idx.clone(),
    }
}

impl JsonCbloq {
    fn from_cbloq(cbloq: &CompositeBloq) -> Self {
        let registers = cbloq.signature().iter().map(encode_reg).collect();
        let instances = cbloq
            .bloq_instances()
            .iter()
            .map(|binst| JsonInstance {
                name: binst.bloq.pretty_name(),
                registers: binst.bloq.signature().iter().map(encode_reg).collect(),
            })
            .collect();
        let connections = cbloq
            .connections()
            .iter()
            .map(|cxn| JsonConnection {
                left: encode_port(&cxn.left),
                right: encode_port(&cxn.right),
            })
            .collect();
        JsonCbloq {
            registers,
            instances,
            connections,
        }
    }

    /// Rebuilds the graph with opaque placeholder bloqs.
    ///
    /// Panics if the document names a register its node does not declare or
    /// declares an ill-formed signature.
    fn to_cbloq(&self) -> CompositeBloq {
        let signature = Signature::new(self.registers.iter().map(decode_reg).collect());
        let binsts: Vec<BloqInstance> = self
            .instances
            .iter()
            .enumerate()
            .map(|(i, inst)| BloqInstance {
                bloq: BlackBoxBloq {
                    name: inst.name.clone(),
                    signature: Signature::new(inst.registers.iter().map(decode_reg).collect()),
                }
                .into(),
                i,
            })
            .collect();

        // dangles carry the composite's own registers; a producing instance
        // port carries one of its right registers, a consuming one a left
        let decode_port = |port: &JsonPort, is_producer: bool| -> Soquet {
            let (node, sig) = match port.node {
                JsonNode::LeftDangle => (Node::LeftDangle, signature.clone()),
                JsonNode::RightDangle => (Node::RightDangle, signature.clone()),
                JsonNode::Inst(i) => (Node::Binst(binsts[i].clone()), binsts[i].bloq.signature()),
            };
            let reg = match (&port.node, is_producer) {
                (JsonNode::LeftDangle, _) => sig.get_left(&port.reg),
                (JsonNode::RightDangle, _) => sig.get_right(&port.reg),
                (JsonNode::Inst(_), true) => sig.get_right(&port.reg),
                (JsonNode::Inst(_), false) => sig.get_left(&port.reg),
            };
            let reg = reg
                .unwrap_or_else(|| panic!("document wires unknown register {:?}", port.reg))
                .clone();
            Soquet {
                node,
                reg,
                idx: port.idx.clone(),
            }
        };
        let connections = self
            .connections
            .iter()
            .map(|cxn| Connection {
                left: decode_port(&cxn.left, true),
                right: decode_port(&cxn.right, false),
            })
            .collect();
        CompositeBloq::new(binsts, connections, signature)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bloqs::basic::{CNot, TGate};
    use crate::builder::BloqBuilder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sample() -> CompositeBloq {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([
            ("ctrl", 1),
            ("target", 1),
        ]));
        let ctrl = soqs.take_one("ctrl");
        let target = soqs.take_one("target");
        let ctrl = bb
            .add(TGate::default(), [("q", ctrl.into())].into())
            .unwrap()
            .take_one("q");
        let mut out = bb
            .add(CNot, [("ctrl", ctrl.into()), ("target", target.into())].into())
            .unwrap();
        bb.finalize(
            [
                ("ctrl", out.take_one("ctrl").into()),
                ("target", out.take_one("target").into()),
            ]
            .into(),
        )
        .unwrap()
    }

    #[fixture]
    fn split_join() -> CompositeBloq {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("reg", 3)]));
        let parts = bb.split(soqs.take_one("reg")).unwrap();
        let joined = bb.join(parts).unwrap();
        bb.finalize([("reg", joined.into())].into()).unwrap()
    }

    #[rstest]
    #[case::flat(sample())]
    #[case::shaped(split_join())]
    fn document_round_trip(#[case] cbloq: CompositeBloq) {
        let doc = encode_cbloq(&cbloq).unwrap();
        let decoded = decode_cbloq(&doc).unwrap();
        // bloq types are gone, but names, signatures and wiring survive
        assert_eq!(encode_cbloq(&decoded).unwrap(), doc);
        assert_eq!(decoded.debug_text(), cbloq.debug_text());
        assert_eq!(
            decoded.bloq_instances().len(),
            cbloq.bloq_instances().len()
        );
    }

    #[rstest]
    fn decoded_bloqs_are_black_boxes(sample: CompositeBloq) {
        let doc = encode_cbloq(&sample).unwrap();
        let decoded = decode_cbloq(&doc).unwrap();
        let names: Vec<String> = decoded
            .iter_binsts()
            .iter()
            .map(|b| b.bloq.pretty_name())
            .collect();
        assert_eq!(names, vec!["TGate", "CNot"]);
        assert!(decoded.bloq_instances()[0]
            .bloq
            .downcast_ref::<BlackBoxBloq>()
            .is_some());
    }

    #[rstest]
    fn file_round_trip(sample: CompositeBloq) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbloq.json");
        write_cbloq(&sample, &path).unwrap();
        let decoded = read_cbloq(&path).unwrap();
        assert_eq!(decoded.debug_text(), sample.debug_text());
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(decode_cbloq("{\"registers\": 5}").is_err());
    }
}
