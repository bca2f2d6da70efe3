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

//! Text and Graphviz renderings of composite bloq wiring diagrams.

use crate::bloq::Bloq;
use crate::composite::{CompositeBloq, Node, Soquet};

fn local_label(soq: &Soquet) -> String {
    if soq.idx.is_empty() {
        soq.reg.name.clone()
    } else {
        format!("{}{:?}", soq.reg.name, soq.idx)
    }
}

/// A line-per-instance dump of the wiring in topological order. Each block
/// lists the instance, then where its inputs come from and where its outputs
/// go.
pub fn debug_text(cbloq: &CompositeBloq) -> String {
    let preds = cbloq.predecessors();
    let succs = cbloq.successors();

    let mut blocks: Vec<String> = Vec::new();
    for binst in cbloq.iter_binsts() {
        let node = Node::Binst(binst.clone());
        let sig = binst.bloq.signature();
        let mut lines = vec![binst.to_string()];
        for reg in sig.lefts() {
            for idx in reg.all_idxs() {
                let soq = Soquet {
                    node: node.clone(),
                    reg: reg.clone(),
                    idx,
                };
                let producer = preds.get(&soq).expect("every left port is connected");
                lines.push(format!("  {} -> {}", producer, local_label(&soq)));
            }
        }
        for reg in sig.rights() {
            for idx in reg.all_idxs() {
                let soq = Soquet {
                    node: node.clone(),
                    reg: reg.clone(),
                    idx,
                };
                let consumer = succs.get(&soq).expect("every right port is connected");
                lines.push(format!("  {} -> {}", local_label(&soq), consumer));
            }
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n--------------------\n")
}

fn dot_id(node: &Node) -> String {
    match node {
        Node::LeftDangle => "start".to_string(),
        Node::RightDangle => "end".to_string(),
        Node::Binst(b) => format!("b{}", b.i),
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz source for the wiring diagram. Instances are boxes; the two edge
/// nodes collapse to `start` and `end`; each wire is labelled with the
/// producing register and its type.
pub fn to_dot(cbloq: &CompositeBloq) -> String {
    let mut dot = String::from("digraph {\n");
    dot += "  rankdir=LR\n";
    dot += "  start [shape=plaintext, label=\"\"]\n";
    dot += "  end [shape=plaintext, label=\"\"]\n";
    for binst in cbloq.bloq_instances() {
        dot += &format!(
            "  b{} [shape=box, label=\"{}\"]\n",
            binst.i,
            dot_escape(&binst.to_string())
        );
    }

    dot += "\n";

    for cxn in cbloq.connections() {
        dot += &format!(
            "  {} -> {} [label=\"{}: {}\"]\n",
            dot_id(&cxn.left.node),
            dot_id(&cxn.right.node),
            dot_escape(&local_label(&cxn.left)),
            cxn.left.reg.dtype,
        );
    }
    dot += "}\n";
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{CNot, TGate};
    use crate::builder::BloqBuilder;
    use crate::register::Signature;

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

    #[test]
    fn debug_text_lists_instances_in_order() {
        let text = sample().debug_text();
        let t_pos = text.find("TGate<0>").unwrap();
        let c_pos = text.find("CNot<1>").unwrap();
        assert!(t_pos < c_pos);
        assert!(text.contains("LeftDangle.ctrl -> q"));
        assert!(text.contains("target -> RightDangle.target"));
        assert!(text.contains("--------------------"));
    }

    #[test]
    fn dot_output_is_wellformed() {
        let dot = sample().to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("b0 [shape=box, label=\"TGate<0>\"]"));
        assert!(dot.contains("start -> b0"));
        assert!(dot.contains("b1 -> end"));
        assert!(dot.contains("[label=\"q: QBit\"]"));
    }

    #[test]
    fn shaped_wires_show_indices() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("reg", 2)]));
        let reg = soqs.take_one("reg");
        let parts = bb.split(reg).unwrap();
        let joined = bb.join(parts).unwrap();
        let cbloq = bb.finalize([("reg", joined.into())].into()).unwrap();
        let text = cbloq.debug_text();
        assert!(text.contains("reg[0]"));
        assert!(text.contains("reg[1]"));
    }
}
