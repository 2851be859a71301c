//! Two-level hierarchy (root → group → record) and its circle packing.
//!
//! Nodes live in one arena in breadth-first order: the root at index 0,
//! then every group, then every leaf. Children at each level are stably
//! sorted by descending weight, so first-seen order breaks ties.
//!
//! Ordering contract: for a fixed record sequence, `build` followed by
//! `pack` yields identical nodes and circles on every run.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::rc::Rc;

use formats::coerce::to_weight;
use formats::dataset::Record;
use foundation::math::{Vec2, stable_total_cmp_f64};
use tracing::debug;

use crate::entity::ElementKey;
use crate::pack::{Circle, Lcg, pack_siblings};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root { label: String },
    Group { name: String },
    Leaf { record: Rc<Record> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub key: ElementKey,
    pub kind: NodeKind,
    /// Leaf: coerced weight attribute. Group and root: sum over children.
    pub weight: f64,
    pub depth: u8,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// View-local pixels; all zero until [`Hierarchy::pack`] runs.
    pub circle: Circle,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn record(&self) -> Option<&Rc<Record>> {
        match &self.kind {
            NodeKind::Leaf { record } => Some(record),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Root { label } => label,
            NodeKind::Group { name } => name,
            NodeKind::Leaf { .. } => "",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PackOptions {
    pub width: f64,
    pub height: f64,
    /// Gap between sibling circles and between a parent and its children.
    pub padding: f64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            padding: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Groups `records` by `group_attr` and weights leaves by `weight_attr`.
    pub fn build(
        records: &[Rc<Record>],
        group_attr: &str,
        weight_attr: &str,
        root_label: &str,
    ) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut members: BTreeMap<String, Vec<(Rc<Record>, f64)>> = BTreeMap::new();
        for record in records {
            let name = record.label(group_attr);
            let weight = to_weight(record.get(weight_attr));
            members
                .entry(name.clone())
                .or_insert_with(|| {
                    order.push(name);
                    Vec::new()
                })
                .push((Rc::clone(record), weight));
        }

        let mut groups: Vec<(String, f64, Vec<(Rc<Record>, f64)>)> = order
            .into_iter()
            .filter_map(|name| {
                let mut leaves = members.remove(&name)?;
                leaves.sort_by(|a, b| stable_total_cmp_f64(b.1, a.1));
                let total = leaves.iter().map(|(_, w)| w).sum();
                Some((name, total, leaves))
            })
            .collect();
        groups.sort_by(|a, b| stable_total_cmp_f64(b.1, a.1));

        let leaf_count: usize = groups.iter().map(|g| g.2.len()).sum();
        let mut nodes = Vec::with_capacity(1 + groups.len() + leaf_count);
        nodes.push(HierarchyNode {
            key: ElementKey::Root,
            kind: NodeKind::Root {
                label: root_label.to_string(),
            },
            weight: groups.iter().map(|g| g.1).sum(),
            depth: 0,
            parent: None,
            children: (1..=groups.len()).collect(),
            circle: Circle::default(),
        });

        let mut next_leaf = 1 + groups.len();
        for (name, total, leaves) in &groups {
            nodes.push(HierarchyNode {
                key: ElementKey::Group(name.clone()),
                kind: NodeKind::Group { name: name.clone() },
                weight: *total,
                depth: 1,
                parent: Some(0),
                children: (next_leaf..next_leaf + leaves.len()).collect(),
                circle: Circle::default(),
            });
            next_leaf += leaves.len();
        }
        for (group, (_, _, leaves)) in groups.into_iter().enumerate() {
            for (record, weight) in leaves {
                nodes.push(HierarchyNode {
                    key: ElementKey::Record(record.index()),
                    kind: NodeKind::Leaf { record },
                    weight,
                    depth: 2,
                    parent: Some(group + 1),
                    children: Vec::new(),
                    circle: Circle::default(),
                });
            }
        }

        debug!(
            groups = nodes[0].children.len(),
            leaves = leaf_count,
            "hierarchy built"
        );
        Self { nodes }
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    /// Every node, breadth-first: root, groups, leaves.
    pub fn descendants(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, at: usize) -> Option<&HierarchyNode> {
        self.nodes.get(at)
    }

    pub fn groups(&self) -> impl Iterator<Item = &HierarchyNode> + '_ {
        self.nodes.iter().filter(|n| n.depth == 1)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &HierarchyNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn find(&self, key: &ElementKey) -> Option<&HierarchyNode> {
        self.nodes.iter().find(|n| &n.key == key)
    }

    pub fn children<'a>(
        &'a self,
        node: &'a HierarchyNode,
    ) -> impl Iterator<Item = &'a HierarchyNode> + 'a {
        node.children.iter().filter_map(move |&i| self.nodes.get(i))
    }

    /// Lays every node out inside a `width` × `height` box.
    ///
    /// Leaf radius starts at `sqrt(weight)`. A first pass packs without
    /// padding to learn the root radius, a second pass packs again with
    /// padding rescaled to that radius, then everything is scaled so the
    /// root fills the shorter side. Empty or weightless hierarchies collapse
    /// to zero-radius circles at the centre.
    pub fn pack(&mut self, options: PackOptions) {
        let dx = options.width.max(0.0);
        let dy = options.height.max(0.0);
        let center = Vec2::new(dx / 2.0, dy / 2.0);
        let shorter = dx.min(dy);

        for node in &mut self.nodes {
            let r = if node.is_leaf() { node.weight.sqrt() } else { 0.0 };
            node.circle = Circle::new(0.0, 0.0, r);
        }

        let mut random = Lcg::new();
        self.pack_children(0.0, &mut random);
        let first = self.nodes[0].circle.r;
        if !(first.is_finite() && first > 0.0 && shorter > 0.0) {
            self.collapse(center);
            return;
        }

        self.pack_children(options.padding * first / shorter, &mut random);
        let root_r = self.nodes[0].circle.r;
        if !(root_r.is_finite() && root_r > 0.0) {
            self.collapse(center);
            return;
        }

        let k = shorter / (2.0 * root_r);
        for at in 0..self.nodes.len() {
            let parent = self.nodes[at].parent.map(|p| self.nodes[p].circle.center());
            let circle = &mut self.nodes[at].circle;
            circle.r *= k;
            let origin = parent.unwrap_or(center);
            let offset = if parent.is_some() {
                Vec2::new(circle.x, circle.y) * k
            } else {
                Vec2::ZERO
            };
            circle.x = origin.x + offset.x;
            circle.y = origin.y + offset.y;
        }
    }

    /// Packs each parent's children, deepest parents first.
    fn pack_children(&mut self, padding: f64, random: &mut Lcg) {
        let mut parents: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| !self.nodes[i].children.is_empty())
            .collect();
        parents.sort_by_key(|&i| (Reverse(self.nodes[i].depth), i));

        for parent in parents {
            let children = self.nodes[parent].children.clone();
            let mut circles: Vec<Circle> = children
                .iter()
                .map(|&c| {
                    let circle = self.nodes[c].circle;
                    Circle::new(circle.x, circle.y, circle.r + padding)
                })
                .collect();
            let enclosing = pack_siblings(&mut circles, random);
            for (&c, placed) in children.iter().zip(circles) {
                self.nodes[c].circle = Circle::new(placed.x, placed.y, placed.r - padding);
            }
            self.nodes[parent].circle.r = enclosing + padding;
        }
    }

    fn collapse(&mut self, center: Vec2) {
        for node in &mut self.nodes {
            node.circle = Circle::new(center.x, center.y, 0.0);
        }
    }
}
