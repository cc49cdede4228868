//! Core graph model types.
//!
//! A [`Graph`] is the ordered node list produced by the form mapper. Nodes
//! carry a fixed [`NodeType`], an optional label, and an ordered list of
//! property assertions whose values are literals or references to other
//! node identifiers in the same graph.

use std::collections::HashSet;

/// The closed set of node types emitted by the form mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The monitoring system as a whole.
    System,
    /// Hardware controller of the system.
    Hardware,
    /// Software the hardware communicates with.
    Software,
    /// Supplier that produced the system.
    Supplier,
    /// Protocol the system follows.
    Protocol,
    /// Home-cage enclosure.
    Enclosure,
    /// Five-flag needs record provided by the enclosure.
    NeedsSequence,
    /// Enclosure dimensions.
    Dimensions,
    /// Monitored animal.
    Animal,
    /// Behavior and physiology record displayed by the animal.
    BehaviorAndPhysiology,
    /// Circadian rhythm of a behavior record.
    CircadianRhythm,
    /// Observation window.
    TimeInterval,
    /// Sensor capturing the behavior record.
    Sensor,
    /// Actuator eliciting the behavior record.
    Actuator,
    /// Operator contact annotation.
    ContactPoint,
    /// Data-product links annotation.
    DataProduct,
    /// `time:Instant` bounding a session interval.
    TimeInstant,
    /// Limited-interaction-with-humans annotation of a time interval.
    LimitedInteractionWithHumans,
}

impl NodeType {
    /// Every node type, in emission order of the mapper.
    pub const ALL: [NodeType; 18] = [
        NodeType::System,
        NodeType::Protocol,
        NodeType::Hardware,
        NodeType::Software,
        NodeType::Supplier,
        NodeType::NeedsSequence,
        NodeType::Dimensions,
        NodeType::Enclosure,
        NodeType::Animal,
        NodeType::BehaviorAndPhysiology,
        NodeType::CircadianRhythm,
        NodeType::TimeInterval,
        NodeType::TimeInstant,
        NodeType::LimitedInteractionWithHumans,
        NodeType::Sensor,
        NodeType::Actuator,
        NodeType::ContactPoint,
        NodeType::DataProduct,
    ];

    /// Returns the `@type` value used in the JSON-LD document.
    ///
    /// Domain types are bare terms resolved through `@vocab`; the instant
    /// type is the compact `time:Instant`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::System => "System",
            NodeType::Hardware => "Hardware",
            NodeType::Software => "Software",
            NodeType::Supplier => "Supplier",
            NodeType::Protocol => "Protocol",
            NodeType::Enclosure => "Enclosure",
            NodeType::NeedsSequence => "NeedsSequence",
            NodeType::Dimensions => "Dimensions",
            NodeType::Animal => "Animal",
            NodeType::BehaviorAndPhysiology => "BehaviorAndPhysiology",
            NodeType::CircadianRhythm => "CircadianRhythm",
            NodeType::TimeInterval => "TimeInterval",
            NodeType::Sensor => "Sensor",
            NodeType::Actuator => "Actuator",
            NodeType::ContactPoint => "ContactPoint",
            NodeType::DataProduct => "DataProduct",
            NodeType::TimeInstant => "time:Instant",
            NodeType::LimitedInteractionWithHumans => "LimitedInteractionWithHumans",
        }
    }

    /// Parses a JSON-LD `@type` value back into a node type.
    #[must_use]
    pub fn from_type_str(value: &str) -> Option<NodeType> {
        NodeType::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// A property value: a literal or a reference to other nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A plain string literal.
    Text(String),
    /// A numeric literal; the context types it as `xsd:decimal`.
    Number(f64),
    /// A boolean literal.
    Bool(bool),
    /// An ISO-8601 timestamp typed `xsd:dateTime`.
    DateTime(String),
    /// A reference to a single node identifier.
    Ref(String),
    /// An ordered array of node references.
    Refs(Vec<String>),
}

impl PropertyValue {
    /// Returns the referenced identifiers (empty for literals).
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        match self {
            PropertyValue::Ref(id) => vec![id.as_str()],
            PropertyValue::Refs(ids) => ids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A typed graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Absolute identifier of the node.
    pub id: String,
    /// Type tag.
    pub node_type: NodeType,
    /// Human-readable label; omitted from output when `None`.
    pub label: Option<String>,
    /// Property assertions in emission order.
    pub properties: Vec<(&'static str, PropertyValue)>,
}

impl GraphNode {
    /// Creates a node without label or properties.
    #[must_use]
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: None,
            properties: Vec::new(),
        }
    }

    /// Sets the label unless it is empty.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        if !label.is_empty() {
            self.label = Some(label.to_owned());
        }
        self
    }

    /// Appends a property assertion.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: PropertyValue) -> Self {
        self.properties.push((name, value));
        self
    }

    /// Appends a property assertion only when a value is present.
    #[must_use]
    pub fn with_opt(self, name: &'static str, value: Option<PropertyValue>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    /// Looks up a property by name. Returns `None` if it was not asserted.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Iterates over `(property, target)` pairs of every outgoing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.properties
            .iter()
            .flat_map(|(name, value)| value.references().into_iter().map(move |t| (*name, t)))
    }
}

/// A reference whose target is not a node of the same graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    /// Identifier of the node holding the edge.
    pub subject: String,
    /// Property name of the edge.
    pub property: &'static str,
    /// Unresolved target identifier.
    pub target: String,
}

/// An ordered collection of nodes sharing one base namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// The normalized base namespace used to build identifiers.
    pub base: String,
    /// Nodes in emission order.
    pub nodes: Vec<GraphNode>,
}

impl Graph {
    /// Looks up a node by identifier. Returns `None` if not found.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Iterates over the nodes of one type, in emission order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// Returns true if any node asserts the named property.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.property(name).is_some())
    }

    /// Returns every edge whose target is neither a node of this graph nor
    /// a term of a well-known external vocabulary.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingRef> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut dangling = Vec::new();
        for node in &self.nodes {
            for (property, target) in node.edges() {
                if !ids.contains(target) && !crate::vocabulary::is_external_term(target) {
                    dangling.push(DanglingRef {
                        subject: node.id.clone(),
                        property,
                        target: target.to_owned(),
                    });
                }
            }
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_strings_round_trip() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::from_type_str(t.as_str()), Some(t));
        }
        assert_eq!(NodeType::TimeInstant.as_str(), "time:Instant");
    }

    #[test]
    fn empty_label_is_dropped() {
        let node = GraphNode::new("https://x/a", NodeType::Sensor).with_label("");
        assert!(node.label.is_none());
    }

    #[test]
    fn dangling_edges_are_reported() {
        let graph = Graph {
            base: "https://x/".to_owned(),
            nodes: vec![
                GraphNode::new("https://x/a", NodeType::Sensor)
                    .with("captures", PropertyValue::Ref("https://x/b".to_owned())),
                GraphNode::new("https://x/c", NodeType::Actuator).with(
                    "elicits",
                    PropertyValue::Refs(vec![
                        "https://x/a".to_owned(),
                        "http://www.w3.org/2006/time#Instant".to_owned(),
                    ]),
                ),
            ],
        };
        let dangling = graph.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].subject, "https://x/a");
        assert_eq!(dangling[0].property, "captures");
        assert_eq!(dangling[0].target, "https://x/b");
    }
}
