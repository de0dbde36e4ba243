use crate::{define_index_newtype, routing::error::RoutingError};

define_index_newtype!(NodeIdx);
define_index_newtype!(VehicleIdx);

/// Translates between problem nodes and routing indices.
///
/// Every node that is not a vehicle start or end gets one visitable index, in
/// node order. They are followed by one start index per vehicle, then one end
/// index per vehicle:
///
/// ```text
/// [ visitable 0..k | start v0 .. start vN | end v0 .. end vN ]
/// ```
#[derive(Debug, Clone)]
pub struct RoutingIndexManager {
    num_nodes: usize,
    num_vehicles: usize,
    num_visitable: usize,
    index_to_node: Vec<NodeIdx>,
    node_to_index: Vec<Option<usize>>,
}

impl RoutingIndexManager {
    pub fn new(
        num_nodes: usize,
        starts: &[NodeIdx],
        ends: &[NodeIdx],
    ) -> Result<Self, RoutingError> {
        if starts.len() != ends.len() {
            return Err(RoutingError::VehicleCountMismatch {
                starts: starts.len(),
                ends: ends.len(),
            });
        }

        if let Some(node) = starts.iter().chain(ends).find(|node| node.get() >= num_nodes) {
            return Err(RoutingError::NodeOutOfRange {
                node: node.get(),
                num_nodes,
            });
        }

        let mut is_terminal = vec![false; num_nodes];
        for node in starts.iter().chain(ends) {
            is_terminal[node.get()] = true;
        }

        let num_vehicles = starts.len();
        let mut index_to_node = Vec::with_capacity(num_nodes + 2 * num_vehicles);
        let mut node_to_index = vec![None; num_nodes];

        for (node, &terminal) in is_terminal.iter().enumerate() {
            if !terminal {
                node_to_index[node] = Some(index_to_node.len());
                index_to_node.push(NodeIdx::new(node));
            }
        }

        let num_visitable = index_to_node.len();
        index_to_node.extend_from_slice(starts);
        index_to_node.extend_from_slice(ends);

        Ok(RoutingIndexManager {
            num_nodes,
            num_vehicles,
            num_visitable,
            index_to_node,
            node_to_index,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn num_visitable(&self) -> usize {
        self.num_visitable
    }

    /// Visitable indices plus start indices, the indices that have a successor.
    pub fn size(&self) -> usize {
        self.num_visitable + self.num_vehicles
    }

    pub fn num_indices(&self) -> usize {
        self.index_to_node.len()
    }

    pub fn index_to_node(&self, index: usize) -> NodeIdx {
        self.index_to_node[index]
    }

    /// `None` for nodes only used as vehicle starts or ends.
    pub fn node_to_index(&self, node: NodeIdx) -> Option<usize> {
        self.node_to_index.get(node.get()).copied().flatten()
    }

    pub fn start(&self, vehicle: VehicleIdx) -> usize {
        self.num_visitable + vehicle.get()
    }

    pub fn end(&self, vehicle: VehicleIdx) -> usize {
        self.num_visitable + self.num_vehicles + vehicle.get()
    }

    pub fn is_visitable(&self, index: usize) -> bool {
        index < self.num_visitable
    }

    pub fn is_start(&self, index: usize) -> bool {
        index >= self.num_visitable && index < self.num_visitable + self.num_vehicles
    }

    pub fn is_end(&self, index: usize) -> bool {
        index >= self.num_visitable + self.num_vehicles && index < self.num_indices()
    }

    pub fn vehicles(&self) -> impl Iterator<Item = VehicleIdx> + use<> {
        (0..self.num_vehicles).map(VehicleIdx::new)
    }
}
