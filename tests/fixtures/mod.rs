//! Test fixtures for vrp-report.
//!
//! Builds small solved assignments the way a solver binding would: customer
//! slots first, then one start and one end slot per vehicle. Travel time is
//! Manhattan distance at ten minutes per unit; the time dimension is
//! simulated along each route.
#![allow(dead_code)]

use std::collections::HashMap;

use vrp_report::assignment::SolvedAssignment;
use vrp_report::model::{Dataset, Node, Vehicle};
use vrp_report::{Cost, Minutes, NodeId, TraversalIndex, VehicleId};

pub struct Scenario {
    pub dataset: Dataset,
    pub vehicles: Vec<Vehicle>,
    pub assignment: SolvedAssignment,
    /// Node id given to the synthetic terminal when ends are arbitrary.
    pub synthetic_end: Option<NodeId>,
}

/// Builder for test scenarios with sensible defaults.
pub struct ScenarioBuilder {
    nodes: Vec<Node>,
    service_times: HashMap<String, Minutes>,
    vehicles: Vec<Vehicle>,
    routes: HashMap<VehicleId, Vec<NodeId>>,
    fixed_costs: HashMap<VehicleId, Cost>,
    arbitrary_end: bool,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::depot(0, 0.0, 0.0)],
            service_times: HashMap::new(),
            vehicles: Vec::new(),
            routes: HashMap::new(),
            fixed_costs: HashMap::new(),
            arbitrary_end: false,
        }
    }

    pub fn customer(mut self, job_type: &str, x: f64, y: f64) -> Self {
        let id = self.nodes.len();
        self.nodes
            .push(Node::customer(id, job_type, x, y).with_timeslot(if id % 2 == 0 { "PM" } else { "AM" }));
        self
    }

    pub fn service(mut self, job_type: &str, minutes: Minutes) -> Self {
        self.service_times.insert(job_type.to_string(), minutes);
        self
    }

    pub fn vehicle(mut self, start_time: Minutes, end_time: Minutes) -> Self {
        let id = self.vehicles.len();
        self.vehicles.push(Vehicle::new(id, start_time, end_time, 0));
        self
    }

    pub fn route(mut self, vehicle: VehicleId, nodes: &[NodeId]) -> Self {
        self.routes.insert(vehicle, nodes.to_vec());
        self
    }

    pub fn fixed_cost(mut self, vehicle: VehicleId, cost: Cost) -> Self {
        self.fixed_costs.insert(vehicle, cost);
        self
    }

    pub fn arbitrary_end(mut self) -> Self {
        self.arbitrary_end = true;
        self
    }

    pub fn build(self) -> Scenario {
        let node_count = self.nodes.len();
        let synthetic_end = self.arbitrary_end.then_some(node_count);
        let end_node = synthetic_end.unwrap_or(0);

        let travel_times: Vec<Vec<Minutes>> = self
            .nodes
            .iter()
            .map(|from| {
                self.nodes
                    .iter()
                    .map(|to| (((from.x - to.x).abs() + (from.y - to.y).abs()) * 10.0) as Minutes)
                    .collect::<Vec<_>>()
            })
            .collect();

        // Arc costs cover the synthetic terminal too, at zero cost.
        let mut arc_costs = vec![vec![0; node_count + 1]; node_count + 1];
        for (from, row) in travel_times.iter().enumerate() {
            arc_costs[from][..node_count].copy_from_slice(row);
        }

        let customer_slot = |node: NodeId| -> TraversalIndex { node - 1 };
        let customers = node_count - 1;
        let vehicle_count = self.vehicles.len();

        let mut index_to_node: Vec<NodeId> = (1..node_count).collect();
        index_to_node.extend(self.vehicles.iter().map(|vehicle| vehicle.start_node));
        index_to_node.extend(std::iter::repeat_n(end_node, vehicle_count));
        let starts: Vec<TraversalIndex> = (customers..customers + vehicle_count).collect();
        let ends: Vec<TraversalIndex> = (customers + vehicle_count..customers + 2 * vehicle_count).collect();

        let dataset = Dataset::new(self.nodes, self.service_times, travel_times);

        let mut assignment = SolvedAssignment::new(index_to_node, starts.clone(), ends.clone()).unwrap();
        assignment.set_arc_costs(arc_costs);
        for (&vehicle, &cost) in &self.fixed_costs {
            assignment.set_vehicle_fixed_cost(vehicle, cost);
        }

        for vehicle in &self.vehicles {
            let stops = self.routes.get(&vehicle.id).cloned().unwrap_or_default();
            let slots: Vec<TraversalIndex> = stops.iter().map(|&node| customer_slot(node)).collect();
            assignment.set_route(vehicle.id, &slots).unwrap();

            let mut time = vehicle.start_time;
            let mut previous = (starts[vehicle.id], vehicle.start_node);
            assignment.set_cumulative_time(previous.0, time);
            for (&slot, &node) in slots.iter().zip(&stops) {
                time += dataset.service_time(previous.1).unwrap() + dataset.travel_time(previous.1, node).unwrap();
                assignment.set_cumulative_time(slot, time);
                previous = (slot, node);
            }
            time += dataset.service_time(previous.1).unwrap();
            if synthetic_end.is_none() {
                time += dataset.travel_time(previous.1, end_node).unwrap();
            }
            assignment.set_cumulative_time(ends[vehicle.id], time);
        }

        Scenario {
            dataset,
            vehicles: self.vehicles,
            assignment,
            synthetic_end,
        }
    }
}

/// Two working vehicles, one idle vehicle and one dropped customer.
///
/// Nodes: 0 depot, 1 and 2 "repair" (120 min), 3 and 4 "survey" (30 min),
/// 5 "repair" (dropped). Vehicle 0 drives 0-1-2-0, vehicle 1 drives 0-3-4-0.
pub fn standard() -> ScenarioBuilder {
    ScenarioBuilder::new()
        .customer("repair", 1.0, 0.0)
        .customer("repair", 2.0, 0.0)
        .customer("survey", 0.0, 2.0)
        .customer("survey", 0.0, 3.0)
        .customer("repair", 5.0, 5.0)
        .service("repair", 120)
        .service("survey", 30)
        .vehicle(480, 960)
        .vehicle(480, 960)
        .vehicle(480, 960)
        .route(0, &[1, 2])
        .route(1, &[3, 4])
}
