//! Per-system feature and label layouts.
//!
//! The feature order is part of the export contract: serving code rebuilds
//! single-state feature vectors in this order, so columns must never be
//! reordered or renamed.

use crate::diagnostics::{BehaviorClass, TrajectoryDiagnostics};
use crate::error::DatasetError;
use crate::systems::SystemKind;
use crate::trajectory::Trajectory;

/// Where a feature column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSource {
    /// Named state coordinate of the current point
    Coordinate(&'static str),
    /// Named auxiliary scalar of the current point
    Auxiliary(&'static str),
    /// Named system parameter (constant over the trajectory)
    Parameter(&'static str),
    /// Simulation time of the current point
    Time,
    /// Trajectory-level Lyapunov proxy
    Lyapunov,
}

/// One named feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub name: &'static str,
    pub source: FeatureSource,
}

const fn feature(name: &'static str, source: FeatureSource) -> Feature {
    Feature { name, source }
}

/// A feature source bound to one concrete trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Coordinate(usize),
    Auxiliary(usize),
    Constant(f64),
    Time,
}

/// Feature/label layout of one system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub system: SystemKind,
    pub features: Vec<Feature>,
    /// Coordinates predicted by next-step labels
    pub next_state: Vec<&'static str>,
}

impl DatasetSchema {
    pub fn for_system(system: SystemKind) -> Self {
        use FeatureSource::*;

        let (features, next_state) = match system {
            SystemKind::Lorenz => (
                vec![
                    feature("x", Coordinate("x")),
                    feature("y", Coordinate("y")),
                    feature("z", Coordinate("z")),
                    feature("sigma", Parameter("sigma")),
                    feature("rho", Parameter("rho")),
                    feature("beta", Parameter("beta")),
                    feature("time", Time),
                ],
                vec!["x", "y", "z"],
            ),
            SystemKind::Rossler => (
                vec![
                    feature("x", Coordinate("x")),
                    feature("y", Coordinate("y")),
                    feature("z", Coordinate("z")),
                    feature("a", Parameter("a")),
                    feature("b", Parameter("b")),
                    feature("c", Parameter("c")),
                    feature("time", Time),
                ],
                vec!["x", "y", "z"],
            ),
            SystemKind::DoublePendulum => (
                vec![
                    feature("theta1", Coordinate("theta1")),
                    feature("omega1", Coordinate("omega1")),
                    feature("theta2", Coordinate("theta2")),
                    feature("omega2", Coordinate("omega2")),
                    feature("l1", Parameter("l1")),
                    feature("l2", Parameter("l2")),
                    feature("m1", Parameter("m1")),
                    feature("m2", Parameter("m2")),
                    feature("energy", Auxiliary("energy")),
                    feature("lyapunov", Lyapunov),
                    feature("x1", Auxiliary("x1")),
                    feature("y1", Auxiliary("y1")),
                    feature("x2", Auxiliary("x2")),
                    feature("y2", Auxiliary("y2")),
                ],
                vec!["theta1", "omega1", "theta2", "omega2"],
            ),
            SystemKind::Waterwheel => (
                vec![
                    feature("omega", Coordinate("omega")),
                    feature("theta", Coordinate("theta")),
                    feature("bucket_mass_sum", Auxiliary("bucket_mass_sum")),
                    feature("Q", Parameter("Q")),
                    feature("K", Parameter("K")),
                    feature("nu", Parameter("nu")),
                    feature("time", Time),
                ],
                vec!["omega", "theta"],
            ),
            SystemKind::DoubleGyre => (
                vec![
                    feature("x", Coordinate("x")),
                    feature("y", Coordinate("y")),
                    feature("A", Parameter("A")),
                    feature("epsilon", Parameter("epsilon")),
                    feature("omega", Parameter("omega")),
                    feature("time", Time),
                ],
                vec!["x", "y"],
            ),
        };

        Self {
            system,
            features,
            next_state,
        }
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.to_string()).collect()
    }

    pub fn next_step_label_names(&self) -> Vec<String> {
        self.next_state.iter().map(|c| format!("next_{c}")).collect()
    }

    pub fn class_label_names(&self) -> Vec<String> {
        BehaviorClass::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    /// Resolve every feature column against one trajectory
    fn bind(
        &self,
        trajectory: &Trajectory,
        diagnostics: &TrajectoryDiagnostics,
    ) -> Result<Vec<Column>, DatasetError> {
        let missing = |field: &str| DatasetError::MissingField {
            trajectory_id: trajectory.id,
            field: field.to_string(),
        };

        self.features
            .iter()
            .map(|f| match f.source {
                FeatureSource::Coordinate(name) => trajectory
                    .coordinate_index(name)
                    .map(Column::Coordinate)
                    .ok_or_else(|| missing(name)),
                FeatureSource::Auxiliary(name) => trajectory
                    .auxiliary_index(name)
                    .map(Column::Auxiliary)
                    .ok_or_else(|| missing(name)),
                FeatureSource::Parameter(name) => trajectory
                    .parameters
                    .get(name)
                    .map(Column::Constant)
                    .ok_or_else(|| missing(name)),
                FeatureSource::Time => Ok(Column::Time),
                FeatureSource::Lyapunov => diagnostics
                    .lyapunov
                    .map(Column::Constant)
                    .ok_or_else(|| missing("lyapunov")),
            })
            .collect()
    }

    /// Feature rows for every point of a trajectory, in point order
    pub fn feature_rows(
        &self,
        trajectory: &Trajectory,
        diagnostics: &TrajectoryDiagnostics,
    ) -> Result<Vec<Vec<f64>>, DatasetError> {
        let columns = self.bind(trajectory, diagnostics)?;

        Ok(trajectory
            .points
            .iter()
            .map(|point| {
                columns
                    .iter()
                    .map(|column| match *column {
                        Column::Coordinate(i) => point.state[i],
                        Column::Auxiliary(i) => point.auxiliary[i],
                        Column::Constant(value) => value,
                        Column::Time => point.time,
                    })
                    .collect()
            })
            .collect())
    }

    /// State indices of the next-step label coordinates
    pub fn next_state_indices(&self, trajectory: &Trajectory) -> Result<Vec<usize>, DatasetError> {
        self.next_state
            .iter()
            .map(|name| {
                trajectory
                    .coordinate_index(name)
                    .ok_or_else(|| DatasetError::MissingField {
                        trajectory_id: trajectory.id,
                        field: name.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::{Euler, Rk4};
    use crate::systems::{DerivativeModel, DoublePendulum, Lorenz, Waterwheel};
    use crate::trajectory::TrajectoryGenerator;
    use ndarray::array;

    #[test]
    fn test_lorenz_layout() {
        let schema = DatasetSchema::for_system(SystemKind::Lorenz);
        assert_eq!(
            schema.feature_names(),
            vec!["x", "y", "z", "sigma", "rho", "beta", "time"]
        );
        assert_eq!(schema.next_step_label_names(), vec!["next_x", "next_y", "next_z"]);
    }

    #[test]
    fn test_pendulum_layout() {
        let schema = DatasetSchema::for_system(SystemKind::DoublePendulum);
        assert_eq!(schema.features.len(), 14);
        assert_eq!(schema.features[9].name, "lyapunov");
        assert_eq!(
            schema.class_label_names(),
            vec!["periodic", "chaotic", "resonant"]
        );
    }

    #[test]
    fn test_lorenz_rows() {
        let lorenz = Lorenz::classic();
        let trajectory = TrajectoryGenerator::new(5, 0.01)
            .generate(0, &lorenz, &Rk4, array![1.0, 2.0, 3.0])
            .unwrap();
        let schema = DatasetSchema::for_system(SystemKind::Lorenz);

        let rows = schema
            .feature_rows(&trajectory, &TrajectoryDiagnostics::default())
            .unwrap();
        assert_eq!(rows.len(), 5);
        let row = &rows[2];
        assert_eq!(row[0], trajectory.points[2].state[0]);
        assert_eq!(row[3], 10.0);
        assert_eq!(row[4], 28.0);
        assert_eq!(row[6], trajectory.points[2].time);
    }

    #[test]
    fn test_waterwheel_uses_mass_sum() {
        let wheel = Waterwheel::default();
        let trajectory = TrajectoryGenerator::new(10, 0.01)
            .generate(0, &wheel, &Euler, wheel.initial_state(0.1, 0.0))
            .unwrap();
        let schema = DatasetSchema::for_system(SystemKind::Waterwheel);

        let rows = schema
            .feature_rows(&trajectory, &TrajectoryDiagnostics::default())
            .unwrap();
        let last = trajectory.last().unwrap();
        assert_eq!(rows[9][2], wheel.bucket_mass_sum(&last.state));
        assert_eq!(schema.next_state_indices(&trajectory).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_pendulum_requires_lyapunov() {
        let pendulum = DoublePendulum::standard();
        let trajectory = TrajectoryGenerator::new(30, 0.01)
            .generate(3, &pendulum, &Rk4, array![0.3, 0.0, -0.2, 0.0])
            .unwrap();
        let schema = DatasetSchema::for_system(SystemKind::DoublePendulum);

        let err = schema
            .feature_rows(&trajectory, &TrajectoryDiagnostics::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingField { trajectory_id: 3, .. }
        ));

        let diagnostics = pendulum.annotate(&trajectory);
        let rows = schema.feature_rows(&trajectory, &diagnostics).unwrap();
        assert_eq!(rows[0].len(), 14);
        assert_eq!(rows[0][9], diagnostics.lyapunov.unwrap());
    }
}
