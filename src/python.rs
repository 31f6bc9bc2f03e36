use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::particle::DIM;
use crate::core::{Integrator, SimBox};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// GasBox: Python-facing wrapper around the Rust `SimBox`.
///
/// API:
/// - __new__(width, height, seed=None)
/// - initialize_grid(n, mass, radius, v_max) -> int
/// - initialize_random(n, mass, radius, v_max) -> int
/// - step(dt, integrator="verlet", steps=1)
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct GasBox {
    sim: SimBox,
}

#[pymethods]
impl GasBox {
    /// Create an empty `width` x `height` box.
    ///
    /// - seed: RNG seed (int) for reproducible initialization; None for nondeterministic
    ///
    /// Errors: raises ValueError on non-positive extents.
    #[new]
    #[pyo3(signature = (width, height, seed=None))]
    fn new(width: f64, height: f64, seed: Option<u64>) -> PyResult<Self> {
        let sim = SimBox::new(width, height, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Place `n` particles on a regular grid. Returns the number placed.
    fn initialize_grid(&mut self, n: usize, mass: f64, radius: f64, v_max: f64) -> PyResult<usize> {
        self.sim
            .initialize_grid(n, mass, radius, v_max)
            .map_err(py_err)
    }

    /// Place up to `n` non-overlapping particles at random. Returns the number placed,
    /// which may be less than `n` in a crowded box.
    fn initialize_random(&mut self, n: usize, mass: f64, radius: f64, v_max: f64) -> PyResult<usize> {
        self.sim
            .initialize_random(n, mass, radius, v_max)
            .map_err(py_err)
    }

    /// Advance `steps` fixed steps of size `dt` (releases the GIL during computation).
    #[pyo3(signature = (dt, integrator="verlet", steps=1))]
    fn step(&mut self, py: Python<'_>, dt: f64, integrator: &str, steps: usize) -> PyResult<()> {
        let integrator: Integrator = integrator.parse().map_err(py_err)?;
        py.detach(|| {
            for _ in 0..steps {
                self.sim.step(integrator, dt)?;
            }
            Ok::<(), crate::error::Error>(())
        })
        .map_err(py_err)
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let mut arr = Array2::<f64>::zeros((self.sim.num_particles(), DIM));
        for (i, p) in self.sim.particles().iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.r[k];
            }
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let mut arr = Array2::<f64>::zeros((self.sim.num_particles(), DIM));
        for (i, p) in self.sim.particles().iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.v[k];
            }
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    fn total_kinetic_energy(&self) -> f64 {
        self.sim.total_kinetic_energy()
    }

    fn wall_collisions(&self) -> u64 {
        self.sim.wall_collisions()
    }

    fn reset_wall_collisions(&mut self) {
        self.sim.reset_wall_collisions();
    }

    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }
}

/// The gasbox Python module entry point.
#[pymodule]
fn gasbox(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GasBox>()?;
    Ok(())
}
